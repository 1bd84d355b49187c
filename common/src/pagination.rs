//! Abstractions for offset pagination of remote collections.

use serde::{Deserialize, Deserializer, Serialize};

/// Request of a single page of a remote collection.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Zero-based index of the requested page.
    pub page: u32,

    /// Maximum number of items on the requested page.
    pub page_size: u32,
}

impl Request {
    /// Default number of items on a page.
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Creates a [`Request`] of the first page with the provided size.
    ///
    /// A zero `page_size` is replaced with [`Request::DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: if page_size == 0 {
                Self::DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Returns a [`Request`] of the page following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            page_size: self.page_size,
        }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PAGE_SIZE)
    }
}

/// Single page of a remote collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Total number of items in the whole collection, if reported.
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Creates an empty [`Page`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }

    /// Indicates whether more items exist after this [`Page`] requested with
    /// the provided [`Request`].
    #[must_use]
    pub fn has_more(&self, request: Request) -> bool {
        let seen = u64::from(request.page) * u64::from(request.page_size)
            + self.items.len() as u64;
        self.total.map_or_else(
            || self.items.len() as u64 >= u64::from(request.page_size),
            |total| seen < total,
        )
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    /// Accepts either a bare array of items, or an object carrying the items
    /// under one of the `items`, `content` or `data` keys and, optionally,
    /// the total count under `total` or `totalElements`.
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire<T> {
            Bare(Vec<T>),
            Wrapped {
                #[serde(alias = "content", alias = "data")]
                items: Vec<T>,
                #[serde(default, alias = "totalElements")]
                total: Option<u64>,
            },
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Bare(items) => Self { items, total: None },
            Wire::Wrapped { items, total } => Self { items, total },
        })
    }
}

#[cfg(test)]
mod spec {
    use super::{Page, Request};

    #[test]
    fn deserializes_all_shapes() {
        let bare: Page<u8> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.items, [1, 2]);
        assert_eq!(bare.total, None);

        let items: Page<u8> =
            serde_json::from_str(r#"{"items": [1], "total": 5}"#).unwrap();
        assert_eq!(items.items, [1]);
        assert_eq!(items.total, Some(5));

        let content: Page<u8> =
            serde_json::from_str(r#"{"content": [3], "totalElements": 1}"#)
                .unwrap();
        assert_eq!(content.items, [3]);
        assert_eq!(content.total, Some(1));

        let data: Page<u8> =
            serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(data.items.is_empty());

        assert!(serde_json::from_str::<Page<u8>>(r#"{"rows": []}"#).is_err());
    }

    #[test]
    fn has_more() {
        let request = Request::first(2);
        let full = Page {
            items: vec![1, 2],
            total: None,
        };
        let partial = Page {
            items: vec![1],
            total: None,
        };
        let counted = Page {
            items: vec![1, 2],
            total: Some(4),
        };

        assert!(full.has_more(request));
        assert!(!partial.has_more(request));
        assert!(counted.has_more(request));
        assert!(!counted.has_more(request.next()));
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        assert_eq!(
            Request::first(0).page_size,
            Request::DEFAULT_PAGE_SIZE,
        );
        assert_eq!(
            serde_json::to_value(Request::first(10)).unwrap(),
            serde_json::json!({"page": 0, "pageSize": 10}),
        );
    }
}
