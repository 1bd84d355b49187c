//! Opaque identifiers of remote entities.

use std::fmt;

use serde::{de, Deserializer};

/// Defines an opaque string identifier.
///
/// Remote services are free to use numeric or textual identifiers, so the
/// defined type accepts both on input and keeps them as strings.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_id {
    (
        #[doc = $doc:literal]
        $name:ident
    ) => {
        #[derive(
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[doc = $doc]
        pub struct $name(::std::string::String);

        impl $name {
            /// Returns this identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    Err("empty identifier")
                } else {
                    Ok(Self(s.to_owned()))
                }
            }
        }

        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                $crate::id::deserialize(deserializer).map(Self)
            }
        }
    };
}

/// Deserializes an opaque identifier from either a string or an integer.
///
/// # Errors
///
/// Returns an error if the input is neither a non-empty string nor an
/// integer.
pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    deserializer.deserialize_any(Visitor)
}

/// [`de::Visitor`] of an opaque identifier.
struct Visitor;

impl de::Visitor<'_> for Visitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty string or an integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        } else {
            Ok(v.to_owned())
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }
}
