//! [`Shift`] definitions.

use common::define_id;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// Named working time interval staff members are assigned to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// ID of this [`Shift`].
    pub id: Id,

    /// Name of this [`Shift`].
    #[serde(alias = "shiftName")]
    pub name: String,

    /// [`Hours`] of this [`Shift`].
    #[serde(flatten)]
    pub hours: Hours,
}

define_id! {
    #[doc = "ID of a [`Shift`]."]
    Id
}

/// Working hours of a [`Shift`] within a single day.
///
/// Overnight [`Shift`]s are not supported: a [`Shift`] always starts
/// strictly before it ends.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", try_from = "RawHours")]
pub struct Hours {
    /// [`TimeOfDay`] this [`Shift`] starts at.
    start_time: TimeOfDay,

    /// [`TimeOfDay`] this [`Shift`] ends at.
    end_time: TimeOfDay,
}

impl Hours {
    /// Creates new [`Hours`] checking they are not empty or reversed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHours`] if `start` is not before `end`.
    pub fn new(
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, InvalidHours> {
        if start >= end {
            return Err(InvalidHours { start, end });
        }
        Ok(Self {
            start_time: start,
            end_time: end,
        })
    }

    /// Returns the [`TimeOfDay`] these [`Hours`] start at.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start_time
    }

    /// Returns the [`TimeOfDay`] these [`Hours`] end at.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end_time
    }

    /// Indicates whether these [`Hours`] overlap with the `other` ones.
    ///
    /// Adjacent [`Hours`] do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Unchecked [`Hours`] as exchanged on the wire.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHours {
    /// [`TimeOfDay`] the [`Shift`] starts at.
    start_time: TimeOfDay,

    /// [`TimeOfDay`] the [`Shift`] ends at.
    end_time: TimeOfDay,
}

impl TryFrom<RawHours> for Hours {
    type Error = InvalidHours;

    fn try_from(raw: RawHours) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}

/// Error of [`Hours`] not starting before they end.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("shift must start before it ends, got {start}..{end}")]
pub struct InvalidHours {
    /// Requested start [`TimeOfDay`].
    pub start: TimeOfDay,

    /// Requested end [`TimeOfDay`].
    pub end: TimeOfDay,
}

/// Attributes of a [`Shift`] to be created or updated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Name of the [`Shift`].
    pub name: String,

    /// [`Hours`] of the [`Shift`].
    #[serde(flatten)]
    pub hours: Hours,
}

/// Update of an existing [`Shift`].
#[derive(Clone, Debug)]
pub struct Edit {
    /// ID of the updated [`Shift`].
    pub id: Id,

    /// New attributes of the [`Shift`].
    pub draft: Draft,
}
