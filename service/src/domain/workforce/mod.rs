//! Staff scheduling definitions.

pub mod shift;
pub mod workday;

use std::{fmt, str::FromStr};

use common::Date;
use derive_more::{Display, Error, From, Into};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{
    format_description::BorrowedFormatItem, macros::format_description,
};

pub use self::{
    shift::Shift,
    workday::{Assignment, BranchSchedule, StaffSchedule, Workday},
};

/// Wall-clock time of a day, exchanged as `HH:mm:ss`.
#[derive(
    Clone, Copy, Debug, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct TimeOfDay(time::Time);

impl TimeOfDay {
    /// Full format of a [`TimeOfDay`].
    const FORMAT: &'static [BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]:[second]");

    /// Short format of a [`TimeOfDay`], without seconds.
    const SHORT_FORMAT: &'static [BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]");
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(Self::FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for TimeOfDay {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Time::parse(s, Self::FORMAT)
            .or_else(|_| time::Time::parse(s, Self::SHORT_FORMAT))
            .map(Self)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// Inclusive range of calendar [`Date`]s of a schedule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateRange {
    /// First [`Date`] of this [`DateRange`].
    start: Date,

    /// Last [`Date`] of this [`DateRange`].
    end: Date,
}

impl DateRange {
    /// Creates a new [`DateRange`] checking it is not reversed.
    ///
    /// # Errors
    ///
    /// Returns [`ReversedRange`] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, ReversedRange> {
        if start > end {
            return Err(ReversedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first [`Date`] of this [`DateRange`].
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last [`Date`] of this [`DateRange`].
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Indicates whether the provided [`Date`] falls into this
    /// [`DateRange`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Error of a [`DateRange`] starting after its end.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("date range starts on {start} after it ends on {end}")]
pub struct ReversedRange {
    /// Requested start [`Date`].
    pub start: Date,

    /// Requested end [`Date`].
    pub end: Date,
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{DateRange, TimeOfDay};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_time_of_day() {
        let t: TimeOfDay = serde_json::from_str(r#""08:30:00""#).unwrap();
        assert_eq!(t.to_string(), "08:30:00");

        let short: TimeOfDay = "17:45".parse().unwrap();
        assert_eq!(short.to_string(), "17:45:00");

        assert!("25:00:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn rejects_reversed_range() {
        assert!(DateRange::new(date("2024-05-01"), date("2024-05-01")).is_ok());
        assert!(DateRange::new(date("2024-05-02"), date("2024-05-01")).is_err());

        let range =
            DateRange::new(date("2024-05-01"), date("2024-05-07")).unwrap();
        assert!(range.contains(date("2024-05-07")));
        assert!(!range.contains(date("2024-05-08")));
    }
}
