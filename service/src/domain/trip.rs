//! Trip readings and return inspection definitions.

use std::ops::Sub;

use common::{define_kind, DateTime};
use derive_more::{Display, Error, From, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::{Rental, Vehicle};

/// Battery level of a [`Vehicle`], in percent.
///
/// Kept as reported: whether it fits into `0..=100` is decided by
/// [`Validation::battery_range`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{_0}%")]
#[serde(transparent)]
pub struct BatteryLevel(i16);

impl BatteryLevel {
    /// Indicates whether this [`BatteryLevel`] is a valid percentage.
    #[must_use]
    pub const fn is_in_range(self) -> bool {
        self.0 >= 0 && self.0 <= 100
    }

    /// Returns the raw value of this [`BatteryLevel`].
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }
}

/// Odometer reading of a [`Vehicle`], in kilometers.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{_0} km")]
#[serde(transparent)]
pub struct Mileage(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Mileage {
    /// Returns the raw value of this [`Mileage`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl Sub for Mileage {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

/// [`Vehicle`] readings taken at handover or at return.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Readings {
    /// [`BatteryLevel`] reading.
    pub battery: BatteryLevel,

    /// [`Mileage`] reading.
    pub mileage: Mileage,
}

define_kind! {
    #[doc = "Slot of a required inspection photo."]
    enum PhotoSlot {
        #[doc = "Front exterior."]
        Front = "FRONT",

        #[doc = "Rear exterior."]
        Rear = "REAR",

        #[doc = "Left exterior."]
        Left = "LEFT",

        #[doc = "Right exterior."]
        Right = "RIGHT",

        #[doc = "Interior."]
        Interior = "INTERIOR",
    }
}

impl PhotoSlot {
    /// Returns the position of this [`PhotoSlot`] in a [`PhotoChecklist`].
    const fn index(self) -> usize {
        match self {
            Self::Front => 0,
            Self::Rear => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Interior => 4,
        }
    }
}

/// Inspection photos captured at return, one per [`PhotoSlot`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PhotoChecklist([Option<String>; 5]);

impl PhotoChecklist {
    /// Records the photo `reference` captured for the provided [`PhotoSlot`],
    /// replacing the previous one.
    pub fn capture(&mut self, slot: PhotoSlot, reference: impl Into<String>) {
        self.0[slot.index()] = Some(reference.into());
    }

    /// Returns the photo reference captured for the provided [`PhotoSlot`].
    #[must_use]
    pub fn get(&self, slot: PhotoSlot) -> Option<&str> {
        self.0[slot.index()].as_deref()
    }

    /// Returns [`PhotoSlot`]s having no photo captured yet.
    #[must_use]
    pub fn missing(&self) -> Vec<PhotoSlot> {
        PhotoSlot::ALL
            .iter()
            .copied()
            .filter(|s| self.get(*s).is_none())
            .collect()
    }

    /// Indicates whether every [`PhotoSlot`] has a photo captured.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Iterates over the captured photos along with their [`PhotoSlot`]s.
    pub fn captured(&self) -> impl Iterator<Item = (PhotoSlot, &str)> + '_ {
        PhotoSlot::ALL
            .iter()
            .filter_map(|s| self.get(*s).map(|r| (*s, r)))
    }
}

/// Summary of a trip between handover and return.
///
/// Differences are signed and never clamped, so inconsistent readings show
/// up as negative values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Summary {
    /// Driven distance, in kilometers.
    pub distance: Decimal,

    /// Consumed battery, in percentage points.
    pub battery_used: i16,

    /// Time between handover and return.
    pub elapsed: time::Duration,
}

impl Summary {
    /// Computes a [`Summary`] of the trip between the provided [`Readings`].
    #[must_use]
    pub fn new(
        start: Readings,
        end: Readings,
        started_at: rental::StartDateTime,
        ended_at: DateTime,
    ) -> Self {
        Self {
            distance: end.mileage - start.mileage,
            battery_used: start
                .battery
                .value()
                .saturating_sub(end.battery.value()),
            elapsed: ended_at.signed_since(started_at),
        }
    }
}

/// Configurable checks of return [`Readings`] and photos.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, SmartDefault)]
#[serde(default)]
pub struct Validation {
    /// Whether [`BatteryLevel`]s must fit into `0..=100`.
    #[default = false]
    pub battery_range: bool,

    /// Whether the return [`Mileage`] must not be lower than the handover
    /// one.
    #[default = false]
    pub monotonic_mileage: bool,

    /// Whether every [`PhotoSlot`] must have a photo captured.
    #[default = true]
    pub require_all_photos: bool,
}

impl Validation {
    /// Checks the return [`Readings`] and photos against the handover
    /// [`Readings`], if known.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn check(
        &self,
        start: Option<Readings>,
        end: Readings,
        photos: &PhotoChecklist,
    ) -> Result<(), Violation> {
        if self.battery_range {
            if let Some(level) = start
                .map(|r| r.battery)
                .into_iter()
                .chain([end.battery])
                .find(|l| !l.is_in_range())
            {
                return Err(Violation::BatteryOutOfRange(level));
            }
        }
        if self.monotonic_mileage {
            if let Some(start) = start {
                if end.mileage < start.mileage {
                    return Err(Violation::MileageDecreased {
                        start: start.mileage,
                        end: end.mileage,
                    });
                }
            }
        }
        if self.require_all_photos && !photos.is_complete() {
            return Err(Violation::PhotosMissing(photos.missing()));
        }
        Ok(())
    }
}

/// Violation of a [`Validation`] check.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum Violation {
    /// [`BatteryLevel`] is not a valid percentage.
    #[display("battery level {_0} is out of `0..=100` range")]
    BatteryOutOfRange(#[error(not(source))] BatteryLevel),

    /// Return [`Mileage`] is lower than the handover one.
    #[display("mileage decreased from {start} to {end}")]
    MileageDecreased {
        /// Handover [`Mileage`].
        start: Mileage,

        /// Return [`Mileage`].
        end: Mileage,
    },

    /// Some [`PhotoSlot`]s have no photo captured.
    #[display("photos are missing: {_0:?}")]
    PhotosMissing(#[error(not(source))] Vec<PhotoSlot>),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use rust_decimal::Decimal;

    use crate::domain::rental;

    use super::{
        BatteryLevel, Mileage, PhotoChecklist, PhotoSlot, Readings, Summary,
        Validation, Violation,
    };

    fn readings(battery: i16, mileage: i64) -> Readings {
        Readings {
            battery: BatteryLevel::from(battery),
            mileage: Mileage::from(Decimal::from(mileage)),
        }
    }

    fn full_checklist() -> PhotoChecklist {
        let mut photos = PhotoChecklist::default();
        for &slot in PhotoSlot::ALL {
            photos.capture(slot, format!("photo-{slot}"));
        }
        photos
    }

    #[test]
    fn summarizes_trip() {
        let ended_at = DateTime::now();
        let started_at: rental::StartDateTime =
            (ended_at - Duration::from_secs(3 * 3600)).coerce();

        let summary = Summary::new(
            readings(90, 1200),
            readings(55, 1340),
            started_at,
            ended_at,
        );

        assert_eq!(summary.distance, Decimal::from(140));
        assert_eq!(summary.battery_used, 35);
        assert_eq!(summary.elapsed, time::Duration::hours(3));
    }

    #[test]
    fn keeps_negative_differences() {
        let started_at = rental::StartDateTime::now();

        let summary = Summary::new(
            readings(40, 1200),
            readings(60, 1100),
            started_at,
            started_at.coerce(),
        );

        assert_eq!(summary.distance, Decimal::from(-100));
        assert_eq!(summary.battery_used, -20);
        assert_eq!(summary.elapsed, time::Duration::ZERO);
    }

    #[test]
    fn lists_missing_photos() {
        let mut photos = PhotoChecklist::default();
        photos.capture(PhotoSlot::Front, "f.jpg");
        photos.capture(PhotoSlot::Interior, "i.jpg");

        assert!(!photos.is_complete());
        assert_eq!(
            photos.missing(),
            [PhotoSlot::Rear, PhotoSlot::Left, PhotoSlot::Right],
        );
        assert_eq!(photos.captured().count(), 2);
        assert!(full_checklist().is_complete());
    }

    #[test]
    fn default_validation_trusts_readings() {
        let validation = Validation::default();
        let photos = full_checklist();

        assert!(validation
            .check(Some(readings(90, 1200)), readings(50, 1100), &photos)
            .is_ok());
        assert!(validation
            .check(None, readings(101, 1100), &photos)
            .is_ok());
        assert_eq!(
            validation.check(
                None,
                readings(50, 1100),
                &PhotoChecklist::default(),
            ),
            Err(Violation::PhotosMissing(PhotoSlot::ALL.to_vec())),
        );
    }

    #[test]
    fn checks_battery_range_when_enabled() {
        let validation = Validation {
            battery_range: true,
            ..Validation::default()
        };

        assert_eq!(
            validation.check(
                Some(readings(-5, 1200)),
                readings(50, 1300),
                &full_checklist(),
            ),
            Err(Violation::BatteryOutOfRange(BatteryLevel::from(-5))),
        );
        assert!(validation
            .check(Some(readings(100, 1200)), readings(0, 1300), &full_checklist())
            .is_ok());
    }

    #[test]
    fn checks_mileage_when_enabled() {
        let validation = Validation {
            monotonic_mileage: true,
            ..Validation::default()
        };

        assert!(matches!(
            validation.check(
                Some(readings(90, 1200)),
                readings(50, 1100),
                &full_checklist(),
            ),
            Err(Violation::MileageDecreased { .. }),
        ));
    }
}
