//! Trip-related definitions of a returned vehicle.

use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};
use service::domain::trip;

use crate::{define_error, Context, Error};

/// Battery and odometer readings of a vehicle.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ReadingsInput")]
pub struct Readings {
    /// Battery level in percent, within `0..=100`.
    pub battery: i32,

    /// Odometer reading in kilometers.
    pub mileage: f64,
}

impl TryFrom<Readings> for trip::Readings {
    type Error = Error;

    fn try_from(readings: Readings) -> Result<Self, Self::Error> {
        let battery = i16::try_from(readings.battery)
            .map(trip::BatteryLevel::from)
            .ok()
            .filter(|b| b.is_in_range())
            .ok_or(TripError::InvalidReadings)?;
        let mileage = Some(readings.mileage)
            .filter(|m| m.is_finite() && *m >= 0.0)
            .and_then(Decimal::from_f64)
            .map(trip::Mileage::from)
            .ok_or(TripError::InvalidReadings)?;
        Ok(Self { battery, mileage })
    }
}

/// Slot of a required inspection photo.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PhotoSlot")]
pub enum PhotoSlot {
    /// Front exterior.
    Front,

    /// Rear exterior.
    Rear,

    /// Left exterior.
    Left,

    /// Right exterior.
    Right,

    /// Interior.
    Interior,
}

impl From<PhotoSlot> for trip::PhotoSlot {
    fn from(slot: PhotoSlot) -> Self {
        match slot {
            PhotoSlot::Front => Self::Front,
            PhotoSlot::Rear => Self::Rear,
            PhotoSlot::Left => Self::Left,
            PhotoSlot::Right => Self::Right,
            PhotoSlot::Interior => Self::Interior,
        }
    }
}

/// Inspection photo captured on return.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PhotoInput")]
pub struct Photo {
    /// Slot the photo is captured for.
    pub slot: PhotoSlot,

    /// Reference of the uploaded photo.
    pub reference: String,
}

/// Collects the provided [`Photo`]s into a [`trip::PhotoChecklist`].
///
/// A later [`Photo`] of the same slot replaces an earlier one.
pub(crate) fn checklist(
    photos: impl IntoIterator<Item = Photo>,
) -> trip::PhotoChecklist {
    let mut checklist = trip::PhotoChecklist::default();
    for Photo { slot, reference } in photos {
        checklist.capture(slot.into(), reference);
    }
    checklist
}

/// Summary of a trip.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "TripSummary", context = Context)]
pub struct Summary {
    /// Driven distance in kilometers.
    ///
    /// Negative if the odometer reading decreased.
    pub distance: f64,

    /// Used battery in percent.
    pub battery_used: i32,

    /// Duration of the trip in seconds.
    pub elapsed_seconds: f64,
}

impl From<trip::Summary> for Summary {
    fn from(summary: trip::Summary) -> Self {
        Self {
            distance: summary.distance.to_f64().unwrap_or_default(),
            battery_used: summary.battery_used.into(),
            elapsed_seconds: summary.elapsed.as_seconds_f64(),
        }
    }
}

define_error! {
    enum TripError {
        #[code = "INVALID_READINGS"]
        #[status = BAD_REQUEST]
        #[message = "Provided readings are invalid"]
        InvalidReadings,

        #[code = "PHOTOS_MISSING"]
        #[status = BAD_REQUEST]
        #[message = "Photos of all the inspection slots must be provided"]
        PhotosMissing,
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use service::domain::trip;

    use super::{checklist, Photo, PhotoSlot, Readings};

    #[test]
    fn converts_valid_readings() {
        let readings = trip::Readings::try_from(Readings {
            battery: 80,
            mileage: 1250.5,
        })
        .unwrap();

        assert_eq!(readings.battery.value(), 80);
        assert_eq!(readings.mileage.value(), Decimal::new(12505, 1));
    }

    #[test]
    fn rejects_invalid_readings() {
        for (battery, mileage) in
            [(101, 10.0), (-1, 10.0), (50, -0.5), (50, f64::NAN)]
        {
            let err =
                trip::Readings::try_from(Readings { battery, mileage })
                    .unwrap_err();

            assert_eq!(err.code, "INVALID_READINGS", "{battery} {mileage}");
        }
    }

    #[test]
    fn builds_checklist() {
        let photos = checklist([
            Photo {
                slot: PhotoSlot::Front,
                reference: "old".into(),
            },
            Photo {
                slot: PhotoSlot::Front,
                reference: "front.jpg".into(),
            },
            Photo {
                slot: PhotoSlot::Interior,
                reference: "inside.jpg".into(),
            },
        ]);

        assert_eq!(photos.get(trip::PhotoSlot::Front), Some("front.jpg"));
        assert_eq!(
            photos.missing(),
            [
                trip::PhotoSlot::Rear,
                trip::PhotoSlot::Left,
                trip::PhotoSlot::Right,
            ],
        );
    }
}
