//! [`Rental`] order definitions.

use common::{define_id, define_kind, unit, DateTimeOf, Money};
use serde::Deserialize;

use crate::domain::{trip, user, vehicle};
#[cfg(doc)]
use crate::domain::{Payment, Penalty, User, Vehicle};

/// Rental order of a [`Vehicle`] by a [`User`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`User`] renting the [`Vehicle`].
    pub renter_id: user::Id,

    /// ID of the rented [`Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// [`DateTime`] when this [`Rental`] starts.
    ///
    /// [`DateTime`]: common::DateTime
    pub start_time: StartDateTime,

    /// [`DateTime`] when this [`Rental`] is planned to end.
    ///
    /// [`DateTime`]: common::DateTime
    #[serde(default)]
    pub end_time: Option<EndDateTime>,

    /// Cost estimated when this [`Rental`] was booked.
    #[serde(with = "common::money::serde")]
    pub estimated_cost: Money,

    /// Cost computed by the rental service on checkout.
    ///
    /// Only meaningful once this [`Rental`] is [`Status::Completed`].
    #[serde(default, with = "common::money::serde::option")]
    pub actual_cost: Option<Money>,

    /// Current [`Status`] of this [`Rental`].
    pub status: Status,

    /// Battery level of the [`Vehicle`] at handover, if recorded.
    #[serde(default)]
    pub start_battery: Option<trip::BatteryLevel>,

    /// Odometer reading of the [`Vehicle`] at handover, if recorded.
    #[serde(default)]
    pub start_mileage: Option<trip::Mileage>,
}

impl Rental {
    /// Returns the [`trip::Readings`] recorded at handover, if both of them
    /// are known.
    #[must_use]
    pub fn start_readings(&self) -> Option<trip::Readings> {
        Some(trip::Readings {
            battery: self.start_battery?,
            mileage: self.start_mileage?,
        })
    }
}

define_id! {
    #[doc = "ID of a [`Rental`]."]
    Id
}

define_kind! {
    #[doc = "Status of a [`Rental`]."]
    enum Status {
        #[doc = "Booked, awaiting a deposit."]
        Created = "Created",

        #[doc = "Deposit is paid, awaiting handover."]
        Confirmed = "Confirmed",

        #[doc = "Vehicle is handed over and in use."]
        Active = "Active",

        #[doc = "Vehicle is returned and checked out, awaiting settlement."]
        Completed = "Completed",

        #[doc = "Settled and closed."]
        Closed = "Closed",

        #[doc = "Cancelled before handover."]
        Cancelled = "Cancelled",
    }
}

impl Status {
    /// Indicates whether a [`Rental`] may move from this [`Status`] to the
    /// `next` one.
    ///
    /// [`Status`]es only move forward along the rental lifecycle, and a
    /// [`Rental`] may be cancelled only before handover.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        use Status as S;

        match (self, next) {
            (S::Created, S::Confirmed | S::Cancelled)
            | (S::Confirmed, S::Active | S::Cancelled)
            | (S::Active, S::Completed)
            | (S::Completed, S::Closed) => true,
            (
                S::Created
                | S::Confirmed
                | S::Active
                | S::Completed
                | S::Closed
                | S::Cancelled,
                _,
            ) => false,
        }
    }

    /// Indicates whether this [`Status`] is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Indicates whether a [`Rental`] in this [`Status`] has already reached
    /// the `target` one, or moved past it along the rental lifecycle.
    ///
    /// A [`Status::Cancelled`] [`Rental`] reaches nothing but itself.
    #[must_use]
    pub const fn has_reached(self, target: Self) -> bool {
        match (self.progress(), target.progress()) {
            (Some(current), Some(target)) => current >= target,
            (None, None) => true,
            (None, Some(_)) | (Some(_), None) => false,
        }
    }

    /// Returns the position of this [`Status`] along the rental lifecycle,
    /// if it lies on it.
    const fn progress(self) -> Option<u8> {
        match self {
            Self::Created => Some(0),
            Self::Confirmed => Some(1),
            Self::Active => Some(2),
            Self::Completed => Some(3),
            Self::Closed => Some(4),
            Self::Cancelled => None,
        }
    }
}

/// Marker type of a [`Rental`] timestamp.
#[derive(Clone, Copy, Debug)]
pub struct Period;

/// [`DateTime`] when a [`Rental`] starts.
///
/// [`DateTime`]: common::DateTime
pub type StartDateTime = DateTimeOf<(Period, unit::Beginning)>;

/// [`DateTime`] when a [`Rental`] ends.
///
/// [`DateTime`]: common::DateTime
pub type EndDateTime = DateTimeOf<(Period, unit::Ending)>;

/// Request to move a [`Rental`] into a new [`Status`].
#[derive(Clone, Debug)]
pub struct StatusChange {
    /// ID of the [`Rental`] to update.
    pub rental_id: Id,

    /// New [`Status`] of the [`Rental`].
    pub status: Status,
}

/// Return of a [`Rental`]'s [`Vehicle`] submitted for checkout.
///
/// The rental service computes the actual cost and assesses [`Penalty`]s
/// upon receiving it.
#[derive(Clone, Debug)]
pub struct Checkout {
    /// ID of the checked out [`Rental`].
    pub rental_id: Id,

    /// [`trip::Readings`] at return.
    pub readings: trip::Readings,

    /// Free-text notes about damages found on inspection.
    pub damage_notes: Option<String>,

    /// Captured inspection photos.
    pub photos: trip::PhotoChecklist,
}
