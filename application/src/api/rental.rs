//! [`Rental`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLObject, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::{domain, read};

use crate::{
    api::{self, scalar},
    define_error, Context,
};

/// A rental order of a vehicle.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Rental {
    /// Unique identifier of this `Rental`.
    pub id: Id,

    /// `User` renting the vehicle.
    pub renter_id: api::user::Id,

    /// Rented `Vehicle`.
    pub vehicle_id: api::fleet::VehicleId,

    /// `DateTime` when this `Rental` starts.
    pub start_time: DateTime,

    /// `DateTime` when this `Rental` ends, if known.
    pub end_time: Option<DateTime>,

    /// Cost estimated on booking.
    pub estimated_cost: Money,

    /// Cost computed on return, if the vehicle is returned.
    pub actual_cost: Option<Money>,

    /// Current status of this `Rental`.
    pub status: Status,

    /// Battery level in percent on handover, if recorded.
    pub start_battery: Option<i32>,

    /// Odometer reading in kilometers on handover, if recorded.
    pub start_mileage: Option<f64>,
}

impl From<domain::Rental> for Rental {
    fn from(rental: domain::Rental) -> Self {
        let domain::Rental {
            id,
            renter_id,
            vehicle_id,
            start_time,
            end_time,
            estimated_cost,
            actual_cost,
            status,
            start_battery,
            start_mileage,
        } = rental;
        Self {
            id: id.into(),
            renter_id: renter_id.into(),
            vehicle_id: vehicle_id.into(),
            start_time: start_time.coerce(),
            end_time: end_time.map(|t| t.coerce()),
            estimated_cost,
            actual_cost,
            status: status.into(),
            start_battery: start_battery.map(|b| b.value().into()),
            start_mileage: start_mileage.and_then(|m| m.value().to_f64()),
        }
    }
}

/// Unique identifier of a `Rental`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RentalId", with = scalar::Via::<domain::rental::Id>)]
pub struct Id(domain::rental::Id);

/// Status of a `Rental`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "RentalStatus")]
pub enum Status {
    /// Booked, awaiting a deposit.
    Created,

    /// Deposit is paid, awaiting handover.
    Confirmed,

    /// Vehicle is handed over and in use.
    Active,

    /// Vehicle is returned, awaiting settlement.
    Completed,

    /// Settled and closed.
    Closed,

    /// Cancelled before handover.
    Cancelled,
}

impl From<domain::rental::Status> for Status {
    fn from(status: domain::rental::Status) -> Self {
        use domain::rental::Status as S;

        match status {
            S::Created => Self::Created,
            S::Confirmed => Self::Confirmed,
            S::Active => Self::Active,
            S::Completed => Self::Completed,
            S::Closed => Self::Closed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

/// A penalty charged on top of a `Rental` cost.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Penalty {
    /// Unique identifier of this `Penalty`.
    pub id: String,

    /// Charged amount.
    pub amount: Money,

    /// Reason of this `Penalty`, if provided.
    pub reason: Option<String>,

    /// `DateTime` when this `Penalty` was issued, if known.
    pub issued_at: Option<DateTime>,
}

impl From<domain::Penalty> for Penalty {
    fn from(penalty: domain::Penalty) -> Self {
        Self {
            id: penalty.id.to_string(),
            amount: penalty.amount,
            reason: penalty.reason,
            issued_at: penalty.issued_at.map(|t| t.coerce()),
        }
    }
}

/// Everything known about a `Rental` at the moment of the request.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "RentalSession", context = Context)]
pub struct Session {
    /// Loaded `Rental`.
    pub rental: Rental,

    /// `Payment`s of the `Rental`.
    ///
    /// Empty if the payment service failed to respond.
    pub payments: Vec<api::payment::Payment>,

    /// `Penalty`s of the `Rental`.
    ///
    /// Empty if the penalty service failed to respond.
    pub penalties: Vec<Penalty>,

    /// Settlement calculated over this `RentalSession`.
    pub settlement: api::settlement::Settlement,

    /// Pending placeholder of the final settlement, if any.
    pub pending_final_payment: Option<api::payment::Payment>,
}

impl From<read::Session> for Session {
    fn from(session: read::Session) -> Self {
        let settlement = session.settlement().into();
        let pending_final_payment =
            session.pending_final_payment().cloned().map(Into::into);
        let read::Session {
            rental,
            payments,
            penalties,
        } = session;
        Self {
            rental: rental.into(),
            payments: payments.into_iter().map(Into::into).collect(),
            penalties: penalties.into_iter().map(Into::into).collect(),
            settlement,
            pending_final_payment,
        }
    }
}

define_error! {
    enum RentalError {
        #[code = "RENTAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rental` with the provided ID does not exist"]
        NotExists,

        #[code = "ORDER_NOT_AWAITING_DEPOSIT"]
        #[status = CONFLICT]
        #[message = "`Rental` is not awaiting a deposit"]
        NotAwaitingDeposit,

        #[code = "ORDER_NOT_ACTIVE"]
        #[status = CONFLICT]
        #[message = "`Rental` is not active"]
        NotActive,

        #[code = "NOT_COMPLETED"]
        #[status = CONFLICT]
        #[message = "`Rental` must be completed before it is settled"]
        NotCompleted,

        #[code = "NO_PENDING_TRANSITION"]
        #[status = CONFLICT]
        #[message = "`Rental` has no unfinished payment transition"]
        NoPendingTransition,
    }
}
