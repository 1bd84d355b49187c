//! [`Preview`] read model definition.

use crate::domain::{rental, Settlement};
#[cfg(doc)]
use crate::domain::Rental;

use super::Session;

/// Stage of settling a [`Rental`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// [`Rental`] is not completed yet.
    NotCompleted,

    /// [`Rental`] has no pending final payment.
    AlreadySettled,

    /// Renter gets a refund.
    RefundDue,

    /// Renter has to pay.
    PaymentDue,
}

/// [`Settlement`] of a [`Rental`] along with its [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preview {
    /// Calculated [`Settlement`].
    pub settlement: Settlement,

    /// Settling [`Stage`].
    pub stage: Stage,
}

impl Preview {
    /// Previews the settlement of the provided [`Session`].
    #[must_use]
    pub fn of(session: &Session) -> Self {
        let settlement = session.settlement();
        let stage = if session.rental.status != rental::Status::Completed {
            Stage::NotCompleted
        } else if session.pending_final_payment().is_none() {
            Stage::AlreadySettled
        } else if settlement.is_refund() {
            Stage::RefundDue
        } else {
            Stage::PaymentDue
        };
        Self { settlement, stage }
    }
}
