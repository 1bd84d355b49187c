//! [`Checkpoint`] definitions.

use common::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::{Payment, Rental};

use super::{Method, New, Role, TransactionRef};

/// Progress of a two-step transition: recording a [`Payment`] and then
/// moving its [`Rental`] into a new [`rental::Status`].
///
/// Written before the first step and removed after the last one, so a
/// [`Checkpoint`] found later tells exactly which step is still missing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Unique token of this [`Checkpoint`].
    pub token: Uuid,

    /// ID of the transitioned [`Rental`].
    pub rental_id: rental::Id,

    /// [`Role`] of the recorded [`Payment`].
    pub role: Role,

    /// Amount of the recorded [`Payment`].
    #[serde(with = "common::money::serde")]
    pub amount: Money,

    /// [`Method`] of the recorded [`Payment`].
    pub method: Method,

    /// [`TransactionRef`] of the recorded [`Payment`].
    pub transaction_ref: TransactionRef,

    /// Indicates whether the [`Payment`] is already recorded.
    pub payment_recorded: bool,

    /// [`rental::Status`] the [`Rental`] moves into.
    pub target_status: rental::Status,
}

impl Checkpoint {
    /// Starts a new [`Checkpoint`] of recording the provided [`New`]
    /// [`Payment`] followed by moving its [`Rental`] into the
    /// `target_status`.
    #[must_use]
    pub fn start(payment: &New, target_status: rental::Status) -> Self {
        Self {
            token: Uuid::new_v4(),
            rental_id: payment.rental_id.clone(),
            role: payment.transaction_ref.role(),
            amount: payment.amount,
            method: payment.method,
            transaction_ref: payment.transaction_ref.clone(),
            payment_recorded: false,
            target_status,
        }
    }

    /// Returns the [`New`] [`Payment`] this [`Checkpoint`] records.
    #[must_use]
    pub fn payment(&self) -> New {
        New {
            rental_id: self.rental_id.clone(),
            amount: self.amount,
            method: self.method,
            transaction_ref: self.transaction_ref.clone(),
        }
    }

    /// Returns the [`rental::StatusChange`] completing this [`Checkpoint`].
    #[must_use]
    pub fn status_change(&self) -> rental::StatusChange {
        rental::StatusChange {
            rental_id: self.rental_id.clone(),
            status: self.target_status,
        }
    }
}
