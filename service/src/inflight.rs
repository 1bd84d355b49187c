//! Registry of in-flight stage submissions.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use common::define_kind;
use derive_more::{Display, Error};

use crate::domain::{
    payment::{self, intent, Checkpoint},
    rental,
};
#[cfg(doc)]
use crate::domain::{Payment, Rental};

define_kind! {
    #[doc = "Stage of a [`Rental`] accepting a submission."]
    enum Stage {
        #[doc = "Paying the deposit."]
        Deposit = "DEPOSIT",

        #[doc = "Signing the contract."]
        Contract = "CONTRACT",

        #[doc = "Checking out the returned vehicle."]
        Return = "RETURN",

        #[doc = "Settling the final payment."]
        Settlement = "SETTLEMENT",
    }
}

impl From<intent::Kind> for Stage {
    fn from(kind: intent::Kind) -> Self {
        match kind {
            intent::Kind::Deposit => Self::Deposit,
            intent::Kind::FinalPayment => Self::Settlement,
        }
    }
}

impl From<&Checkpoint> for Stage {
    /// Returns the [`Stage`] the [`Payment`] of the provided [`Checkpoint`]
    /// is recorded at.
    fn from(checkpoint: &Checkpoint) -> Self {
        use payment::Role as R;

        match checkpoint.role {
            R::Deposit => Self::Deposit,
            R::FinalPayment
            | R::Refund
            | R::NoAdditionalPayment
            | R::FinalPaid
            | R::RefundCompleted
            | R::Other => Self::Settlement,
        }
    }
}

/// Key of an in-flight submission.
type Key = (rental::Id, Stage);

/// Registry of submissions being processed, allowing at most one per
/// [`Rental`] and [`Stage`].
#[derive(Clone, Debug, Default)]
pub struct InFlight(Arc<Mutex<HashSet<Key>>>);

impl InFlight {
    /// Registers a submission of the provided [`Stage`] for the provided
    /// [`Rental`].
    ///
    /// The submission stays registered until the returned [`Guard`] is
    /// dropped.
    ///
    /// # Errors
    ///
    /// With [`AlreadyInFlight`] if the same submission is being processed
    /// already.
    pub fn acquire(
        &self,
        rental_id: &rental::Id,
        stage: Stage,
    ) -> Result<Guard, AlreadyInFlight> {
        let key = (rental_id.clone(), stage);
        let inserted = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        if !inserted {
            return Err(AlreadyInFlight {
                rental_id: key.0,
                stage,
            });
        }
        Ok(Guard {
            registry: self.clone(),
            key: Some(key),
        })
    }

    /// Indicates whether a submission of the provided [`Stage`] is being
    /// processed for the provided [`Rental`].
    #[must_use]
    pub fn contains(&self, rental_id: &rental::Id, stage: Stage) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(rental_id.clone(), stage))
    }
}

/// Guard of a registered submission, releasing it on drop.
#[derive(Debug)]
pub struct Guard {
    /// [`InFlight`] registry the submission is registered in.
    registry: InFlight,

    /// Registered [`Key`].
    key: Option<Key>,
}

impl Drop for Guard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            _ = self
                .registry
                .0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
        }
    }
}

/// Error of a submission being processed already.
#[derive(Clone, Debug, Display, Error)]
#[display("`{stage}` of `Rental(id: {rental_id})` is already in flight")]
pub struct AlreadyInFlight {
    /// ID of the [`Rental`].
    pub rental_id: rental::Id,

    /// Submitted [`Stage`].
    pub stage: Stage,
}
