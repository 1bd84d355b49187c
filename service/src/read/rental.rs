//! [`Session`] read model definition.

use tracing as log;

use crate::domain::{Payment, Penalty, Rental, Settlement};

/// Everything known about a [`Rental`] at a single moment.
///
/// Loaded fresh on every stage, and never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Loaded [`Rental`].
    pub rental: Rental,

    /// [`Payment`]s of the [`Rental`].
    pub payments: Vec<Payment>,

    /// [`Penalty`]s of the [`Rental`].
    pub penalties: Vec<Penalty>,
}

impl Session {
    /// Returns the pending [`Payment`] placeholder of the final settlement.
    ///
    /// If more than one exists, the first one is returned.
    #[must_use]
    pub fn pending_final_payment(&self) -> Option<&Payment> {
        let mut pending = self.payments.iter().filter(|p| p.is_pending_final());
        let first = pending.next();
        let rest = pending.count();
        if rest > 0 {
            log::warn!(
                "`Rental(id: {})` has {} pending final payments, using the \
                 first one",
                self.rental.id,
                rest + 1,
            );
        }
        first
    }

    /// Returns the paid deposits of the [`Rental`].
    pub fn paid_deposits(&self) -> impl Iterator<Item = &Payment> + '_ {
        self.payments.iter().filter(|p| p.is_paid_deposit())
    }

    /// Calculates the [`Settlement`] of the [`Rental`].
    #[must_use]
    pub fn settlement(&self) -> Settlement {
        let deposits = self.paid_deposits().count();
        if deposits > 1 {
            log::warn!(
                "`Rental(id: {})` has {deposits} paid deposits, summing them",
                self.rental.id,
            );
        }
        Settlement::of(&self.rental, &self.payments, &self.penalties)
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{payment, rental},
        testing::{payment, rental, vnd},
    };

    use super::Session;

    #[test]
    fn picks_first_pending_final_payment() {
        let session = Session {
            rental: rental("17", 350_000, rental::Status::Completed),
            payments: vec![
                payment("17", 105_000, "DEPOSIT_17_1", payment::Status::Paid),
                payment(
                    "17",
                    245_000,
                    "FINAL_PAYMENT_a",
                    payment::Status::Pending,
                ),
                payment(
                    "17",
                    0,
                    "NO_ADDITIONAL_PAYMENT_b",
                    payment::Status::Pending,
                ),
            ],
            penalties: vec![],
        };

        let pending = session.pending_final_payment().unwrap();

        assert_eq!(pending.amount, vnd(245_000));
        assert_eq!(session.paid_deposits().count(), 1);
    }

    #[test]
    fn ignores_settled_final_payment() {
        let session = Session {
            rental: rental("17", 350_000, rental::Status::Completed),
            payments: vec![payment(
                "17",
                245_000,
                "FINAL_PAYMENT_a",
                payment::Status::Paid,
            )],
            penalties: vec![],
        };

        assert_eq!(session.pending_final_payment(), None);
    }

    #[test]
    fn settles_over_paid_deposit() {
        let session = Session {
            rental: rental("17", 350_000, rental::Status::Completed),
            payments: vec![payment(
                "17",
                100_000,
                "DEPOSIT_17_1",
                payment::Status::Paid,
            )],
            penalties: vec![],
        };

        assert_eq!(session.settlement().final_amount, vnd(250_000));
    }
}
