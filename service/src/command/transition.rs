//! [`Command`] for recording a [`Payment`] and moving its [`Rental`] into
//! a new [`rental::Status`].

use common::operations::{By, Delete, Insert, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        payment::{self, Checkpoint, RedirectUrl},
        rental, Payment,
    },
    infra::{gateway, scratch, Gateway, Scratch},
    Service,
};
#[cfg(doc)]
use crate::domain::Rental;

use super::Command;

/// [`Command`] for recording a [`Payment`] and moving its [`Rental`] into
/// a new [`rental::Status`].
///
/// A [`Checkpoint`] is kept in the [`Scratch`] store while the transition
/// is in progress. If the [`rental::Status`] update fails after the
/// [`Payment`] is recorded, the [`Checkpoint`] remains, so the transition
/// can be completed later without recording the [`Payment`] again.
#[derive(Clone, Debug)]
pub struct Transition {
    /// [`payment::New`] to be recorded.
    pub payment: payment::New,

    /// Current [`rental::Status`] of the [`Rental`].
    pub current_status: rental::Status,

    /// [`rental::Status`] the [`Rental`] moves into.
    pub target_status: rental::Status,
}

/// Outcome of a payment submission.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Renter should be redirected to the external gateway page to pay.
    Redirect(RedirectUrl),

    /// [`Payment`] is recorded and the [`Rental`] moved into the
    /// [`rental::Status`].
    Completed {
        /// Recorded [`Payment`].
        payment: Payment,

        /// New [`rental::Status`] of the [`Rental`].
        status: rental::Status,
    },

    /// [`Payment`] was recorded earlier, and only the pending
    /// [`rental::Status`] update is completed now.
    Resumed(rental::Status),
}

impl<Gw, Sc> Command<Transition> for Service<Gw, Sc>
where
    Gw: Gateway<
            Insert<payment::New>,
            Ok = Payment,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Update<rental::StatusChange>,
            Ok = (),
            Err = Traced<gateway::Error>,
        >,
    Sc: Scratch<Insert<Checkpoint>, Ok = (), Err = Traced<scratch::Error>>
        + Scratch<
            Delete<By<Option<Checkpoint>, rental::Id>>,
            Ok = Option<Checkpoint>,
            Err = Traced<scratch::Error>,
        >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Transition) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Transition {
            payment,
            current_status,
            target_status,
        } = cmd;

        TransitionNotAllowed::check(
            &payment.rental_id,
            current_status,
            target_status,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut checkpoint = Checkpoint::start(&payment, target_status);
        self.scratch()
            .execute(Insert(checkpoint.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let recorded = match self.gateway().execute(Insert(payment)).await {
            Ok(p) => p,
            Err(e) => {
                // Nothing is recorded, so nothing is left to resume.
                _ = self
                    .scratch()
                    .execute(Delete(By::<Option<Checkpoint>, _>::new(
                        checkpoint.rental_id.clone(),
                    )))
                    .await
                    .map_err(|e| {
                        log::warn!(
                            "failed to discard `Checkpoint` of \
                             `Rental(id: {})`: {e}",
                            checkpoint.rental_id,
                        );
                    });
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }
        };

        // Failing to mark is tolerated: the recorded `Payment` is looked up by
        // its `TransactionRef` before the `Checkpoint` is ever discarded.
        checkpoint.payment_recorded = true;
        _ = self
            .scratch()
            .execute(Insert(checkpoint.clone()))
            .await
            .map_err(|e| {
                log::error!(
                    "failed to mark `Checkpoint` of `Rental(id: {})` as \
                     recorded: {e}",
                    checkpoint.rental_id,
                );
            });

        self.gateway()
            .execute(Update(checkpoint.status_change()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> StatusUpdateFailed))
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        _ = self
            .scratch()
            .execute(Delete(By::<Option<Checkpoint>, _>::new(
                checkpoint.rental_id.clone(),
            )))
            .await
            .map_err(|e| {
                log::warn!(
                    "failed to remove completed `Checkpoint` of \
                     `Rental(id: {})`: {e}",
                    checkpoint.rental_id,
                );
            });

        Ok(Outcome::Completed {
            payment: recorded,
            status: target_status,
        })
    }
}

/// Error of a [`rental::Status`] update failed after the [`Payment`] has
/// been recorded.
#[derive(Debug, Display, Error, From)]
#[display("`Rental` status update failed: {_0}")]
pub struct StatusUpdateFailed(gateway::Error);

/// Error of a [`Rental`] not allowed to move into a [`rental::Status`].
#[derive(Clone, Debug, Display, Error)]
#[display("`Rental(id: {rental_id})` cannot move from `{from}` to `{to}`")]
pub struct TransitionNotAllowed {
    /// ID of the [`Rental`].
    pub rental_id: rental::Id,

    /// Current [`rental::Status`] of the [`Rental`].
    pub from: rental::Status,

    /// Requested [`rental::Status`].
    pub to: rental::Status,
}

impl TransitionNotAllowed {
    /// Checks whether the [`Rental`] may move `from` the current
    /// [`rental::Status`] `to` the requested one.
    ///
    /// # Errors
    ///
    /// If [`rental::Status::can_transition_to`] forbids the move.
    pub fn check(
        rental_id: &rental::Id,
        from: rental::Status,
        to: rental::Status,
    ) -> Result<(), Self> {
        if from.can_transition_to(to) {
            return Ok(());
        }
        Err(Self {
            rental_id: rental_id.clone(),
            from,
            to,
        })
    }
}

/// Error of [`Transition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),

    /// [`Payment`] is recorded, but the [`Rental`] is not moved.
    #[display("{_0}")]
    #[from]
    StatusUpdateFailed(StatusUpdateFailed),

    /// [`Rental`] cannot move into the target [`rental::Status`].
    #[display("{_0}")]
    #[from]
    TransitionNotAllowed(TransitionNotAllowed),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        DateTime,
    };

    use crate::{
        domain::{
            payment::{self, Checkpoint, TransactionRef},
            rental,
        },
        infra::{gateway::Fake, Scratch as _},
        testing::{rental, service, vnd},
    };

    use super::{ExecutionError, Outcome, Transition};

    fn deposit(rental_id: &rental::Id) -> Transition {
        Transition {
            payment: payment::New {
                rental_id: rental_id.clone(),
                amount: vnd(105_000),
                method: payment::Method::Cash,
                transaction_ref: TransactionRef::deposit(
                    rental_id,
                    DateTime::now(),
                ),
            },
            current_status: rental::Status::Created,
            target_status: rental::Status::Confirmed,
        }
    }

    async fn checkpoint_of(
        svc: &crate::Service<Fake, crate::infra::scratch::Store>,
        id: &rental::Id,
    ) -> Option<Checkpoint> {
        svc.scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(id.clone())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn records_payment_then_moves_rental() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));

        let outcome = svc.execute(deposit(&order.id)).await.unwrap();

        assert!(matches!(
            outcome,
            Outcome::Completed {
                status: rental::Status::Confirmed,
                ..
            },
        ));
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Confirmed),
        );
        assert_eq!(svc.gateway().state().payments.len(), 1);
        assert_eq!(checkpoint_of(&svc, &order.id).await, None);
    }

    #[tokio::test]
    async fn keeps_checkpoint_on_status_failure() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        svc.gateway().state().failing.status_update = true;

        let err = svc.execute(deposit(&order.id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::StatusUpdateFailed(..),
        ));
        assert_eq!(svc.gateway().state().payments.len(), 1);
        let checkpoint = checkpoint_of(&svc, &order.id).await.unwrap();
        assert!(checkpoint.payment_recorded);
        assert_eq!(checkpoint.target_status, rental::Status::Confirmed);
    }

    #[tokio::test]
    async fn refuses_backward_transition() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));

        let err = svc
            .execute(Transition {
                current_status: rental::Status::Active,
                ..deposit(&order.id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TransitionNotAllowed(..),
        ));
        assert!(svc.gateway().state().payments.is_empty());
        assert_eq!(checkpoint_of(&svc, &order.id).await, None);
    }

    #[tokio::test]
    async fn discards_checkpoint_on_payment_failure() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        svc.gateway().state().failing.payment_insert = true;

        let err = svc.execute(deposit(&order.id)).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Gateway(..)));
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Created),
        );
        assert_eq!(checkpoint_of(&svc, &order.id).await, None);
    }
}
