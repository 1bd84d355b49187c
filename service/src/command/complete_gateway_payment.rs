//! [`Command`] for completing a payment made through the external gateway.

use common::operations::{By, Delete, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        payment::{intent, Intent},
        rental, Rental,
    },
    infra::{gateway, scratch, Gateway, Scratch},
    inflight::{AlreadyInFlight, Stage},
    Service,
};

use super::{
    transition::{StatusUpdateFailed, TransitionNotAllowed},
    Command,
};

/// [`Command`] for completing a payment the external gateway reported as
/// successful.
///
/// Moves the [`Rental`] of the pending [`Intent`] into its
/// [`Intent::target_status`] and clears the [`Intent`]. The [`Intent`] is
/// kept if the move fails, so the callback may be repeated until it
/// expires.
#[derive(Clone, Debug)]
pub struct CompleteGatewayPayment {
    /// ID of the [`Rental`] the gateway reported the payment of.
    pub rental_id: rental::Id,
}

impl<Gw, Sc> Command<CompleteGatewayPayment> for Service<Gw, Sc>
where
    Gw: Gateway<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Update<rental::StatusChange>,
            Ok = (),
            Err = Traced<gateway::Error>,
        >,
    Sc: Scratch<
            Select<By<Option<Intent>, (rental::Id, intent::IssuanceDateTime)>>,
            Ok = Option<Intent>,
            Err = Traced<scratch::Error>,
        > + Scratch<
            Delete<By<Option<Intent>, Intent>>,
            Ok = Option<Intent>,
            Err = Traced<scratch::Error>,
        >,
{
    type Ok = Intent;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteGatewayPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteGatewayPayment { rental_id } = cmd;

        let intent = self
            .scratch()
            .execute(Select(By::<Option<Intent>, _>::new((
                rental_id.clone(),
                self.intent_deadline(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NoPendingIntent(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, Stage::from(intent.kind))
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let target = intent.target_status();
        if rental.status.has_reached(target) {
            log::info!(
                "`Rental(id: {rental_id})` is `{}` already, repeated \
                 `{}` callback is ignored",
                rental.status,
                intent.kind,
            );
            self.clear_intent(&intent).await;
            return Ok(intent);
        }
        if let Err(e) =
            TransitionNotAllowed::check(&rental_id, rental.status, target)
        {
            log::warn!("discarding payment intent which cannot complete: {e}");
            self.clear_intent(&intent).await;
            return Err(tracerr::new!(E::TransitionNotAllowed(e)));
        }

        self.gateway()
            .execute(Update(rental::StatusChange {
                rental_id: rental_id.clone(),
                status: target,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> StatusUpdateFailed))
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.clear_intent(&intent).await;

        Ok(intent)
    }
}

impl<Gw, Sc> Service<Gw, Sc> {
    /// Removes the provided [`Intent`], unless it has been replaced already.
    async fn clear_intent(&self, intent: &Intent)
    where
        Sc: Scratch<
            Delete<By<Option<Intent>, Intent>>,
            Ok = Option<Intent>,
            Err = Traced<scratch::Error>,
        >,
    {
        _ = self
            .scratch()
            .execute(Delete(By::<Option<Intent>, _>::new(intent.clone())))
            .await
            .map_err(|e| {
                log::warn!(
                    "failed to clear completed payment intent of \
                     `Rental(id: {})`: {e}",
                    intent.rental_id,
                );
            });
    }
}

/// Error of [`CompleteGatewayPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Payment of the [`Rental`] is being submitted already.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// No unexpired payment [`Intent`] exists for the [`Rental`].
    #[display("`Rental(id: {_0})` has no pending payment intent")]
    NoPendingIntent(#[error(not(source))] rental::Id),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),

    /// Moving the [`Rental`] failed.
    #[display("{_0}")]
    #[from]
    StatusUpdateFailed(StatusUpdateFailed),

    /// [`Rental`] has moved where the payment cannot complete it.
    #[display("{_0}")]
    #[from]
    TransitionNotAllowed(TransitionNotAllowed),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use crate::{
        domain::{
            payment::{intent, Intent},
            rental,
        },
        infra::{gateway::Fake, scratch::Store, Scratch as _},
        inflight::Stage,
        testing::{rental, service, vnd},
        Service,
    };

    use super::{CompleteGatewayPayment, ExecutionError};

    async fn issue(
        svc: &Service<Fake, Store>,
        id: &rental::Id,
        kind: intent::Kind,
        amount: Money,
    ) {
        svc.scratch()
            .execute(Insert(Intent::issue(id.clone(), kind, amount)))
            .await
            .unwrap();
    }

    async fn pending(
        svc: &Service<Fake, Store>,
        id: &rental::Id,
    ) -> Option<Intent> {
        svc.scratch()
            .execute(Select(By::<Option<Intent>, _>::new((
                id.clone(),
                intent::IssuanceDateTime::UNIX_EPOCH,
            ))))
            .await
            .unwrap()
    }

    fn complete(id: &rental::Id) -> CompleteGatewayPayment {
        CompleteGatewayPayment {
            rental_id: id.clone(),
        }
    }

    #[tokio::test]
    async fn confirms_order_of_deposit_intent() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        issue(&svc, &order.id, intent::Kind::Deposit, vnd(105_000)).await;

        let intent = svc.execute(complete(&order.id)).await.unwrap();

        assert_eq!(intent.rental_id, order.id);
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Confirmed),
        );
        assert_eq!(pending(&svc, &order.id).await, None);
    }

    #[tokio::test]
    async fn closes_order_of_final_payment_intent() {
        let order = rental("17", 350_000, rental::Status::Completed);
        let svc = service(Fake::with_rental(order.clone()));
        issue(&svc, &order.id, intent::Kind::FinalPayment, vnd(245_000)).await;

        _ = svc.execute(complete(&order.id)).await.unwrap();

        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Closed),
        );
    }

    #[tokio::test]
    async fn completes_only_reported_rental() {
        let first = rental("17", 350_000, rental::Status::Created);
        let second = rental("18", 500_000, rental::Status::Created);
        let fake = Fake::with_rental(first.clone());
        fake.state().rentals.push(second.clone());
        let svc = service(fake);
        issue(&svc, &first.id, intent::Kind::Deposit, vnd(105_000)).await;
        issue(&svc, &second.id, intent::Kind::Deposit, vnd(150_000)).await;

        let intent = svc.execute(complete(&first.id)).await.unwrap();

        assert_eq!(intent.rental_id, first.id);
        assert_eq!(
            svc.gateway().status_of(&first.id),
            Some(rental::Status::Confirmed),
        );
        assert_eq!(
            svc.gateway().status_of(&second.id),
            Some(rental::Status::Created),
        );
        assert_eq!(pending(&svc, &first.id).await, None);
        assert_eq!(
            pending(&svc, &second.id).await.map(|i| i.amount),
            Some(vnd(150_000)),
        );
    }

    #[tokio::test]
    async fn ignores_expired_intent() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        let mut stale =
            Intent::issue(order.id.clone(), intent::Kind::Deposit, vnd(1));
        stale.issued_at = stale.issued_at - Duration::from_secs(3600);
        svc.scratch().execute(Insert(stale)).await.unwrap();

        let err = svc.execute(complete(&order.id)).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoPendingIntent(..)));
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Created),
        );
    }

    #[tokio::test]
    async fn keeps_intent_when_status_update_fails() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        svc.gateway().state().failing.status_update = true;
        issue(&svc, &order.id, intent::Kind::Deposit, vnd(105_000)).await;

        let err = svc.execute(complete(&order.id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::StatusUpdateFailed(..),
        ));
        assert!(pending(&svc, &order.id).await.is_some());
    }

    #[tokio::test]
    async fn ignores_repeated_callback() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));
        issue(&svc, &order.id, intent::Kind::Deposit, vnd(105_000)).await;

        _ = svc.execute(complete(&order.id)).await.unwrap();

        assert!(svc.gateway().state().status_changes.is_empty());
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Active),
        );
        assert_eq!(pending(&svc, &order.id).await, None);
    }

    #[tokio::test]
    async fn discards_intent_of_cancelled_rental() {
        let order = rental("17", 350_000, rental::Status::Cancelled);
        let svc = service(Fake::with_rental(order.clone()));
        issue(&svc, &order.id, intent::Kind::Deposit, vnd(105_000)).await;

        let err = svc.execute(complete(&order.id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TransitionNotAllowed(..),
        ));
        assert!(svc.gateway().state().status_changes.is_empty());
        assert_eq!(pending(&svc, &order.id).await, None);
    }

    #[tokio::test]
    async fn rejects_while_deposit_is_in_flight() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        issue(&svc, &order.id, intent::Kind::Deposit, vnd(105_000)).await;
        let _held = svc
            .in_flight()
            .acquire(&order.id, Stage::Deposit)
            .unwrap();

        let err = svc.execute(complete(&order.id)).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadyInFlight(..)));
        assert!(pending(&svc, &order.id).await.is_some());
    }
}
