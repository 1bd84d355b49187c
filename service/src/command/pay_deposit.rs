//! [`Command`] for paying the deposit of a [`Rental`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        payment::{self, intent, Checkpoint, TransactionRef},
        rental, Rental, Settlement,
    },
    infra::{gateway, scratch, Gateway, Scratch},
    inflight::{self, AlreadyInFlight},
    Service,
};

use super::{
    request_gateway_payment, resume_transition, transition, Command,
    Outcome, RequestGatewayPayment, Resume, Transition,
};

/// [`Command`] for paying the deposit of a [`Rental`], confirming it.
#[derive(Clone, Debug)]
pub struct PayDeposit {
    /// ID of the [`Rental`] to pay the deposit of.
    pub rental_id: rental::Id,

    /// [`payment::Method`] the deposit is paid with.
    pub method: payment::Method,
}

impl<Gw, Sc> Command<PayDeposit> for Service<Gw, Sc>
where
    Gw: Gateway<
        Select<By<Option<Rental>, rental::Id>>,
        Ok = Option<Rental>,
        Err = Traced<gateway::Error>,
    >,
    Sc: Scratch<
        Select<By<Option<Checkpoint>, rental::Id>>,
        Ok = Option<Checkpoint>,
        Err = Traced<scratch::Error>,
    >,
    Self: Command<
            Transition,
            Ok = Outcome,
            Err = Traced<transition::ExecutionError>,
        > + Command<
            Resume,
            Ok = Option<Outcome>,
            Err = Traced<resume_transition::ExecutionError>,
        > + Command<
            RequestGatewayPayment,
            Ok = Outcome,
            Err = Traced<request_gateway_payment::ExecutionError>,
        >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PayDeposit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayDeposit { rental_id, method } = cmd;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, inflight::Stage::Deposit)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let interrupted = self
            .scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(
                rental_id.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| inflight::Stage::from(c) == inflight::Stage::Deposit);
        if let Some(checkpoint) = interrupted {
            log::info!(
                "resuming `Checkpoint(token: {})` of `Rental(id: {rental_id})` \
                 instead of paying the deposit again",
                checkpoint.token,
            );
            if let Some(resumed) = self
                .execute(Resume(checkpoint))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            {
                return Ok(resumed);
            }
        }

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        if rental.status != rental::Status::Created {
            return Err(tracerr::new!(E::OrderNotAwaitingDeposit(
                rental.id,
                rental.status,
            )));
        }

        let amount = Settlement::deposit_for(rental.estimated_cost);

        if method.is_gateway_redirect() {
            return self
                .execute(RequestGatewayPayment {
                    rental_id,
                    kind: intent::Kind::Deposit,
                    amount,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E));
        }

        let transaction_ref =
            TransactionRef::deposit(&rental_id, DateTime::now());
        self.execute(Transition {
            payment: payment::New {
                rental_id,
                amount,
                method,
                transaction_ref,
            },
            current_status: rental.status,
            target_status: rental::Status::Confirmed,
        })
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`PayDeposit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Deposit of the [`Rental`] is being paid already.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// [`Rental`] is not awaiting its deposit.
    #[display("`Rental(id: {_0})` is `{_1}`, not awaiting a deposit")]
    OrderNotAwaitingDeposit(
        #[error(not(source))] rental::Id,
        #[error(not(source))] rental::Status,
    ),

    /// Redirecting to the payment gateway failed.
    #[display("{_0}")]
    #[from]
    Redirect(request_gateway_payment::ExecutionError),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// Completing an interrupted transition failed.
    #[display("{_0}")]
    #[from]
    Resume(resume_transition::ExecutionError),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),

    /// Recording the deposit failed.
    #[display("{_0}")]
    #[from]
    Transition(transition::ExecutionError),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::Outcome,
        domain::{
            payment::{self, intent, Checkpoint, Intent, Role},
            rental,
        },
        infra::{gateway::Fake, Scratch as _},
        inflight::Stage,
        testing::{payment, rental, service, vnd},
    };

    use super::{ExecutionError, PayDeposit};

    #[tokio::test]
    async fn confirms_order_with_cash_deposit() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));

        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::Cash,
            })
            .await
            .unwrap();

        let Outcome::Completed { payment, status } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(status, rental::Status::Confirmed);
        assert_eq!(payment.amount, vnd(105_000));
        assert_eq!(payment.role, Role::Deposit);
        assert!(payment
            .transaction_ref
            .as_ref()
            .starts_with("DEPOSIT_17_"));
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Confirmed),
        );
        assert!(!svc.in_flight().contains(&order.id, Stage::Deposit));
    }

    #[tokio::test]
    async fn redirects_gateway_deposit_without_transition() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));

        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::VnPay,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Redirect(..)));
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Created),
        );
        assert!(svc.gateway().state().payments.is_empty());
        let intent = svc
            .scratch()
            .execute(Select(By::<Option<Intent>, _>::new((
                order.id.clone(),
                intent::IssuanceDateTime::UNIX_EPOCH,
            ))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent.kind, intent::Kind::Deposit);
        assert_eq!(intent.amount, vnd(105_000));
    }

    #[tokio::test]
    async fn rejects_order_not_awaiting_deposit() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));

        let err = svc
            .execute(PayDeposit {
                rental_id: order.id,
                method: payment::Method::Cash,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::OrderNotAwaitingDeposit(
                _,
                rental::Status::Active,
            ),
        ));
        assert!(svc.gateway().state().payments.is_empty());
    }

    #[tokio::test]
    async fn rejects_concurrent_submission() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        let _held = svc
            .in_flight()
            .acquire(&order.id, Stage::Deposit)
            .unwrap();

        let err = svc
            .execute(PayDeposit {
                rental_id: order.id,
                method: payment::Method::Cash,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadyInFlight(..)));
        assert!(svc.gateway().state().payments.is_empty());
    }

    #[tokio::test]
    async fn resumes_instead_of_paying_twice() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        svc.gateway().state().failing.status_update = true;

        let err = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::Cash,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Transition(..)));
        assert_eq!(svc.gateway().state().payments.len(), 1);

        svc.gateway().state().failing.status_update = false;
        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::Cash,
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Resumed(rental::Status::Confirmed),
        ));
        assert_eq!(svc.gateway().state().payments.len(), 1);
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Confirmed),
        );
    }

    #[tokio::test]
    async fn retries_after_unrecorded_attempt() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        let stale = Checkpoint::start(
            &payment::New {
                rental_id: order.id.clone(),
                amount: vnd(105_000),
                method: payment::Method::Cash,
                transaction_ref: "DEPOSIT_17_1".to_owned().into(),
            },
            rental::Status::Confirmed,
        );
        svc.scratch().execute(Insert(stale)).await.unwrap();

        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id,
                method: payment::Method::Cash,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Completed { .. }));
        assert_eq!(svc.gateway().state().payments.len(), 1);
    }

    fn confirmation(rental_id: &rental::Id, tag: &str) -> Checkpoint {
        Checkpoint::start(
            &payment::New {
                rental_id: rental_id.clone(),
                amount: vnd(105_000),
                method: payment::Method::Cash,
                transaction_ref: tag.to_owned().into(),
            },
            rental::Status::Confirmed,
        )
    }

    #[tokio::test]
    async fn forgets_checkpoint_of_rental_moved_further() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));
        let mut done = confirmation(&order.id, "DEPOSIT_17_1");
        done.payment_recorded = true;
        svc.scratch().execute(Insert(done)).await.unwrap();

        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::Cash,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Resumed(rental::Status::Active)));
        assert!(svc.gateway().state().status_changes.is_empty());
        assert!(svc
            .scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(order.id)))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn never_records_deposit_twice_when_mark_is_lost() {
        let order = rental("17", 350_000, rental::Status::Created);
        let svc = service(Fake::with_rental(order.clone()));
        svc.gateway().state().payments.push(payment(
            "17",
            105_000,
            "DEPOSIT_17_1",
            payment::Status::Paid,
        ));
        svc.scratch()
            .execute(Insert(confirmation(&order.id, "DEPOSIT_17_1")))
            .await
            .unwrap();

        let outcome = svc
            .execute(PayDeposit {
                rental_id: order.id.clone(),
                method: payment::Method::Cash,
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Resumed(rental::Status::Confirmed),
        ));
        assert_eq!(svc.gateway().state().payments.len(), 1);
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Confirmed),
        );
    }
}
