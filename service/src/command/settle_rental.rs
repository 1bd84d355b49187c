//! [`Command`] for settling the final payment of a [`Rental`].

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
        rental,
    },
    infra::{scratch, Scratch},
    inflight::{self, AlreadyInFlight},
    query::{rental_session, RentalSession},
    read::Session,
    Query, Service,
};
#[cfg(doc)]
use crate::domain::{Payment, Rental};

use super::{
    request_gateway_payment, resume_transition, transition, Command,
    Outcome, RequestGatewayPayment, Resume, Transition,
};

/// [`Command`] for settling the final payment of a completed [`Rental`],
/// closing it.
///
/// A refund needs no [`payment::Method`], while a due amount (even a zero
/// one) does.
#[derive(Clone, Debug)]
pub struct SettleRental {
    /// ID of the [`Rental`] to settle.
    pub rental_id: rental::Id,

    /// [`payment::Method`] the due amount is paid with.
    pub method: Option<payment::Method>,
}

impl<Gw, Sc> Command<SettleRental> for Service<Gw, Sc>
where
    Sc: Scratch<
        Select<By<Option<Checkpoint>, rental::Id>>,
        Ok = Option<Checkpoint>,
        Err = Traced<scratch::Error>,
    >,
    Self: Query<
            RentalSession,
            Ok = Session,
            Err = Traced<rental_session::ExecutionError>,
        > + Command<
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

    async fn execute(&self, cmd: SettleRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SettleRental { rental_id, method } = cmd;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, inflight::Stage::Settlement)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let session = self
            .execute(RentalSession {
                rental_id: rental_id.clone(),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let interrupted = self
            .scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(
                rental_id.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| {
                inflight::Stage::from(c) == inflight::Stage::Settlement
            });
        if let Some(checkpoint) = interrupted {
            log::info!(
                "resuming `Checkpoint(token: {})` of `Rental(id: {rental_id})` \
                 instead of settling it again",
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

        if session.rental.status != rental::Status::Completed {
            return Err(tracerr::new!(E::NotCompleted(
                rental_id,
                session.rental.status,
            )));
        }

        if session.pending_final_payment().is_none() {
            return Err(tracerr::new!(E::AlreadySettled(rental_id)));
        }

        let settlement = session.settlement();
        let now = DateTime::now();

        let payment = if settlement.is_refund() {
            payment::New {
                rental_id,
                amount: settlement.displayed_amount(),
                method: payment::Method::Cash,
                transaction_ref: TransactionRef::refund_completed(now),
            }
        } else {
            let method = method
                .ok_or_else(|| E::PaymentMethodRequired(rental_id.clone()))
                .map_err(tracerr::wrap!())?;
            if method.is_gateway_redirect() {
                return self
                    .execute(RequestGatewayPayment {
                        rental_id,
                        kind: intent::Kind::FinalPayment,
                        amount: settlement.final_amount,
                    })
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E));
            }
            payment::New {
                rental_id,
                amount: settlement.final_amount,
                method,
                transaction_ref: TransactionRef::final_paid(now),
            }
        };

        self.execute(Transition {
            payment,
            current_status: session.rental.status,
            target_status: rental::Status::Closed,
        })
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SettleRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Rental`] is being settled already.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Rental`] has no pending final [`Payment`].
    #[display("`Rental(id: {_0})` is already settled")]
    AlreadySettled(#[error(not(source))] rental::Id),

    /// [`Rental`] is not completed yet.
    #[display("`Rental(id: {_0})` is `{_1}`, not completed")]
    NotCompleted(
        #[error(not(source))] rental::Id,
        #[error(not(source))] rental::Status,
    ),

    /// Due amount requires a [`payment::Method`].
    #[display("`Rental(id: {_0})` settlement requires a payment method")]
    PaymentMethodRequired(#[error(not(source))] rental::Id),

    /// Redirecting to the payment gateway failed.
    #[display("{_0}")]
    #[from]
    Redirect(request_gateway_payment::ExecutionError),

    /// Completing an interrupted transition failed.
    #[display("{_0}")]
    #[from]
    Resume(resume_transition::ExecutionError),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),

    /// Loading the [`Rental`] failed.
    #[display("{_0}")]
    #[from]
    Session(rental_session::ExecutionError),

    /// Recording the final [`Payment`] failed.
    #[display("{_0}")]
    #[from]
    Transition(transition::ExecutionError),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::{transition, Outcome},
        domain::{
            payment::{self, intent, Checkpoint, Intent, Role},
            rental, Penalty,
        },
        infra::{gateway::Fake, Scratch as _},
        testing::{payment, rental, service, vnd},
    };

    use super::{ExecutionError, SettleRental};

    /// Creates a [`Fake`] knowing a completed [`rental`] with a paid deposit,
    /// the provided penalties, and a pending final payment placeholder.
    fn completed(estimated: i64, deposit: i64, penalties: &[i64]) -> Fake {
        let fake = Fake::with_rental(rental(
            "17",
            estimated,
            rental::Status::Completed,
        ));
        {
            let mut state = fake.state();
            state.payments.push(payment(
                "17",
                deposit,
                "DEPOSIT_17_1",
                payment::Status::Paid,
            ));
            state.payments.push(payment(
                "17",
                0,
                "FINAL_PAYMENT_17",
                payment::Status::Pending,
            ));
            for (n, amount) in penalties.iter().enumerate() {
                state.penalties.push(Penalty {
                    id: format!("pen-{n}").parse().unwrap(),
                    rental_id: "17".parse().unwrap(),
                    amount: vnd(*amount),
                    reason: None,
                    issued_at: None,
                });
            }
        }
        fake
    }

    fn settle(method: Option<payment::Method>) -> SettleRental {
        SettleRental {
            rental_id: "17".parse().unwrap(),
            method,
        }
    }

    #[tokio::test]
    async fn scenario_a_requires_method_then_closes() {
        let svc = service(completed(350_000, 105_000, &[]));

        let err = svc.execute(settle(None)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentMethodRequired(..),
        ));
        assert_eq!(svc.gateway().state().payments.len(), 2);

        let outcome = svc
            .execute(settle(Some(payment::Method::MoMo)))
            .await
            .unwrap();

        let Outcome::Completed { payment, status } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(status, rental::Status::Closed);
        assert_eq!(payment.amount, vnd(245_000));
        assert_eq!(payment.role, Role::FinalPaid);
        assert_eq!(
            svc.gateway().status_of(&"17".parse().unwrap()),
            Some(rental::Status::Closed),
        );
    }

    #[tokio::test]
    async fn scenario_b_adds_penalties() {
        let svc = service(completed(300_000, 90_000, &[30_000, 20_000]));

        let outcome = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap();

        let Outcome::Completed { payment, .. } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(payment.amount, vnd(260_000));
    }

    #[tokio::test]
    async fn scenario_c_zero_is_due_not_refund() {
        let svc = service(completed(500_000, 500_000, &[]));

        let err = svc.execute(settle(None)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentMethodRequired(..),
        ));

        let outcome = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap();
        let Outcome::Completed { payment, .. } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(payment.amount, vnd(0));
        assert_eq!(payment.role, Role::FinalPaid);
    }

    #[tokio::test]
    async fn scenario_d_refunds_without_method() {
        let svc = service(completed(200_000, 300_000, &[]));

        let outcome = svc.execute(settle(None)).await.unwrap();

        let Outcome::Completed { payment, status } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(status, rental::Status::Closed);
        assert_eq!(payment.amount, vnd(100_000));
        assert_eq!(payment.method, payment::Method::Cash);
        assert_eq!(payment.role, Role::RefundCompleted);
    }

    #[tokio::test]
    async fn gates_on_completed_order() {
        let svc = service(Fake::with_rental(rental(
            "17",
            350_000,
            rental::Status::Active,
        )));

        let err = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotCompleted(_, rental::Status::Active),
        ));
        assert!(svc.gateway().state().payments.is_empty());
    }

    #[tokio::test]
    async fn reports_already_settled() {
        let fake = completed(350_000, 105_000, &[]);
        _ = fake.state().payments.pop();
        let svc = service(fake);

        let err = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadySettled(..)));
    }

    #[tokio::test]
    async fn redirects_gateway_payment() {
        let svc = service(completed(350_000, 105_000, &[]));

        let outcome = svc
            .execute(settle(Some(payment::Method::VnPay)))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Redirect(..)));
        let intent = svc
            .scratch()
            .execute(Select(By::<Option<Intent>, _>::new((
                "17".parse().unwrap(),
                intent::IssuanceDateTime::UNIX_EPOCH,
            ))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent.kind, intent::Kind::FinalPayment);
        assert_eq!(intent.amount, vnd(245_000));
        assert_eq!(
            svc.gateway().status_of(&"17".parse().unwrap()),
            Some(rental::Status::Completed),
        );
    }

    #[tokio::test]
    async fn resumes_status_update_without_paying_twice() {
        let svc = service(completed(350_000, 105_000, &[]));
        svc.gateway().state().failing.status_update = true;

        let err = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Transition(
                transition::ExecutionError::StatusUpdateFailed(..),
            ),
        ));
        assert_eq!(svc.gateway().state().payments.len(), 3);

        svc.gateway().state().failing.status_update = false;
        let outcome = svc.execute(settle(None)).await.unwrap();

        assert!(matches!(outcome, Outcome::Resumed(rental::Status::Closed)));
        assert_eq!(svc.gateway().state().payments.len(), 3);
        assert_eq!(
            svc.gateway().status_of(&"17".parse().unwrap()),
            Some(rental::Status::Closed),
        );
    }

    #[tokio::test]
    async fn never_pays_twice_when_mark_is_lost() {
        let svc = service(completed(350_000, 105_000, &[]));
        svc.gateway().state().payments.push(payment(
            "17",
            245_000,
            "FINAL_PAID_1",
            payment::Status::Paid,
        ));
        let unmarked = Checkpoint::start(
            &payment::New {
                rental_id: "17".parse().unwrap(),
                amount: vnd(245_000),
                method: payment::Method::Cash,
                transaction_ref: "FINAL_PAID_1".to_owned().into(),
            },
            rental::Status::Closed,
        );
        svc.scratch().execute(Insert(unmarked)).await.unwrap();

        let outcome = svc
            .execute(settle(Some(payment::Method::Cash)))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Resumed(rental::Status::Closed)));
        assert_eq!(svc.gateway().state().payments.len(), 3);
        assert_eq!(
            svc.gateway().status_of(&"17".parse().unwrap()),
            Some(rental::Status::Closed),
        );
    }

    #[tokio::test]
    async fn forgets_checkpoint_of_closed_rental() {
        let svc = service(Fake::with_rental(rental(
            "17",
            350_000,
            rental::Status::Closed,
        )));
        let mut done = Checkpoint::start(
            &payment::New {
                rental_id: "17".parse().unwrap(),
                amount: vnd(245_000),
                method: payment::Method::Cash,
                transaction_ref: "FINAL_PAID_1".to_owned().into(),
            },
            rental::Status::Closed,
        );
        done.payment_recorded = true;
        svc.scratch().execute(Insert(done)).await.unwrap();

        let outcome = svc.execute(settle(None)).await.unwrap();

        assert!(matches!(outcome, Outcome::Resumed(rental::Status::Closed)));
        assert!(svc.gateway().state().status_changes.is_empty());
        assert!(svc
            .scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(
                "17".parse::<rental::Id>().unwrap(),
            )))
            .await
            .unwrap()
            .is_none());
    }
}
