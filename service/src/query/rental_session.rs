//! [`Query`] loading a [`Session`] of a [`Rental`].

use common::{
    operations::{By, Select},
    pagination::{self, Page},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rental, Payment, Penalty, Rental},
    infra::{gateway, Gateway},
    read::Session,
    Service,
};

use super::Query;

/// [`Query`] loading a [`Session`] of a [`Rental`].
///
/// The [`Rental`] is required, while its [`Payment`]s and [`Penalty`]s are
/// loaded concurrently and fall back to empty lists on failure.
#[derive(Clone, Debug)]
pub struct RentalSession {
    /// ID of the [`Rental`] to load.
    pub rental_id: rental::Id,
}

impl<Gw, Sc> Query<RentalSession> for Service<Gw, Sc>
where
    Gw: Gateway<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<Page<Payment>, (rental::Id, pagination::Request)>>,
            Ok = Page<Payment>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<Page<Penalty>, (rental::Id, pagination::Request)>>,
            Ok = Page<Penalty>,
            Err = Traced<gateway::Error>,
        >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: RentalSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RentalSession { rental_id } = query;

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let page = self.config().first_page();
        let (payments, penalties) = futures::join!(
            self.gateway().execute(Select(By::<Page<Payment>, _>::new((
                rental_id.clone(),
                page,
            )))),
            self.gateway().execute(Select(By::<Page<Penalty>, _>::new((
                rental_id.clone(),
                page,
            )))),
        );

        let payments = payments.map_or_else(
            |e| {
                log::warn!(
                    "failed to load `Payment`s of `Rental(id: {rental_id})`, \
                     assuming none: {e}",
                );
                Vec::new()
            },
            |p| p.items,
        );
        let penalties = penalties.map_or_else(
            |e| {
                log::warn!(
                    "failed to load `Penalty`s of `Rental(id: {rental_id})`, \
                     assuming none: {e}",
                );
                Vec::new()
            },
            |p| p.items,
        );

        Ok(Session {
            rental,
            payments,
            penalties,
        })
    }
}

/// Error of [`RentalSession`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{payment, rental, Penalty},
        infra::gateway::Fake,
        testing::{payment, rental, service, vnd},
        Query as _,
    };

    use super::{ExecutionError, RentalSession};

    fn fake() -> Fake {
        let fake = Fake::with_rental(rental(
            "17",
            350_000,
            rental::Status::Completed,
        ));
        {
            let mut state = fake.state();
            state.payments.push(payment(
                "17",
                105_000,
                "DEPOSIT_17_1",
                payment::Status::Paid,
            ));
            state.payments.push(payment(
                "18",
                99_000,
                "DEPOSIT_18_1",
                payment::Status::Paid,
            ));
            state.penalties.push(Penalty {
                id: "pen-1".parse().unwrap(),
                rental_id: "17".parse().unwrap(),
                amount: vnd(50_000),
                reason: Some("late return".into()),
                issued_at: None,
            });
        }
        fake
    }

    #[tokio::test]
    async fn loads_rental_with_its_records() {
        let svc = service(fake());

        let session = svc
            .execute(RentalSession {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(session.payments.len(), 1);
        assert_eq!(session.penalties.len(), 1);
        assert_eq!(session.settlement().final_amount, vnd(295_000));
    }

    #[tokio::test]
    async fn loading_is_idempotent() {
        let svc = service(fake());
        let query = RentalSession {
            rental_id: "17".parse().unwrap(),
        };

        let first = svc.execute(query.clone()).await.unwrap();
        let second = svc.execute(query).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn degrades_to_empty_lists() {
        let fake = fake();
        {
            let mut state = fake.state();
            state.failing.payments = true;
            state.failing.penalties = true;
        }
        let svc = service(fake);

        let session = svc
            .execute(RentalSession {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap();

        assert!(session.payments.is_empty());
        assert!(session.penalties.is_empty());
        assert_eq!(session.settlement().final_amount, vnd(245_000));
    }

    #[tokio::test]
    async fn fails_hard_without_rental() {
        let fake = fake();
        fake.state().failing.rental = true;
        let svc = service(fake);

        let err = svc
            .execute(RentalSession {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Gateway(..)));

        let err = service(Fake::default())
            .execute(RentalSession {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::RentalNotExists(..)));
    }
}
