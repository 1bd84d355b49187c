//! [`Query`] collection related to a [`Contract`] of a [`Rental`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Contract},
    infra::{gateway, Gateway},
    read::{
        contract::{Overview, Stage},
        Session,
    },
    Service,
};
#[cfg(doc)]
use crate::domain::Rental;

use super::{rental_session, GatewayQuery, Query, RentalSession};

/// Queries a [`Contract`] by ID of its [`Rental`].
pub type ByRental = GatewayQuery<By<Option<Contract>, rental::Id>>;

/// [`Query`] of a [`Contract`] [`Overview`] by ID of its [`Rental`].
#[derive(Clone, Debug)]
pub struct ContractOverview {
    /// ID of the [`Rental`] to get the [`Contract`] of.
    pub rental_id: rental::Id,
}

impl<Gw, Sc> Query<ContractOverview> for Service<Gw, Sc>
where
    Gw: Gateway<
        Select<By<Option<Contract>, rental::Id>>,
        Ok = Option<Contract>,
        Err = Traced<gateway::Error>,
    >,
    Self: Query<
        RentalSession,
        Ok = Session,
        Err = Traced<rental_session::ExecutionError>,
    >,
{
    type Ok = Overview;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: ContractOverview,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ContractOverview { rental_id } = query;

        let contract = self
            .gateway()
            .execute(Select(By::<Option<Contract>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ContractNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let session = self
            .execute(RentalSession { rental_id })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let deposit_paid = session.rental.status != rental::Status::Created
            || session.paid_deposits().next().is_some();

        Ok(Overview {
            stage: Stage::of(&contract),
            contract,
            deposit_paid,
        })
    }
}

/// Error of [`ContractOverview`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Rental`] has no [`Contract`].
    #[display("`Rental(id: {_0})` has no contract")]
    ContractNotExists(#[error(not(source))] rental::Id),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// Loading the [`Rental`] failed.
    #[display("{_0}")]
    #[from]
    Session(rental_session::ExecutionError),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{contract::Signature, payment, rental, Contract},
        infra::gateway::Fake,
        read::contract::Stage,
        testing::{payment, rental, service},
        Query as _,
    };

    use super::{ContractOverview, ExecutionError};

    fn fake(status: rental::Status, renter: Signature) -> Fake {
        let fake = Fake::with_rental(rental("17", 350_000, status));
        fake.state().contracts.push(Contract {
            id: "c-1".parse().unwrap(),
            rental_id: "17".parse().unwrap(),
            contract_type: None,
            signed_by_staff: Signature::Signed,
            signed_by_renter: renter,
        });
        fake
    }

    #[tokio::test]
    async fn awaits_agreement_of_unsigned_contract() {
        let fake = fake(rental::Status::Created, Signature::Unsigned);
        fake.state().payments.push(payment(
            "17",
            105_000,
            "DEPOSIT_17_1",
            payment::Status::Paid,
        ));
        let svc = service(fake);

        let overview = svc
            .execute(ContractOverview {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(overview.stage, Stage::AwaitingAgreement);
        assert!(overview.deposit_paid);
    }

    #[tokio::test]
    async fn reports_signed_contract() {
        let svc = service(fake(rental::Status::Confirmed, Signature::Signed));

        let overview = svc
            .execute(ContractOverview {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(overview.stage, Stage::AlreadySigned);
    }

    #[tokio::test]
    async fn reports_unpaid_deposit() {
        let svc = service(fake(rental::Status::Created, Signature::Unsigned));

        let overview = svc
            .execute(ContractOverview {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap();

        assert!(!overview.deposit_paid);
    }

    #[tokio::test]
    async fn fails_without_contract() {
        let svc = service(Fake::with_rental(rental(
            "17",
            350_000,
            rental::Status::Confirmed,
        )));

        let err = svc
            .execute(ContractOverview {
                rental_id: "17".parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(..),
        ));
    }
}
