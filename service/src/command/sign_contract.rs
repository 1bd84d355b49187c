//! [`Command`] for signing the [`Contract`] of a [`Rental`] by its renter.

use common::{
    operations::{By, Select, Update},
    pagination::{self, Page},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, rental, Contract, Payment, Rental},
    infra::{gateway, Gateway},
    inflight::{self, AlreadyInFlight},
    Service,
};

use super::Command;

/// [`Command`] for signing the [`Contract`] of a [`Rental`] by its renter.
#[derive(Clone, Debug)]
pub struct SignContract {
    /// ID of the [`Rental`] to sign the [`Contract`] of.
    pub rental_id: rental::Id,

    /// Indicates whether the renter agreed to the [`Contract`] terms.
    pub agreed: bool,
}

impl<Gw, Sc> Command<SignContract> for Service<Gw, Sc>
where
    Gw: Gateway<
            Select<By<Option<Contract>, rental::Id>>,
            Ok = Option<Contract>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<Page<Payment>, (rental::Id, pagination::Request)>>,
            Ok = Page<Payment>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Update<contract::Sign>,
            Ok = Contract,
            Err = Traced<gateway::Error>,
        >,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignContract { rental_id, agreed } = cmd;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, inflight::Stage::Contract)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let contract = self
            .gateway()
            .execute(Select(By::<Option<Contract>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ContractNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        if contract.signed_by_renter.is_signed() {
            return Err(tracerr::new!(E::AlreadySigned(contract.id)));
        }
        if !agreed {
            return Err(tracerr::new!(E::AgreementRequired(contract.id)));
        }

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;
        if rental.status == rental::Status::Created {
            let payments = self
                .gateway()
                .execute(Select(By::<Page<Payment>, _>::new((
                    rental_id.clone(),
                    self.config().first_page(),
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if !payments.items.iter().any(Payment::is_paid_deposit) {
                return Err(tracerr::new!(E::DepositNotPaid(rental_id)));
            }
        }

        self.gateway()
            .execute(Update(contract::Sign {
                contract_id: contract.id,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SignContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Renter did not agree to the [`Contract`] terms.
    #[display("`Contract(id: {_0})` terms are not agreed to")]
    AgreementRequired(#[error(not(source))] contract::Id),

    /// [`Contract`] of the [`Rental`] is being signed already.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Contract`] is signed by the renter already.
    #[display("`Contract(id: {_0})` is already signed")]
    AlreadySigned(#[error(not(source))] contract::Id),

    /// [`Rental`] has no [`Contract`].
    #[display("`Rental(id: {_0})` has no contract")]
    ContractNotExists(#[error(not(source))] rental::Id),

    /// Deposit of the [`Rental`] is not paid yet.
    #[display("`Rental(id: {_0})` deposit is not paid")]
    DepositNotPaid(#[error(not(source))] rental::Id),

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
        domain::{
            contract::Signature,
            payment, rental, Contract,
        },
        infra::gateway::Fake,
        testing::{payment, rental, service},
        Command as _,
    };

    use super::{ExecutionError, SignContract};

    fn contract(rental_id: &rental::Id, renter: Signature) -> Contract {
        Contract {
            id: "c-1".parse().unwrap(),
            rental_id: rental_id.clone(),
            contract_type: Some("STANDARD".into()),
            signed_by_staff: Signature::Signed,
            signed_by_renter: renter,
        }
    }

    fn fake(status: rental::Status, renter: Signature) -> (Fake, rental::Id) {
        let order = rental("17", 350_000, status);
        let fake = Fake::with_rental(order.clone());
        fake.state().contracts.push(contract(&order.id, renter));
        (fake, order.id)
    }

    #[tokio::test]
    async fn signs_agreed_contract() {
        let (fake, rental_id) =
            fake(rental::Status::Confirmed, Signature::Unsigned);
        let svc = service(fake);

        let signed = svc
            .execute(SignContract {
                rental_id,
                agreed: true,
            })
            .await
            .unwrap();

        assert!(signed.is_effective());
        assert_eq!(svc.gateway().state().signs, 1);
    }

    #[tokio::test]
    async fn refuses_signed_contract_without_calling() {
        let (fake, rental_id) =
            fake(rental::Status::Confirmed, Signature::Signed);
        let svc = service(fake);

        let err = svc
            .execute(SignContract {
                rental_id,
                agreed: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadySigned(..)));
        assert_eq!(svc.gateway().state().signs, 0);
    }

    #[tokio::test]
    async fn requires_agreement() {
        let (fake, rental_id) =
            fake(rental::Status::Confirmed, Signature::Unsigned);
        let svc = service(fake);

        let err = svc
            .execute(SignContract {
                rental_id,
                agreed: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::AgreementRequired(..),
        ));
        assert_eq!(svc.gateway().state().signs, 0);
    }

    #[tokio::test]
    async fn requires_paid_deposit_of_created_order() {
        let (fake, rental_id) =
            fake(rental::Status::Created, Signature::Unsigned);
        let svc = service(fake);

        let err = svc
            .execute(SignContract {
                rental_id: rental_id.clone(),
                agreed: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::DepositNotPaid(..)));

        svc.gateway().state().payments.push(payment(
            "17",
            105_000,
            "DEPOSIT_17_1",
            payment::Status::Paid,
        ));
        _ = svc
            .execute(SignContract {
                rental_id,
                agreed: true,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reports_missing_contract() {
        let svc = service(Fake::with_rental(rental(
            "17",
            350_000,
            rental::Status::Confirmed,
        )));

        let err = svc
            .execute(SignContract {
                rental_id: "17".parse().unwrap(),
                agreed: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(..),
        ));
    }
}
