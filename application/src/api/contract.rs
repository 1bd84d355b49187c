//! [`Contract`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, read};

use crate::{
    api::{self, scalar},
    define_error, Context,
};

/// Rental contract between the renter and the branch staff.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Contract {
    /// Unique identifier of this `Contract`.
    pub id: Id,

    /// `Rental` this `Contract` is made for.
    pub rental_id: api::rental::Id,

    /// Type of this `Contract`, if specified.
    pub contract_type: Option<String>,

    /// Indicator whether the staff has signed this `Contract`.
    pub signed_by_staff: bool,

    /// Indicator whether the renter has signed this `Contract`.
    pub signed_by_renter: bool,

    /// Indicator whether both parties have signed this `Contract`.
    pub is_effective: bool,
}

impl From<domain::Contract> for Contract {
    fn from(contract: domain::Contract) -> Self {
        let is_effective = contract.is_effective();
        Self {
            id: contract.id.into(),
            rental_id: contract.rental_id.into(),
            contract_type: contract.contract_type,
            signed_by_staff: contract.signed_by_staff.is_signed(),
            signed_by_renter: contract.signed_by_renter.is_signed(),
            is_effective,
        }
    }
}

/// Unique identifier of a `Contract`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ContractId", with = scalar::Via::<domain::contract::Id>)]
pub struct Id(domain::contract::Id);

/// Stage of signing a `Contract`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ContractStage")]
pub enum Stage {
    /// Renter has signed the `Contract` already.
    AlreadySigned,

    /// Renter must agree to the terms to sign the `Contract`.
    AwaitingAgreement,
}

impl From<read::contract::Stage> for Stage {
    fn from(stage: read::contract::Stage) -> Self {
        use read::contract::Stage as S;

        match stage {
            S::AlreadySigned => Self::AlreadySigned,
            S::AwaitingAgreement => Self::AwaitingAgreement,
        }
    }
}

/// `Contract` of a `Rental` along with what the renter may do with it.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ContractOverview", context = Context)]
pub struct Overview {
    /// `Contract` of the `Rental`.
    pub contract: Contract,

    /// Signing stage.
    pub stage: Stage,

    /// Indicator whether the deposit of the `Rental` is paid, which signing
    /// requires.
    pub deposit_paid: bool,
}

impl From<read::contract::Overview> for Overview {
    fn from(overview: read::contract::Overview) -> Self {
        Self {
            contract: overview.contract.into(),
            stage: overview.stage.into(),
            deposit_paid: overview.deposit_paid,
        }
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rental` has no `Contract`"]
        NotExists,

        #[code = "ALREADY_SIGNED"]
        #[status = CONFLICT]
        #[message = "`Contract` is signed by the renter already"]
        AlreadySigned,

        #[code = "AGREEMENT_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "Terms of the `Contract` must be agreed to"]
        AgreementRequired,

        #[code = "DEPOSIT_NOT_PAID"]
        #[status = CONFLICT]
        #[message = "Deposit must be paid before signing the `Contract`"]
        DepositNotPaid,
    }
}
