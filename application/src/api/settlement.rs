//! [`Settlement`]-related definitions.

use common::Money;
use juniper::{GraphQLEnum, GraphQLObject};
use service::{domain, read};

use crate::{define_error, Context};

/// Amounts settling a `Rental`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Settlement {
    /// Cost estimated on booking.
    pub estimated_cost: Money,

    /// Deposit required on booking.
    pub deposit_amount: Money,

    /// Deposit subtracted from the `actualCost`.
    ///
    /// Sum of the paid deposits, or `depositAmount` if none is recorded.
    pub deposit_offset: Money,

    /// Sum of all the `Penalty`s.
    pub total_penalties: Money,

    /// Final cost of the `Rental`.
    pub actual_cost: Money,

    /// Amount left to pay, negative if a refund is due.
    pub final_amount: Money,

    /// Indicator whether a refund is due to the renter.
    pub is_refund: bool,

    /// Absolute value of the `finalAmount` to display.
    pub displayed_amount: Money,
}

impl From<domain::Settlement> for Settlement {
    fn from(s: domain::Settlement) -> Self {
        Self {
            estimated_cost: s.estimated_cost,
            deposit_amount: s.deposit_amount,
            deposit_offset: s.deposit_offset,
            total_penalties: s.total_penalties,
            actual_cost: s.actual_cost,
            final_amount: s.final_amount,
            is_refund: s.is_refund(),
            displayed_amount: s.displayed_amount(),
        }
    }
}

/// Stage of settling a `Rental`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "SettlementStage")]
pub enum Stage {
    /// `Rental` is not completed yet.
    NotCompleted,

    /// `Rental` is settled already.
    AlreadySettled,

    /// Refund is due to the renter.
    RefundDue,

    /// Payment is due from the renter.
    PaymentDue,
}

impl From<read::settlement::Stage> for Stage {
    fn from(stage: read::settlement::Stage) -> Self {
        use read::settlement::Stage as S;

        match stage {
            S::NotCompleted => Self::NotCompleted,
            S::AlreadySettled => Self::AlreadySettled,
            S::RefundDue => Self::RefundDue,
            S::PaymentDue => Self::PaymentDue,
        }
    }
}

/// `Settlement` of a `Rental` along with its `SettlementStage`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "SettlementPreview", context = Context)]
pub struct Preview {
    /// Calculated `Settlement`.
    pub settlement: Settlement,

    /// Settling stage.
    pub stage: Stage,
}

impl From<read::settlement::Preview> for Preview {
    fn from(preview: read::settlement::Preview) -> Self {
        Self {
            settlement: preview.settlement.into(),
            stage: preview.stage.into(),
        }
    }
}

define_error! {
    enum SettlementError {
        #[code = "ALREADY_SETTLED"]
        #[status = CONFLICT]
        #[message = "`Rental` is settled already"]
        AlreadySettled,

        #[code = "PAYMENT_METHOD_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "Payment method must be provided to pay the final amount"]
        PaymentMethodRequired,
    }
}
