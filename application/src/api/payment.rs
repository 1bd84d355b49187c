//! [`Payment`]-related definitions.

use common::Money;
use juniper::{GraphQLEnum, GraphQLObject, GraphQLUnion};
use service::{command, domain};

use crate::{api, Context};

/// A payment recorded for a `Rental`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Payment {
    /// Unique identifier of this `Payment`.
    pub id: String,

    /// Paid amount.
    pub amount: Money,

    /// Method this `Payment` is made with.
    pub method: Method,

    /// Reference of the transaction this `Payment` is recorded for.
    pub transaction_ref: String,

    /// Status of this `Payment`.
    pub status: Status,

    /// Role of this `Payment` in the `Rental` lifecycle.
    pub role: Role,
}

impl From<domain::Payment> for Payment {
    fn from(payment: domain::Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            amount: payment.amount,
            method: payment.method.into(),
            transaction_ref: payment.transaction_ref.into(),
            status: payment.status.into(),
            role: payment.role.into(),
        }
    }
}

/// Method of a `Payment`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PaymentMethod")]
pub enum Method {
    /// `MoMo` e-wallet.
    #[graphql(name = "MOMO")]
    MoMo,

    /// `ZaloPay` e-wallet.
    #[graphql(name = "ZALOPAY")]
    ZaloPay,

    /// Credit card.
    CreditCard,

    /// Debit card.
    DebitCard,

    /// Cash at the counter.
    Cash,

    /// `VNPAY` payment gateway, paid through a redirect.
    #[graphql(name = "VNPAY")]
    VnPay,
}

impl From<domain::payment::Method> for Method {
    fn from(method: domain::payment::Method) -> Self {
        use domain::payment::Method as M;

        match method {
            M::MoMo => Self::MoMo,
            M::ZaloPay => Self::ZaloPay,
            M::CreditCard => Self::CreditCard,
            M::DebitCard => Self::DebitCard,
            M::Cash => Self::Cash,
            M::VnPay => Self::VnPay,
        }
    }
}

impl From<Method> for domain::payment::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::MoMo => Self::MoMo,
            Method::ZaloPay => Self::ZaloPay,
            Method::CreditCard => Self::CreditCard,
            Method::DebitCard => Self::DebitCard,
            Method::Cash => Self::Cash,
            Method::VnPay => Self::VnPay,
        }
    }
}

/// Status of a `Payment`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PaymentStatus")]
pub enum Status {
    /// Created, but not paid yet.
    Pending,

    /// Paid.
    Paid,
}

impl From<domain::payment::Status> for Status {
    fn from(status: domain::payment::Status) -> Self {
        use domain::payment::Status as S;

        match status {
            S::Pending => Self::Pending,
            S::Paid => Self::Paid,
        }
    }
}

/// Role of a `Payment` in the `Rental` lifecycle.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PaymentRole")]
pub enum Role {
    /// Deposit confirming the `Rental`.
    Deposit,

    /// Pending placeholder of an additional final payment.
    FinalPayment,

    /// Pending placeholder of a refund to the renter.
    Refund,

    /// Pending placeholder of a zero settlement.
    NoAdditionalPayment,

    /// Recorded final payment.
    FinalPaid,

    /// Recorded refund.
    RefundCompleted,

    /// Anything not related to the `Rental` lifecycle.
    Other,
}

impl From<domain::payment::Role> for Role {
    fn from(role: domain::payment::Role) -> Self {
        use domain::payment::Role as R;

        match role {
            R::Deposit => Self::Deposit,
            R::FinalPayment => Self::FinalPayment,
            R::Refund => Self::Refund,
            R::NoAdditionalPayment => Self::NoAdditionalPayment,
            R::FinalPaid => Self::FinalPaid,
            R::RefundCompleted => Self::RefundCompleted,
            R::Other => Self::Other,
        }
    }
}

/// Outcome of a payment step of a `Rental`.
#[derive(Clone, Debug, GraphQLUnion)]
#[graphql(name = "PaymentOutcome", context = Context)]
pub enum Outcome {
    /// Browser must be redirected to the payment gateway.
    Redirect(Redirect),

    /// Payment is recorded and the `Rental` status is updated.
    Completed(Completed),

    /// Only the missing `Rental` status update of an earlier attempt is
    /// completed.
    Resumed(Resumed),
}

impl From<command::Outcome> for Outcome {
    fn from(outcome: command::Outcome) -> Self {
        match outcome {
            command::Outcome::Redirect(url) => Self::Redirect(Redirect {
                url: url.as_str().to_owned(),
            }),
            command::Outcome::Completed { payment, status } => {
                Self::Completed(Completed {
                    payment: payment.into(),
                    status: status.into(),
                })
            }
            command::Outcome::Resumed(status) => Self::Resumed(Resumed {
                status: status.into(),
            }),
        }
    }
}

/// Redirect to the payment gateway.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "PaymentRedirect", context = Context)]
pub struct Redirect {
    /// URL of the payment page to navigate the browser to.
    pub url: String,
}

/// Completed payment step.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "PaymentCompleted", context = Context)]
pub struct Completed {
    /// Recorded `Payment`.
    pub payment: Payment,

    /// New status of the `Rental`.
    pub status: api::rental::Status,
}

/// Resumed payment step.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "PaymentResumed", context = Context)]
pub struct Resumed {
    /// Status the `Rental` is moved to.
    pub status: api::rental::Status,
}

#[cfg(test)]
mod spec {
    use service::domain::payment;

    use super::Method;

    #[test]
    fn method_round_trips_through_domain() {
        for &m in payment::Method::ALL {
            assert_eq!(payment::Method::from(Method::from(m)), m);
        }
    }
}
