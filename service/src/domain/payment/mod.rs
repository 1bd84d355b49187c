//! [`Payment`] definitions.

pub mod checkpoint;
pub mod intent;

use common::{define_id, define_kind, DateTime, Money};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::Rental;

pub use self::{checkpoint::Checkpoint, intent::Intent};

/// Payment record of a [`Rental`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "wire::Payment")]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Rental`] this [`Payment`] belongs to.
    pub rental_id: rental::Id,

    /// Paid (or refunded) amount.
    pub amount: Money,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// [`TransactionRef`] tagging this [`Payment`].
    pub transaction_ref: TransactionRef,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// [`Role`] of this [`Payment`] in the rental lifecycle.
    pub role: Role,
}

impl Payment {
    /// Indicates whether this [`Payment`] is a paid deposit.
    #[must_use]
    pub fn is_paid_deposit(&self) -> bool {
        self.status == Status::Paid && self.role == Role::Deposit
    }

    /// Indicates whether this [`Payment`] is a pending placeholder of the
    /// final settlement.
    #[must_use]
    pub fn is_pending_final(&self) -> bool {
        self.status == Status::Pending && self.role.is_final_settlement()
    }
}

define_id! {
    #[doc = "ID of a [`Payment`]."]
    Id
}

define_kind! {
    #[doc = "Method of a [`Payment`]."]
    enum Method {
        #[doc = "`MoMo` e-wallet."]
        MoMo = "MoMo",

        #[doc = "`ZaloPay` e-wallet."]
        ZaloPay = "ZaloPay",

        #[doc = "Credit card."]
        CreditCard = "CreditCard",

        #[doc = "Debit card."]
        DebitCard = "DebitCard",

        #[doc = "Cash at the counter."]
        Cash = "Cash",

        #[doc = "`VNPAY` payment gateway, paid through a redirect."]
        VnPay = "VNPAY",
    }
}

impl Method {
    /// Indicates whether a [`Payment`] with this [`Method`] is completed on
    /// an external gateway page rather than recorded directly.
    #[must_use]
    pub const fn is_gateway_redirect(self) -> bool {
        matches!(self, Self::VnPay)
    }
}

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "Created, but not paid yet."]
        Pending = "Pending",

        #[doc = "Paid."]
        Paid = "Paid",
    }
}

define_kind! {
    #[doc = "Role of a [`Payment`] in the rental lifecycle."]
    enum Role {
        #[doc = "Deposit confirming the order."]
        Deposit = "DEPOSIT",

        #[doc = "Pending placeholder of an additional final payment."]
        FinalPayment = "FINAL_PAYMENT",

        #[doc = "Pending placeholder of a refund to the renter."]
        Refund = "REFUND",

        #[doc = "Pending placeholder of a zero settlement."]
        NoAdditionalPayment = "NO_ADDITIONAL_PAYMENT",

        #[doc = "Recorded final payment."]
        FinalPaid = "FINAL_PAID",

        #[doc = "Recorded refund."]
        RefundCompleted = "REFUND_COMPLETED",

        #[doc = "Anything not related to the rental lifecycle."]
        Other = "OTHER",
    }
}

impl Role {
    /// Tags searched in a [`TransactionRef`], in the order of precedence.
    const TAGS: [(&'static str, Self); 6] = [
        ("REFUND_COMPLETED", Self::RefundCompleted),
        ("NO_ADDITIONAL_PAYMENT", Self::NoAdditionalPayment),
        ("FINAL_PAYMENT", Self::FinalPayment),
        ("FINAL_PAID", Self::FinalPaid),
        ("REFUND", Self::Refund),
        ("DEPOSIT", Self::Deposit),
    ];

    /// Indicates whether this [`Role`] marks a pending final settlement
    /// placeholder.
    #[must_use]
    pub const fn is_final_settlement(self) -> bool {
        matches!(
            self,
            Self::FinalPayment | Self::Refund | Self::NoAdditionalPayment,
        )
    }
}

/// Free-text tag of a [`Payment`] encoding its [`Role`].
#[derive(
    Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, PartialEq,
    Serialize,
)]
#[serde(transparent)]
pub struct TransactionRef(String);

impl AsRef<str> for TransactionRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TransactionRef {
    /// Creates a [`TransactionRef`] of a deposit of the provided [`Rental`].
    #[must_use]
    pub fn deposit(rental_id: &rental::Id, at: DateTime) -> Self {
        Self(format!(
            "{}_{rental_id}_{}",
            Role::Deposit,
            at.unix_timestamp_millis(),
        ))
    }

    /// Creates a [`TransactionRef`] of a recorded final payment.
    #[must_use]
    pub fn final_paid(at: DateTime) -> Self {
        Self(format!("{}_{}", Role::FinalPaid, at.unix_timestamp_millis()))
    }

    /// Creates a [`TransactionRef`] of a recorded refund.
    #[must_use]
    pub fn refund_completed(at: DateTime) -> Self {
        Self(format!(
            "{}_{}",
            Role::RefundCompleted,
            at.unix_timestamp_millis(),
        ))
    }

    /// Infers the [`Role`] this [`TransactionRef`] encodes.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::TAGS
            .iter()
            .find_map(|(tag, role)| self.0.contains(tag).then_some(*role))
            .unwrap_or(Role::Other)
    }
}

/// New [`Payment`] to be recorded.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    /// ID of the paid [`Rental`].
    pub rental_id: rental::Id,

    /// Paid amount.
    #[serde(with = "common::money::serde")]
    pub amount: Money,

    /// [`Method`] of the [`Payment`].
    #[serde(rename = "paymentMethod")]
    pub method: Method,

    /// [`TransactionRef`] of the [`Payment`].
    pub transaction_ref: TransactionRef,
}

/// Request of a payment page on the external gateway.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayCheckout {
    /// ID of the paid [`Rental`].
    pub rental_id: rental::Id,

    /// Amount to be paid.
    #[serde(with = "common::money::serde")]
    pub amount: Money,
}

/// URL of the external gateway page the renter is redirected to.
#[derive(Clone, Debug, Deserialize, Display, Eq, From, Into, PartialEq)]
#[serde(rename_all = "camelCase")]
#[display("{payment_url}")]
pub struct RedirectUrl {
    /// Absolute URL of the payment page.
    payment_url: String,
}

impl RedirectUrl {
    /// Returns this [`RedirectUrl`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.payment_url
    }
}

mod wire {
    //! Wire representation of a [`Payment`].
    //!
    //! [`Payment`]: super::Payment

    use common::Money;
    use serde::Deserialize;

    use crate::domain::rental;

    use super::{Id, Method, Role, Status, TransactionRef};

    /// [`Payment`] as returned by the payment service.
    ///
    /// [`Payment`]: super::Payment
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Payment {
        id: Id,
        rental_id: rental::Id,
        #[serde(with = "common::money::serde")]
        amount: Money,
        payment_method: Method,
        #[serde(default)]
        transaction_ref: Option<String>,
        status: Status,
        #[serde(default)]
        role: Option<String>,
    }

    impl From<Payment> for super::Payment {
        fn from(p: Payment) -> Self {
            let transaction_ref =
                TransactionRef(p.transaction_ref.unwrap_or_default());
            let role = p
                .role
                .and_then(|r| r.parse::<Role>().ok())
                .unwrap_or_else(|| transaction_ref.role());
            Self {
                id: p.id,
                rental_id: p.rental_id,
                amount: p.amount,
                method: p.payment_method,
                transaction_ref,
                status: p.status,
                role,
            }
        }
    }
}
