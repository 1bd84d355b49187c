//! [`Penalty`] definitions.

use common::{define_id, unit, DateTimeOf, Money};
use derive_more::{Display, Error};
use serde::Deserialize;

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::Rental;

/// Penalty assessed on a [`Rental`] at return.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "wire::Penalty")]
pub struct Penalty {
    /// ID of this [`Penalty`].
    pub id: Id,

    /// ID of the penalized [`Rental`].
    pub rental_id: rental::Id,

    /// Non-negative amount of this [`Penalty`].
    pub amount: Money,

    /// Reason of this [`Penalty`].
    pub reason: Option<String>,

    /// [`DateTime`] when this [`Penalty`] was issued.
    ///
    /// [`DateTime`]: common::DateTime
    pub issued_at: Option<IssuanceDateTime>,
}

define_id! {
    #[doc = "ID of a [`Penalty`]."]
    Id
}

/// [`DateTime`] when a [`Penalty`] was issued.
///
/// [`DateTime`]: common::DateTime
pub type IssuanceDateTime = DateTimeOf<(Penalty, unit::Issuance)>;

/// Error of a [`Penalty`] with a negative amount.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Penalty` amount must not be negative: {_0}")]
pub struct NegativeAmount(#[error(not(source))] Money);

mod wire {
    //! Wire representation of a [`Penalty`].
    //!
    //! [`Penalty`]: super::Penalty

    use common::Money;
    use serde::Deserialize;

    use crate::domain::rental;

    use super::{Id, IssuanceDateTime, NegativeAmount};

    /// [`Penalty`] as returned by the rental service.
    ///
    /// [`Penalty`]: super::Penalty
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Penalty {
        id: Id,
        rental_id: rental::Id,
        #[serde(with = "common::money::serde")]
        penalty_amount: Money,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        issued_date: Option<IssuanceDateTime>,
    }

    impl TryFrom<Penalty> for super::Penalty {
        type Error = NegativeAmount;

        fn try_from(p: Penalty) -> Result<Self, Self::Error> {
            if p.penalty_amount.is_negative() {
                return Err(NegativeAmount(p.penalty_amount));
            }
            Ok(Self {
                id: p.id,
                rental_id: p.rental_id,
                amount: p.penalty_amount,
                reason: p.reason,
                issued_at: p.issued_date,
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Money;
    use rust_decimal::Decimal;

    use super::Penalty;

    #[test]
    fn deserializes_penalty() {
        let penalty: Penalty = serde_json::from_str(
            r#"{
                "id": 1,
                "rentalId": 17,
                "penaltyAmount": 50000,
                "reason": "Late return",
                "issuedDate": "2024-05-02T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(penalty.amount, Money::new(Decimal::from(50_000)));
        assert_eq!(penalty.reason.as_deref(), Some("Late return"));
        assert!(penalty.issued_at.is_some());
    }

    #[test]
    fn rejects_negative_amount() {
        let err = serde_json::from_str::<Penalty>(
            r#"{"id": 1, "rentalId": 17, "penaltyAmount": -1}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("must not be negative"), "{err}");
    }
}
