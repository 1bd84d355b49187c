//! [`Intent`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use serde::{Deserialize, Serialize};

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::{Payment, Rental};

/// Payment started on the external gateway and awaiting its callback.
///
/// Only the latest [`Intent`] of each [`Rental`] is remembered: every new
/// attempt overwrites the previous one of the same [`Rental`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Version of the [`Intent`] record layout.
    pub version: u32,

    /// ID of the [`Rental`] being paid.
    pub rental_id: rental::Id,

    /// [`Kind`] of the started payment.
    pub kind: Kind,

    /// Amount sent to the gateway.
    #[serde(with = "common::money::serde")]
    pub amount: Money,

    /// [`DateTime`] when this [`Intent`] was issued.
    ///
    /// [`DateTime`]: common::DateTime
    pub issued_at: IssuanceDateTime,
}

impl Intent {
    /// Current version of the [`Intent`] record layout.
    pub const VERSION: u32 = 1;

    /// Issues a new [`Intent`] at the current moment.
    #[must_use]
    pub fn issue(rental_id: rental::Id, kind: Kind, amount: Money) -> Self {
        Self {
            version: Self::VERSION,
            rental_id,
            kind,
            amount,
            issued_at: IssuanceDateTime::now(),
        }
    }

    /// Indicates whether this [`Intent`] is still valid at the provided
    /// `deadline`, being issued after it in a known record layout.
    #[must_use]
    pub fn is_fresh(&self, deadline: IssuanceDateTime) -> bool {
        self.version == Self::VERSION && self.issued_at > deadline
    }

    /// Returns the [`rental::Status`] the [`Rental`] moves into once the
    /// gateway reports this [`Intent`] as paid.
    #[must_use]
    pub const fn target_status(&self) -> rental::Status {
        self.kind.target_status()
    }
}

define_kind! {
    #[doc = "Kind of an [`Intent`]."]
    enum Kind {
        #[doc = "Deposit confirming the order."]
        Deposit = "DEPOSIT",

        #[doc = "Final payment closing the order."]
        FinalPayment = "FINAL_PAYMENT",
    }
}

impl Kind {
    /// Returns the [`rental::Status`] a paid [`Intent`] of this [`Kind`]
    /// leads to.
    #[must_use]
    pub const fn target_status(self) -> rental::Status {
        match self {
            Self::Deposit => rental::Status::Confirmed,
            Self::FinalPayment => rental::Status::Closed,
        }
    }
}

/// [`DateTime`] when an [`Intent`] was issued.
///
/// [`DateTime`]: common::DateTime
pub type IssuanceDateTime = DateTimeOf<(Intent, unit::Issuance)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::Money;
    use rust_decimal::Decimal;

    use crate::domain::rental;

    use super::{Intent, IssuanceDateTime, Kind};

    fn intent() -> Intent {
        Intent::issue(
            "17".parse().unwrap(),
            Kind::Deposit,
            Money::new(Decimal::from(105_000)),
        )
    }

    #[test]
    fn expires_after_deadline() {
        let intent = intent();

        let before = intent.issued_at - Duration::from_secs(1);
        let after = intent.issued_at + Duration::from_secs(1);

        assert!(intent.is_fresh(before));
        assert!(!intent.is_fresh(after));
        assert!(!intent
            .is_fresh(IssuanceDateTime::now() + Duration::from_secs(300)));
    }

    #[test]
    fn unknown_version_is_stale() {
        let mut intent = intent();
        intent.version = Intent::VERSION + 1;

        assert!(!intent.is_fresh(IssuanceDateTime::UNIX_EPOCH));
    }

    #[test]
    fn targets_status_by_kind() {
        assert_eq!(Kind::Deposit.target_status(), rental::Status::Confirmed);
        assert_eq!(Kind::FinalPayment.target_status(), rental::Status::Closed);
    }

    #[test]
    fn keeps_layout_on_disk() {
        let intent = intent();

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["rentalId"], "17");
        assert_eq!(json["kind"], "DEPOSIT");

        let restored: Intent = serde_json::from_value(json).unwrap();
        assert_eq!(restored, intent);
    }
}
