//! [`Contract`] read model definitions.

use crate::domain::Contract;

/// Stage of signing a [`Contract`] by its renter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// [`Contract`] is signed by the renter already.
    AlreadySigned,

    /// [`Contract`] waits for the renter to agree to its terms.
    AwaitingAgreement,
}

impl Stage {
    /// Determines the [`Stage`] of the provided [`Contract`].
    #[must_use]
    pub const fn of(contract: &Contract) -> Self {
        if contract.signed_by_renter.is_signed() {
            Self::AlreadySigned
        } else {
            Self::AwaitingAgreement
        }
    }
}

/// [`Contract`] of a rental along with its signing [`Stage`].
#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
    /// [`Contract`] itself.
    pub contract: Contract,

    /// Signing [`Stage`] of the [`Contract`].
    pub stage: Stage,

    /// Indicates whether the deposit of the rental is paid, so the
    /// [`Contract`] may be signed.
    pub deposit_paid: bool,
}
