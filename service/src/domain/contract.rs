//! [`Contract`] definitions.

use std::fmt;

use common::define_id;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::Rental;

/// Rental contract of a [`Rental`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`Rental`] this [`Contract`] is concluded for.
    pub rental_id: rental::Id,

    /// Type of this [`Contract`], as named by the rental service.
    #[serde(default)]
    pub contract_type: Option<String>,

    /// [`Signature`] of the staff.
    #[serde(default)]
    pub signed_by_staff: Signature,

    /// [`Signature`] of the renter.
    #[serde(default)]
    pub signed_by_renter: Signature,
}

impl Contract {
    /// Indicates whether this [`Contract`] is signed by both parties.
    #[must_use]
    pub const fn is_effective(&self) -> bool {
        self.signed_by_staff.is_signed() && self.signed_by_renter.is_signed()
    }
}

define_id! {
    #[doc = "ID of a [`Contract`]."]
    Id
}

/// Signature flag of a [`Contract`] party.
///
/// Exchanged as `0` or `1`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Signature {
    /// Not signed yet.
    #[default]
    Unsigned,

    /// Signed.
    Signed,
}

impl Signature {
    /// Indicates whether this [`Signature`] is given.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Signed)
    }
}

impl From<bool> for Signature {
    fn from(signed: bool) -> Self {
        if signed {
            Self::Signed
        } else {
            Self::Unsigned
        }
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.is_signed()))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        /// [`de::Visitor`] of a [`Signature`] flag.
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = Signature;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("`0`, `1` or a boolean")
            }

            fn visit_bool<E: de::Error>(
                self,
                v: bool,
            ) -> Result<Signature, E> {
                Ok(v.into())
            }

            fn visit_u64<E: de::Error>(
                self,
                v: u64,
            ) -> Result<Signature, E> {
                match v {
                    0 => Ok(Signature::Unsigned),
                    1 => Ok(Signature::Signed),
                    _ => Err(E::invalid_value(
                        de::Unexpected::Unsigned(v),
                        &self,
                    )),
                }
            }

            fn visit_i64<E: de::Error>(
                self,
                v: i64,
            ) -> Result<Signature, E> {
                match v {
                    0 => Ok(Signature::Unsigned),
                    1 => Ok(Signature::Signed),
                    _ => Err(E::invalid_value(
                        de::Unexpected::Signed(v),
                        &self,
                    )),
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Signature, E> {
                Ok(Signature::Unsigned)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// Renter's signature of a [`Contract`].
#[derive(Clone, Debug)]
pub struct Sign {
    /// ID of the signed [`Contract`].
    pub contract_id: Id,
}

impl Sign {
    /// Request body of a [`Sign`] operation.
    pub const BODY: SignBody = SignBody {
        signed_by_renter: Signature::Signed,
    };
}

/// Request body of a [`Sign`] operation.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignBody {
    /// Renter's [`Signature`].
    pub signed_by_renter: Signature,
}

#[cfg(test)]
mod spec {
    use super::{Contract, Sign, Signature};

    #[test]
    fn reads_numeric_and_boolean_flags() {
        let contract: Contract = serde_json::from_str(
            r#"{
                "id": 5,
                "rentalId": 17,
                "contractType": "RENTAL",
                "signedByStaff": 1,
                "signedByRenter": false
            }"#,
        )
        .unwrap();

        assert_eq!(contract.signed_by_staff, Signature::Signed);
        assert_eq!(contract.signed_by_renter, Signature::Unsigned);
        assert!(!contract.is_effective());
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(serde_json::from_str::<Signature>("2").is_err());
        assert!(serde_json::from_str::<Signature>("-1").is_err());
    }

    #[test]
    fn signs_as_renter() {
        assert_eq!(
            serde_json::to_string(&Sign::BODY).unwrap(),
            r#"{"signedByRenter":1}"#,
        );
    }
}
