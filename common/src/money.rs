//! [`Money`]-related definitions.

use std::{fmt, iter, ops, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::define_kind;

/// Signed amount of money in some [`Currency`].
///
/// Arithmetic between amounts keeps the [`Currency`] of the left operand:
/// a single rental is always priced in one [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] in the [`Currency::DEFAULT`].
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency: Currency::DEFAULT,
        }
    }

    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Indicates whether this [`Money`] amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value of this [`Money`] amount.
    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Rounds this [`Money`] amount to whole currency units, with midpoints
    /// rounded away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(whole) => write!(f, "{whole}{currency}"),
            None => write!(f, "{}{currency}", amount.normalize()),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Self {
            amount: self.amount + rhs.amount,
            currency: self.currency,
        }
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Self {
            amount: self.amount - rhs.amount,
            currency: self.currency,
        }
    }
}

impl ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            amount: -self.amount,
            currency: self.currency,
        }
    }
}

impl iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(ops::Add::add)
            .unwrap_or(Self::zero(Currency::DEFAULT))
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Vietnamese dong."]
        Vnd = "VND",

        #[doc = "US Dollar."]
        Usd = "USD",

        #[doc = "Euro."]
        Eur = "EUR",
    }
}

impl Currency {
    /// [`Currency`] the remote services price rentals in.
    pub const DEFAULT: Self = Self::Vnd;
}

pub mod serde {
    //! Serialization of [`Money`] as a bare JSON number in the
    //! [`Currency::DEFAULT`], the way the remote services exchange amounts.
    //!
    //! [`Currency::DEFAULT`]: super::Currency::DEFAULT

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    /// Serializes the [`Money`] amount as a number.
    ///
    /// # Errors
    ///
    /// Returns an error if the `serializer` fails.
    pub fn serialize<S: Serializer>(
        money: &Money,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&money.amount, serializer)
    }

    /// Deserializes a number (or a numeric string) into [`Money`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid number.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Money, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Money::new)
    }

    pub mod option {
        //! Serialization of an optional [`Money`] as a nullable number.

        use super::{Decimal, Deserialize as _, Deserializer, Money, Serializer};

        /// Helper deserializing a [`Decimal`] from a number.
        #[derive(serde::Deserialize)]
        struct Amount(
            #[serde(with = "rust_decimal::serde::float")] Decimal,
        );

        /// Serializes the optional [`Money`] amount as a nullable number.
        ///
        /// # Errors
        ///
        /// Returns an error if the `serializer` fails.
        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => super::serialize(m, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes a nullable number into an optional [`Money`].
        ///
        /// # Errors
        ///
        /// Returns an error if the input is neither `null` nor a number.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            Ok(Option::<Amount>::deserialize(deserializer)?
                .map(|Amount(a)| Money::new(a)))
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{amount}{currency}` format, where:
    /// - `amount` is a signed decimal number;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn vnd(s: &str) -> Money {
        Money::new(s.parse::<Decimal>().unwrap())
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("350000VND").unwrap(), vnd("350000"));
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: "123.45".parse().unwrap(),
                currency: Currency::Usd,
            },
        );
        assert_eq!(Money::from_str("-100000VND").unwrap(), vnd("-100000"));

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Vn").is_err());
        assert!(Money::from_str("123.45dong").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(vnd("245000").to_string(), "245000VND");
        assert_eq!(vnd("245000.00").to_string(), "245000VND");
        assert_eq!(vnd("-100000").to_string(), "-100000VND");
        assert_eq!(vnd("10.50").to_string(), "10.5VND");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(vnd("1.5").round(), vnd("2"));
        assert_eq!(vnd("2.5").round(), vnd("3"));
        assert_eq!(vnd("2.49").round(), vnd("2"));
        assert_eq!(vnd("-2.5").round(), vnd("-3"));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(vnd("300000") + vnd("50000"), vnd("350000"));
        assert_eq!(vnd("200000") - vnd("300000"), vnd("-100000"));
        assert_eq!(-vnd("5"), vnd("-5"));
        assert!(vnd("-1").is_negative());
        assert!(!vnd("0").is_negative());
        assert!(!(-vnd("0")).is_negative());
        assert_eq!(vnd("-100000").abs(), vnd("100000"));
        assert_eq!(
            [vnd("1"), vnd("2"), vnd("3")].into_iter().sum::<Money>(),
            vnd("6"),
        );
        assert_eq!(
            Vec::<Money>::new().into_iter().sum::<Money>(),
            Money::zero(Currency::Vnd),
        );
    }

    #[test]
    fn serde_as_number() {
        #[derive(serde::Deserialize, serde::Serialize)]
        struct Wire {
            #[serde(with = "super::serde")]
            cost: Money,
            #[serde(with = "super::serde::option")]
            actual: Option<Money>,
        }

        let wire: Wire =
            serde_json::from_str(r#"{"cost": 350000, "actual": null}"#)
                .unwrap();
        assert_eq!(wire.cost, vnd("350000"));
        assert_eq!(wire.actual, None);

        let wire: Wire =
            serde_json::from_str(r#"{"cost": 1.5, "actual": 420000.0}"#)
                .unwrap();
        assert_eq!(wire.cost, vnd("1.5"));
        assert_eq!(wire.actual, Some(vnd("420000")));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["cost"], serde_json::json!(1.5));
        assert_eq!(json["actual"], serde_json::json!(420_000.0));
    }
}
