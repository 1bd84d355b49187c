//! [`Settlement`] calculator.

use common::{Money, Percent};

use crate::domain::{Payment, Penalty, Rental};

/// Share of the estimated cost collected as a deposit.
pub const DEPOSIT_RATE: Percent = Percent::saturating_whole(30);

/// Money figures of a [`Rental`] settlement, derived from the backend
/// records every time they are needed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    /// Cost estimated when the [`Rental`] was booked.
    pub estimated_cost: Money,

    /// Deposit required by the [`DEPOSIT_RATE`] policy.
    pub deposit_amount: Money,

    /// Deposit offset against the [`Settlement::actual_cost`].
    ///
    /// Equals the sum of paid deposit [`Payment`]s, if any, or the
    /// [`Settlement::deposit_amount`] otherwise.
    pub deposit_offset: Money,

    /// Sum of all the [`Penalty`] amounts.
    pub total_penalties: Money,

    /// Final cost of the [`Rental`].
    pub actual_cost: Money,

    /// Amount still due (if non-negative) or to be refunded (if negative).
    pub final_amount: Money,
}

impl Settlement {
    /// Returns the deposit required for the provided estimated cost.
    #[must_use]
    pub fn deposit_for(estimated_cost: Money) -> Money {
        DEPOSIT_RATE.of(estimated_cost).round()
    }

    /// Calculates a [`Settlement`] from the raw figures.
    ///
    /// An `actual_cost` reported by the rental service takes precedence over
    /// the estimated cost plus penalties.
    #[must_use]
    pub fn calculate(
        estimated_cost: Money,
        actual_cost: Option<Money>,
        paid_deposits: impl IntoIterator<Item = Money>,
        penalties: impl IntoIterator<Item = Money>,
    ) -> Self {
        let deposit_amount = Self::deposit_for(estimated_cost);

        let paid_deposits = paid_deposits.into_iter().collect::<Vec<_>>();
        let deposit_offset = if paid_deposits.is_empty() {
            deposit_amount
        } else {
            paid_deposits.into_iter().sum()
        };

        let total_penalties = penalties
            .into_iter()
            .fold(Money::zero(estimated_cost.currency), |acc, p| acc + p);
        let actual_cost =
            actual_cost.unwrap_or(estimated_cost + total_penalties);

        Self {
            estimated_cost,
            deposit_amount,
            deposit_offset,
            total_penalties,
            actual_cost,
            final_amount: actual_cost - deposit_offset,
        }
    }

    /// Calculates a [`Settlement`] of the provided [`Rental`] from its
    /// [`Payment`]s and [`Penalty`]s.
    #[must_use]
    pub fn of(
        rental: &Rental,
        payments: &[Payment],
        penalties: &[Penalty],
    ) -> Self {
        Self::calculate(
            rental.estimated_cost,
            rental.actual_cost,
            payments
                .iter()
                .filter(|p| p.is_paid_deposit())
                .map(|p| p.amount),
            penalties.iter().map(|p| p.amount),
        )
    }

    /// Indicates whether this [`Settlement`] ends with a refund.
    #[must_use]
    pub fn is_refund(&self) -> bool {
        self.final_amount.is_negative()
    }

    /// Returns the amount to display: due or refunded.
    #[must_use]
    pub fn displayed_amount(&self) -> Money {
        self.final_amount.abs()
    }
}
