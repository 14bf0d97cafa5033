use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// decimal places reported for every currency figure
pub const CURRENCY_DP: u32 = 2;

/// internal working precision
const WORKING_DP: u32 = 8;

/// currency amount, carried at 8 places and reported at 2
///
/// Amounts are unit-agnostic: the currency is a label on the request, no
/// conversion ever happens. On the wire a `Money` is a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(WORKING_DP))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(WORKING_DP)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to the reporting precision, midpoint away from zero
    pub fn round_currency(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// apply a fractional rate (0.03 for 3%)
    pub fn apply(&self, rate: Rate) -> Self {
        Money::from_decimal(self.0 * rate.as_decimal())
    }

    /// `None` when the product leaves the representable range
    pub fn checked_apply(&self, rate: Rate) -> Option<Self> {
        self.0.checked_mul(rate.as_decimal()).map(Money::from_decimal)
    }

    pub fn checked_add(self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money::from_decimal)
    }

    pub fn checked_sub(self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money::from_decimal)
    }

    /// sum that stops at the first overflow
    pub fn checked_sum<I: IntoIterator<Item = Money>>(iter: I) -> Option<Self> {
        iter.into_iter()
            .try_fold(Money::ZERO, |acc, x| acc.checked_add(x))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(WORKING_DP))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(WORKING_DP);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(WORKING_DP))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(WORKING_DP);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(WORKING_DP))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money((self.0 / other).round_dp(WORKING_DP))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

/// rate type for fee rates, interest rates and ratios, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a percentage figure (e.g., 15 for 15%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_working_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        assert_eq!(Money::from(dec!(2.345)).round_currency(), Money::from(dec!(2.35)));
        assert_eq!(Money::from(dec!(2.355)).round_currency(), Money::from(dec!(2.36)));
        assert_eq!(Money::from(dec!(2.344)).round_currency(), Money::from(dec!(2.34)));
    }

    #[test]
    fn test_apply_fee_rate() {
        let amount = Money::from_major(100_000);
        let fee = amount.apply(Rate::from_decimal(dec!(0.03)));
        assert_eq!(fee.round_currency(), Money::from_major(3_000));
    }

    #[test]
    fn test_monthly_rate_from_percentage() {
        let annual = Rate::from_percentage(dec!(15));
        assert_eq!(annual.as_decimal(), dec!(0.15));
        assert_eq!(annual.monthly_rate().as_decimal(), dec!(0.0125));
        assert_eq!(annual.to_string(), "15%");
    }

    #[test]
    fn test_money_serializes_as_json_number() {
        let json = serde_json::to_string(&Money::from(dec!(250000.00))).unwrap();
        assert_eq!(json, "250000.0");

        let parsed: Money = serde_json::from_str("750000").unwrap();
        assert_eq!(parsed, Money::from_major(750_000));

        let parsed: Money = serde_json::from_str("0.5").unwrap();
        assert_eq!(parsed, Money::from(dec!(0.5)));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Money::from_decimal(Decimal::MAX);
        assert_eq!(max.checked_add(Money::from_major(1)), None);
        assert_eq!(Money::checked_sum([max, max]), None);
        assert_eq!(max.checked_apply(Rate::from_decimal(dec!(2))), None);
        assert_eq!(
            Money::from(dec!(-1)).checked_sub(max),
            None
        );

        assert_eq!(
            Money::checked_sum([Money::from_major(2), Money::CENT]),
            Some(Money::from(dec!(2.01)))
        );
        assert_eq!(
            max.checked_apply(Rate::from_decimal(dec!(0.5))),
            Some(Money::from_decimal(Decimal::MAX * dec!(0.5)))
        );
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![Money::from_major(1), Money::CENT, Money::CENT]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from(dec!(1.02)));
    }
}
