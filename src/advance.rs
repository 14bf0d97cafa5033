use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AdvanceConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{Currency, PayFrequency};

/// salary advance request as received from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub gross_salary: Money,
    pub advance_amount: Money,
    pub currency: String,
    pub pay_frequency: String,
}

/// advance evaluation result
///
/// `max_advance` is always reported. The fee fields are present only when
/// the requested amount is approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceResult {
    pub eligible: bool,
    pub max_advance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repayable: Option<Money>,
}

impl AdvanceResult {
    fn declined(max_advance: Money) -> Self {
        Self {
            eligible: false,
            max_advance,
            fee_rate: None,
            fee: None,
            total_repayable: None,
        }
    }
}

/// salary advance eligibility and fee calculator
#[derive(Debug, Clone)]
pub struct AdvanceCalculator {
    config: AdvanceConfig,
}

impl Default for AdvanceCalculator {
    fn default() -> Self {
        Self::new(AdvanceConfig::standard())
    }
}

impl AdvanceCalculator {
    pub fn new(config: AdvanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvanceConfig {
        &self.config
    }

    pub fn evaluate(&self, request: &AdvanceRequest) -> Result<AdvanceResult> {
        let currency: Currency = request.currency.parse()?;
        let threshold = self.config.threshold(currency).ok_or_else(|| {
            warn!(%currency, "no eligibility threshold configured");
            CalculatorError::InvalidCurrency {
                code: request.currency.clone(),
            }
        })?;

        if !request.gross_salary.is_positive() {
            return Err(CalculatorError::numeric("gross_salary", request.gross_salary));
        }
        if !request.advance_amount.is_positive() {
            return Err(CalculatorError::numeric("advance_amount", request.advance_amount));
        }

        let frequency = PayFrequency::new(&request.pay_frequency);
        let salary_ok = request.gross_salary >= threshold;
        let frequency_ok = frequency.matches(&self.config.eligible_pay_frequency);

        let max_advance = request
            .gross_salary
            .apply(self.config.max_advance_ratio)
            .round_currency();

        if !(salary_ok && frequency_ok) || request.advance_amount > max_advance {
            debug!(
                %currency,
                salary_ok,
                frequency = frequency.as_str(),
                requested = %request.advance_amount,
                %max_advance,
                "advance declined"
            );
            return Ok(AdvanceResult::declined(max_advance));
        }

        let fee_rate = self.config.fee_rate;
        let fee = request.advance_amount.apply(fee_rate).round_currency();
        let total_repayable = request
            .advance_amount
            .checked_add(fee)
            .ok_or_else(|| CalculatorError::numeric("advance_amount", request.advance_amount))?
            .round_currency();

        debug!(%currency, %fee, %total_repayable, "advance approved");

        Ok(AdvanceResult {
            eligible: true,
            max_advance,
            fee_rate: Some(fee_rate),
            fee: Some(fee),
            total_repayable: Some(total_repayable),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn request(salary: Money, amount: Money, currency: &str, frequency: &str) -> AdvanceRequest {
        AdvanceRequest {
            gross_salary: salary,
            advance_amount: amount,
            currency: currency.to_string(),
            pay_frequency: frequency.to_string(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = AdvanceCalculator::default()
            .evaluate(&request(
                Money::from_major(500_000),
                Money::from_major(100_000),
                "UGX",
                "Month",
            ))
            .unwrap();

        assert_eq!(
            result,
            AdvanceResult {
                eligible: true,
                max_advance: Money::from_major(250_000),
                fee_rate: Some(Rate::from_decimal(dec!(0.03))),
                fee: Some(Money::from_major(3_000)),
                total_repayable: Some(Money::from_major(103_000)),
            }
        );
    }

    #[test]
    fn test_threshold_is_inclusive_for_every_currency() {
        let calculator = AdvanceCalculator::default();

        for currency in Currency::ALL {
            let threshold = calculator.config().threshold(currency).unwrap();
            let result = calculator
                .evaluate(&request(threshold, Money::CENT, currency.code(), "Month"))
                .unwrap();
            assert!(result.eligible, "{currency} at threshold should be eligible");
        }
    }

    #[test]
    fn test_below_threshold_never_eligible() {
        let calculator = AdvanceCalculator::default();

        for currency in Currency::ALL {
            let threshold = calculator.config().threshold(currency).unwrap();
            let salary = threshold - Money::CENT;
            for amount in [Money::CENT, Money::from_major(1), salary] {
                let result = calculator
                    .evaluate(&request(salary, amount, currency.code(), "month"))
                    .unwrap();
                assert!(!result.eligible);
                assert_eq!(result.fee, None);
                assert_eq!(result.total_repayable, None);
            }
        }
    }

    #[test]
    fn test_pay_frequency_other_than_month_disqualifies() {
        let calculator = AdvanceCalculator::default();

        for frequency in ["Week", "2 Weeks", "monthly", "", "mon th"] {
            let result = calculator
                .evaluate(&request(
                    Money::from_major(10_000_000),
                    Money::from_major(1_000),
                    "UGX",
                    frequency,
                ))
                .unwrap();
            assert!(!result.eligible, "{frequency:?} should not qualify");
            assert_eq!(result.max_advance, Money::from_major(5_000_000));
        }

        for frequency in ["month", " MONTH ", "\tMonth\n"] {
            let result = calculator
                .evaluate(&request(
                    Money::from_major(10_000_000),
                    Money::from_major(1_000),
                    "UGX",
                    frequency,
                ))
                .unwrap();
            assert!(result.eligible, "{frequency:?} should qualify");
        }
    }

    #[test]
    fn test_amount_above_max_advance_declined() {
        let calculator = AdvanceCalculator::default();
        let salary = Money::from_major(500_000);

        let at_max = calculator
            .evaluate(&request(salary, Money::from_major(250_000), "UGX", "Month"))
            .unwrap();
        assert!(at_max.eligible);
        assert_eq!(at_max.fee, Some(Money::from_major(7_500)));

        let over = calculator
            .evaluate(&request(salary, Money::from(dec!(250000.01)), "UGX", "Month"))
            .unwrap();
        assert_eq!(over, AdvanceResult::declined(Money::from_major(250_000)));
    }

    #[test]
    fn test_max_advance_rounds_to_cents() {
        let result = AdvanceCalculator::default()
            .evaluate(&request(
                Money::from(dec!(1000.05)),
                Money::from_major(10),
                "USD",
                "Month",
            ))
            .unwrap();

        // 500.025 rounds half away from zero
        assert_eq!(result.max_advance, Money::from(dec!(500.03)));
        assert_eq!(result.fee, Some(Money::from(dec!(0.30))));
        assert_eq!(result.total_repayable, Some(Money::from(dec!(10.30))));
    }

    #[test]
    fn test_fee_rounding() {
        let result = AdvanceCalculator::default()
            .evaluate(&request(
                Money::from_major(100_000),
                Money::from(dec!(333.33)),
                "KES",
                "Month",
            ))
            .unwrap();

        // 333.33 * 0.03 = 9.9999
        assert_eq!(result.fee, Some(Money::from_major(10)));
        assert_eq!(result.total_repayable, Some(Money::from(dec!(343.33))));
    }

    #[test]
    fn test_unsupported_currency_is_an_error() {
        let err = AdvanceCalculator::default()
            .evaluate(&request(
                Money::from_major(500_000),
                Money::from_major(100_000),
                "XYZ",
                "Month",
            ))
            .unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidCurrency { code } if code == "XYZ"));
    }

    #[test]
    fn test_currency_without_threshold_is_unsupported() {
        let mut config = AdvanceConfig::standard();
        config.thresholds.remove(&Currency::GBP);

        let err = AdvanceCalculator::new(config)
            .evaluate(&request(
                Money::from_major(5_000),
                Money::from_major(100),
                "GBP",
                "Month",
            ))
            .unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidCurrency { .. }));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let calculator = AdvanceCalculator::default();

        let err = calculator
            .evaluate(&request(Money::ZERO, Money::from_major(1), "UGX", "Month"))
            .unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::InvalidNumericInput { field: "gross_salary", .. }
        ));

        let err = calculator
            .evaluate(&request(
                Money::from_major(500_000),
                Money::from_major(-5),
                "UGX",
                "Month",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::InvalidNumericInput { field: "advance_amount", .. }
        ));
    }

    #[test]
    fn test_result_json_omits_fee_fields_when_declined() {
        let declined = serde_json::to_value(AdvanceResult::declined(Money::from_major(100))).unwrap();
        assert_eq!(declined, serde_json::json!({ "eligible": false, "max_advance": 100.0 }));
    }

    #[test]
    fn test_repayable_beyond_decimal_range_is_rejected() {
        let calculator = AdvanceCalculator::new(AdvanceConfig {
            max_advance_ratio: Rate::from_decimal(Decimal::ONE),
            ..AdvanceConfig::standard()
        });
        let max = Money::from_decimal(Decimal::MAX);

        let err = calculator
            .evaluate(&request(max, max, "USD", "month"))
            .unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::InvalidNumericInput { field: "advance_amount", .. }
        ));
    }
}
