use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::Currency;

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalculatorConfig {
    pub advance: AdvanceConfig,
    pub loan: LoanConfig,
}

/// salary advance product terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceConfig {
    /// minimum gross salary per currency
    pub thresholds: BTreeMap<Currency, Money>,
    /// fee charged on an approved advance
    pub fee_rate: Rate,
    /// share of gross salary that may be advanced
    pub max_advance_ratio: Rate,
    /// the only pay frequency that qualifies
    pub eligible_pay_frequency: String,
}

/// installment loan product terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    pub max_term_months: u32,
    /// highest annual rate accepted, as a percentage figure
    #[serde(with = "rust_decimal::serde::float")]
    pub max_annual_rate_percent: Decimal,
}

impl Default for AdvanceConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            max_term_months: 360,
            max_annual_rate_percent: dec!(1000),
        }
    }
}

impl AdvanceConfig {
    /// standard terms: 3% fee, half of gross salary, monthly earners only
    pub fn standard() -> Self {
        let thresholds = [
            (Currency::UGX, 300_000),
            (Currency::RWF, 100_000),
            (Currency::KES, 15_000),
            (Currency::TZS, 250_000),
            (Currency::USD, 100),
            (Currency::GBP, 80),
            (Currency::EUR, 90),
        ]
        .into_iter()
        .map(|(currency, amount)| (currency, Money::from_major(amount)))
        .collect();

        Self {
            thresholds,
            fee_rate: Rate::from_decimal(dec!(0.03)),
            max_advance_ratio: Rate::from_decimal(dec!(0.5)),
            eligible_pay_frequency: "month".to_string(),
        }
    }

    /// threshold for a currency, if the product is offered in it
    pub fn threshold(&self, currency: Currency) -> Option<Money> {
        self.thresholds.get(&currency).copied()
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds.is_empty() {
            return Err(invalid("at least one currency threshold is required"));
        }

        if let Some((currency, amount)) = self.thresholds.iter().find(|(_, m)| !m.is_positive()) {
            return Err(invalid(format!(
                "threshold for {currency} must be positive, got {amount}"
            )));
        }

        let fee = self.fee_rate.as_decimal();
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(invalid(format!("fee rate must be in [0, 1), got {fee}")));
        }

        let ratio = self.max_advance_ratio.as_decimal();
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return Err(invalid(format!(
                "max advance ratio must be in (0, 1], got {ratio}"
            )));
        }

        if self.eligible_pay_frequency.trim().is_empty() {
            return Err(invalid("eligible pay frequency must not be empty"));
        }

        Ok(())
    }
}

impl LoanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_term_months == 0 {
            return Err(invalid("max term must be at least one month"));
        }
        if self.max_annual_rate_percent <= Decimal::ZERO {
            return Err(invalid(format!(
                "max annual rate must be positive, got {}",
                self.max_annual_rate_percent
            )));
        }
        Ok(())
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<()> {
        self.advance.validate()?;
        self.loan.validate()
    }

    /// parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// load from a JSON file; missing sections fall back to standard terms
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

fn invalid(message: impl Into<String>) -> CalculatorError {
    CalculatorError::InvalidConfiguration {
        message: message.into(),
    }
}
