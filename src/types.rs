use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CalculatorError;

/// supported currency labels
///
/// Amounts are never converted between currencies; the code only selects the
/// eligibility threshold and is echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    UGX,
    USD,
    KES,
    TZS,
    GBP,
    EUR,
    RWF,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::UGX,
        Currency::USD,
        Currency::KES,
        Currency::TZS,
        Currency::GBP,
        Currency::EUR,
        Currency::RWF,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::UGX => "UGX",
            Currency::USD => "USD",
            Currency::KES => "KES",
            Currency::TZS => "TZS",
            Currency::GBP => "GBP",
            Currency::EUR => "EUR",
            Currency::RWF => "RWF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CalculatorError;

    /// codes are matched after trimming, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| CalculatorError::InvalidCurrency {
                code: s.to_string(),
            })
    }
}

/// pay frequency label as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayFrequency(String);

impl PayFrequency {
    pub fn new(label: &str) -> Self {
        PayFrequency(label.trim().to_lowercase())
    }

    /// normalised label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// compare against a configured label, normalising both sides
    pub fn matches(&self, expected: &str) -> bool {
        self.0 == expected.trim().to_lowercase()
    }
}
