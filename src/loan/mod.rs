pub mod amortization;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LoanConfig;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::Currency;

pub use amortization::{AmortizationEngine, AmortizationRow, AmortizationSchedule};

/// installment loan request as received from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub loan_amount: Money,
    /// annual rate as a percentage figure
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    /// term in months; signed so that a negative term is a domain error
    pub loan_term: i64,
    pub currency: String,
    /// first disbursement date, used to stamp due dates on the schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// loan calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub emi: Money,
    pub total_repayable: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
}

impl From<AmortizationSchedule> for LoanResult {
    fn from(schedule: AmortizationSchedule) -> Self {
        Self {
            emi: schedule.installment,
            total_repayable: schedule.total_repayable,
            total_interest: schedule.total_interest,
            schedule: schedule.rows,
        }
    }
}

/// validates loan requests and runs them through the amortization engine
#[derive(Debug, Clone, Default)]
pub struct LoanCalculator {
    engine: AmortizationEngine,
}

impl LoanCalculator {
    pub fn new(config: LoanConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AmortizationEngine {
        &self.engine
    }

    pub fn calculate(&self, request: &LoanRequest) -> Result<LoanResult> {
        let currency: Currency = request.currency.parse().inspect_err(|_| {
            warn!(currency = %request.currency, "loan request rejected: unsupported currency");
        })?;

        let term = u32::try_from(request.loan_term)
            .ok()
            .filter(|months| *months > 0)
            .ok_or(CalculatorError::InvalidTerm {
                months: request.loan_term,
            })?;

        let mut schedule =
            self.engine
                .generate_schedule(request.loan_amount, request.interest_rate, term)?;

        if let Some(start) = request.start_date {
            schedule = schedule.with_due_dates(start);
        }

        debug!(%currency, emi = %schedule.installment, "loan calculated");

        Ok(schedule.into())
    }
}
