use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};

/// one month of an amortization schedule, figures rounded to 2 places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// fixed-rate, fixed-term amortization schedule
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// rounded equated monthly installment
    pub installment: Money,
    pub rows: Vec<AmortizationRow>,
    /// sum of the rounded installments
    pub total_repayable: Money,
    /// sum of the rounded interest portions
    pub total_interest: Money,
}

impl AmortizationSchedule {
    /// get row for a specific month (1-based)
    pub fn get_row(&self, month: u32) -> Option<&AmortizationRow> {
        month
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx as usize))
    }

    /// remaining balance after the given month
    pub fn balance_after(&self, month: u32) -> Money {
        self.get_row(month)
            .map(|r| r.remaining_balance)
            .unwrap_or(self.principal)
    }

    /// stamp each row with its due date, `start` plus `month` calendar months
    ///
    /// Days past the end of a shorter month clamp to its last day.
    pub fn with_due_dates(mut self, start: NaiveDate) -> Self {
        for row in &mut self.rows {
            row.due_date = start.checked_add_months(Months::new(row.month));
        }
        self
    }
}

/// equated monthly installment calculator
#[derive(Debug, Clone)]
pub struct AmortizationEngine {
    config: LoanConfig,
}

impl Default for AmortizationEngine {
    fn default() -> Self {
        Self::new(LoanConfig::default())
    }
}

impl AmortizationEngine {
    pub fn new(config: LoanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoanConfig {
        &self.config
    }

    /// compute the installment and the full month-by-month schedule
    ///
    /// `annual_rate_percent` is a percentage figure, 15 for 15% a year.
    /// A zero rate yields a flat schedule: equal principal, no interest.
    /// Figures that leave the decimal range fail with `InvalidNumericInput`.
    pub fn generate_schedule(
        &self,
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<AmortizationSchedule> {
        if term_months == 0 || term_months > self.config.max_term_months {
            return Err(CalculatorError::InvalidTerm {
                months: i64::from(term_months),
            });
        }
        if !principal.is_positive() {
            return Err(CalculatorError::numeric("loan_amount", principal));
        }
        if annual_rate_percent < Decimal::ZERO
            || annual_rate_percent > self.config.max_annual_rate_percent
        {
            return Err(CalculatorError::numeric("interest_rate", annual_rate_percent));
        }

        let annual_rate = Rate::from_percentage(annual_rate_percent);
        let monthly_rate = annual_rate.monthly_rate();
        let out_of_range = || CalculatorError::numeric("loan_amount", principal);

        let (installment, rows) = if monthly_rate.as_decimal().is_zero() {
            build_flat_rows(principal, term_months)
        } else {
            let factors = discount_factors(monthly_rate, term_months)
                .ok_or_else(|| CalculatorError::numeric("interest_rate", annual_rate_percent))?;
            let emi = calculate_emi_amount(principal, monthly_rate, &factors)
                .ok_or_else(out_of_range)?;
            let rows = build_rows(principal, monthly_rate, emi, &factors)
                .ok_or_else(out_of_range)?;
            (emi.round_currency(), rows)
        };

        let total_repayable =
            Money::checked_sum(rows.iter().map(|r| r.installment)).ok_or_else(out_of_range)?;
        let total_interest =
            Money::checked_sum(rows.iter().map(|r| r.interest_portion)).ok_or_else(out_of_range)?;

        debug!(
            %principal,
            %annual_rate,
            term_months,
            %installment,
            %total_repayable,
            "amortization schedule generated"
        );

        Ok(AmortizationSchedule {
            principal,
            annual_rate,
            term_months,
            installment,
            rows,
            total_repayable,
            total_interest,
        })
    }
}

/// walk the schedule at full precision
///
/// The balance after month k is P * (1 - v^(n-k)) / (1 - v^n), which is
/// exactly zero after the last month.
fn build_rows(
    principal: Money,
    monthly_rate: Rate,
    emi: Money,
    factors: &[Decimal],
) -> Option<Vec<AmortizationRow>> {
    let months = factors.len().checked_sub(1)?;
    let annuity = Decimal::ONE.checked_sub(*factors.last()?)?;
    let mut rows = Vec::with_capacity(months);
    let mut balance = principal;

    for (month, remaining_factor) in (1..=months).zip(factors.iter().rev().skip(1)) {
        let interest = balance.checked_apply(monthly_rate)?;
        let principal_portion = emi.checked_sub(interest)?;

        let outstanding = Decimal::ONE.checked_sub(*remaining_factor)?;
        balance = Money::from_decimal(
            principal
                .as_decimal()
                .checked_mul(outstanding)?
                .checked_div(annuity)?,
        );

        rows.push(AmortizationRow {
            month: u32::try_from(month).ok()?,
            installment: emi.round_currency(),
            principal_portion: principal_portion.max(Money::ZERO).round_currency(),
            interest_portion: interest.round_currency(),
            remaining_balance: balance.max(Money::ZERO).round_currency(),
            due_date: None,
        });
    }

    Some(rows)
}

/// equal installments of principal / n at cent precision; the last month
/// settles whatever the rounding left over
fn build_flat_rows(principal: Money, term_months: u32) -> (Money, Vec<AmortizationRow>) {
    let mut balance = principal.round_currency();
    let installment = (balance / Decimal::from(term_months)).round_currency();
    let mut rows = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let paid = if month == term_months {
            balance
        } else {
            installment.min(balance)
        };
        balance -= paid;

        rows.push(AmortizationRow {
            month,
            installment: paid,
            principal_portion: paid,
            interest_portion: Money::ZERO,
            remaining_balance: balance,
            due_date: None,
        });
    }

    (installment, rows)
}

/// v^j for j in 0..=months, with v = 1 / (1 + r)
///
/// `None` when v is not below one at working precision.
fn discount_factors(monthly_rate: Rate, months: u32) -> Option<Vec<Decimal>> {
    let v = Decimal::ONE.checked_div(Decimal::ONE.checked_add(monthly_rate.as_decimal())?)?;
    if v >= Decimal::ONE {
        return None;
    }

    let mut factors = Vec::with_capacity(months as usize + 1);
    let mut power = Decimal::ONE;
    factors.push(power);
    for _ in 0..months {
        // powers past 28 places settle at zero
        power = power.checked_mul(v)?;
        factors.push(power);
    }
    Some(factors)
}

/// EMI = P * r / (1 - v^n), i.e. P * r * (1 + r)^n / ((1 + r)^n - 1)
fn calculate_emi_amount(principal: Money, monthly_rate: Rate, factors: &[Decimal]) -> Option<Money> {
    let annuity = Decimal::ONE.checked_sub(*factors.last()?)?;
    principal
        .as_decimal()
        .checked_mul(monthly_rate.as_decimal())?
        .checked_div(annuity)
        .map(Money::from_decimal)
}
