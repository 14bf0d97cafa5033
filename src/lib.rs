pub mod advance;
pub mod api;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod loan;
pub mod types;

// re-export key types
pub use advance::{AdvanceCalculator, AdvanceRequest, AdvanceResult};
pub use config::{AdvanceConfig, CalculatorConfig, LoanConfig};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use loan::{
    AmortizationEngine, AmortizationRow, AmortizationSchedule, LoanCalculator, LoanRequest,
    LoanResult,
};
pub use types::{Currency, PayFrequency};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
