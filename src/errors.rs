use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("unsupported currency: {code}")]
    InvalidCurrency {
        code: String,
    },

    #[error("invalid numeric input: {field} = {value}")]
    InvalidNumericInput {
        field: &'static str,
        value: String,
    },

    #[error("invalid term: {months} months")]
    InvalidTerm {
        months: i64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("failed to read configuration file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl CalculatorError {
    pub(crate) fn numeric(field: &'static str, value: impl ToString) -> Self {
        CalculatorError::InvalidNumericInput {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
