use thiserror::Error;

/// Validation and contract errors exposed by `quotefetch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No arguments provided. Please specify --symbols or --exchange_rate.")]
    NoArguments,
    #[error("no ticker symbols found in '{value}'")]
    EmptySymbolList { value: String },

    #[error("Invalid exchange rate format: {value}")]
    InvalidExchangeRatePair { value: String },
    #[error("currency code must be 3 characters: '{value}'")]
    InvalidCurrency { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("configuration value {name}='{value}' is invalid: {reason}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
