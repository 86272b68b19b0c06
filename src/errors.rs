use rust_decimal::Decimal;
use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("expense #{index} is out of range (ledger holds {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("malformed month key `{0}`")]
    MalformedKey(String),
    #[error("amount must not be negative (got {0})")]
    InvalidAmount(Decimal),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LedgerError {
    /// True when the failure came from the storage medium rather than the data.
    pub fn is_io(&self) -> bool {
        matches!(self, LedgerError::Io(_))
    }
}
