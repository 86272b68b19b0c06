pub mod json_backend;

use std::path::Path;

use crate::{
    errors::LedgerError,
    ledger::{Ledger, MonthKey},
};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends capable of storing a whole ledger.
pub trait StorageBackend: Send + Sync {
    /// Reads the persisted ledger. Missing or corrupt documents yield an empty
    /// ledger together with a [`LoadOrigin`] saying which happened.
    fn load(&self) -> Result<LoadReport>;

    /// Replaces the persisted document with the full state of `ledger`.
    fn save(&self, ledger: &Ledger) -> Result<()>;

    /// Location of the backing document.
    fn location(&self) -> &Path;
}

/// Where the loaded ledger came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// An existing document was read.
    Existing,
    /// No document was present; starting fresh.
    Fresh,
    /// The document could not be parsed; starting fresh.
    Corrupted { reason: String },
}

/// Outcome of a load: the ledger plus diagnostics about anything skipped.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub origin: LoadOrigin,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn fresh() -> Self {
        Self {
            ledger: Ledger::new(),
            origin: LoadOrigin::Fresh,
            warnings: Vec::new(),
        }
    }

    pub fn corrupted(reason: impl Into<String>) -> Self {
        Self {
            ledger: Ledger::new(),
            origin: LoadOrigin::Corrupted {
                reason: reason.into(),
            },
            warnings: Vec::new(),
        }
    }

    /// True when the session starts without prior data.
    pub fn is_fresh_start(&self) -> bool {
        !matches!(self.origin, LoadOrigin::Existing)
    }

    /// True when `current` has no budget in the loaded ledger.
    pub fn needs_initial_budget(&self, current: MonthKey) -> bool {
        !self.ledger.has_budget(current)
    }
}

pub use json_backend::{decode_document, encode_document, JsonStorage};
