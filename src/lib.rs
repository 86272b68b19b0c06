#![doc(test(attr(deny(warnings))))]

//! Xpense Core keeps a personal expense ledger with monthly budgets, persists it
//! as a single JSON document, and builds month-by-month spending reports.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::services::{BudgetStatus, MonthReport, Report};
pub use crate::core::session::{Committed, SaveStatus, Session};
pub use errors::LedgerError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Xpense Core tracing initialized.");
    });
}
