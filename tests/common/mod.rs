#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use xpense_core::{
    core::{Clock, FixedClock},
    ledger::{Category, Expense},
    storage::JsonStorage,
    Session,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a data file path inside a fresh temporary directory.
pub fn temp_data_file() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("expenses.json");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Clock pinned to 20 March 2024.
pub fn march_clock() -> Box<dyn Clock> {
    Box::new(FixedClock::new(date(2024, 3, 20)))
}

/// Opens a session backed by an isolated JSON file.
pub fn setup_session() -> (Session, PathBuf) {
    let path = temp_data_file();
    let session = Session::open(Box::new(JsonStorage::new(&path)), march_clock())
        .expect("open session");
    (session, path)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn expense(description: &str, amount: Decimal, on: NaiveDate, category: Category) -> Expense {
    Expense::new(description, amount, on, category).expect("valid expense")
}
