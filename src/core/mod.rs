//! Services, session orchestration, and environment helpers built on the ledger model.

pub mod services;
pub mod session;
pub mod time;
pub mod utils;

pub use session::{Committed, SaveStatus, Session};
pub use time::{Clock, FixedClock, SystemClock};
