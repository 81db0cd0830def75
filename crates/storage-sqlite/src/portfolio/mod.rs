//! SQLite storage for portfolio snapshots.

pub mod holdings;

pub use holdings::{DailyHoldingDB, HoldingsRepository};
