//! SQLite storage implementation for Stocky.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `stocky-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor every mutation goes through
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `stocky-core` is database-agnostic and works with traits.
//!
//! ```text
//!   core (domain, services)
//!             │
//!             ▼
//!   storage-sqlite (this crate)
//!      reads: pooled connections
//!      writes: WriteHandle → one connection, BEGIN IMMEDIATE per job
//!             │
//!             ▼
//!         SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod portfolio;
pub mod positions;
pub mod quotes;
pub mod rewards;
pub mod stocks;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use portfolio::HoldingsRepository;
pub use positions::PositionRepository;
pub use quotes::QuoteRepository;
pub use rewards::RewardRepository;
pub use stocks::StockRepository;

// Re-export from stocky-core for convenience
pub use stocky_core::errors::{DatabaseError, Error, Result};
