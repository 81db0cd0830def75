//! Utility functions for SQLite storage operations.
//!
//! Chunking helpers to stay under SQLite's parameter limit, and the text
//! encodings used for decimals, timestamps and dates.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL statement,
/// typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). 500 leaves room for the
/// other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Chunk a slice into smaller slices for batch SQLite queries.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Fixed-width RFC 3339 (microseconds, `Z`), so text order equals time order.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::SerializationError(format!("timestamp '{}': {}", value, e)))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::SerializationError(format!("date '{}': {}", value, e)))
}

/// Canonical text form of a decimal.
pub fn format_decimal(value: &Decimal) -> String {
    value.to_string()
}

pub fn parse_decimal(value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::SerializationError(format!("decimal '{}': {}", value, e)))
}
