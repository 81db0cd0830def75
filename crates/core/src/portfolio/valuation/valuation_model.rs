use chrono::NaiveDate;

/// Why a cycle wrote nothing. Both are normal quiescent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationSkip {
    /// The refresh produced no quotes (no active symbols).
    NoQuotes,
    /// No positions are stored.
    NoPositions,
}

/// Result of one completed valuation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationSummary {
    pub date: NaiveDate,
    /// Users whose daily holding was written
    pub users_valued: usize,
    /// Users whose total was zero (no row written)
    pub users_zero: usize,
    /// Users whose upsert failed
    pub users_failed: Vec<String>,
    /// `(user_id, symbol)` pairs skipped for lack of a refreshed quote
    pub unpriced_positions: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuationCycleOutcome {
    Skipped(ValuationSkip),
    Completed(ValuationSummary),
}
