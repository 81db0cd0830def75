//! Portfolio module - daily holding snapshots, the valuation cycle, and
//! read-side views over positions and quotes.

pub mod holdings;
pub mod overview;
pub mod valuation;

pub use holdings::{DailyHolding, HoldingsRepositoryTrait};
pub use overview::{
    HistoricalValue, OverviewService, OverviewServiceTrait, PortfolioPosition, SymbolTotal,
    UserStats,
};
pub use valuation::{ValuationCycleOutcome, ValuationService, ValuationServiceTrait, ValuationSkip};
