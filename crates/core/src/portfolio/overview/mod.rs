mod overview_model;
mod overview_service;


pub use overview_model::{HistoricalValue, PortfolioPosition, SymbolTotal, UserStats};
pub use overview_service::{OverviewService, OverviewServiceTrait};
