mod holdings_model;
mod holdings_traits;

pub use holdings_model::DailyHolding;
pub use holdings_traits::HoldingsRepositoryTrait;
