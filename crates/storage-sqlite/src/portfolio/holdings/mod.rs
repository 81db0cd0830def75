mod model;
mod repository;

pub use model::DailyHoldingDB;
pub use repository::HoldingsRepository;
