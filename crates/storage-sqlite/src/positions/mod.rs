//! SQLite storage for per-(user, symbol) positions.

mod model;
mod repository;

pub use model::PositionDB;
pub use repository::PositionRepository;
