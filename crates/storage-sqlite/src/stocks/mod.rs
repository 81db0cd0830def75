//! SQLite storage for the symbol master.

mod model;
mod repository;

pub use model::StockDB;
pub use repository::StockRepository;
