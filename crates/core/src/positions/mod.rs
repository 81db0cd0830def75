//! Positions module - running shares and weighted-average cost per (user, symbol).

mod positions_model;
mod positions_traits;

pub use positions_model::Position;
pub use positions_traits::PositionRepositoryTrait;
