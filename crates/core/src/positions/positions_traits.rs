use super::positions_model::Position;
use crate::errors::Result;

/// Read access to positions.
///
/// Positions are written only by the reward unit of work.
pub trait PositionRepositoryTrait: Send + Sync {
    fn get(&self, user_id: &str, symbol: &str) -> Result<Option<Position>>;

    /// Positions of one user, ordered by symbol.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Position>>;

    /// Every stored position across all users.
    fn list_all(&self) -> Result<Vec<Position>>;
}
