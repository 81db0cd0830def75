//! SQLite storage for reward events, their ledger postings, and the
//! transactional unit of work that also provisions users and stocks and
//! updates positions.

mod model;
mod repository;

pub use model::{LedgerAccountDB, LedgerEntryDB, RewardEventDB, UserDB};
pub use repository::RewardRepository;
