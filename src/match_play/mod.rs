//! Match identity and match-level value types.

pub mod errors;
pub mod ids;
pub mod models;

pub use errors::ResultError;
pub use ids::MatchKey;
pub use models::{Goal, MAX_GOAL, MatchResult, MatchSetup, Outcome, Player, Seeding};
