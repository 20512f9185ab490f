//! Score model and ranking logic.

pub mod models;
pub(crate) mod standings;

pub use models::{BracketScore, MilliPoints, PlayerScore, Ranking, Score, SwissPoints};
