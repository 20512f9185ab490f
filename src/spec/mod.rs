//! Tournament configuration: raw schema, validation, and the immutable
//! spec tree consumed by the scheduling engine.

pub mod config;
pub mod errors;
pub mod models;

pub use config::{FormatTag, GameConfig, MatchConfig, RoundConfig, StageConfig, TournamentConfig};
pub use errors::SpecError;
pub use models::{Game, MatchSpec, RoundSpec, StageSpec, TournamentSpec};
