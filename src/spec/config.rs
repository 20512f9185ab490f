//! Raw configuration schema.
//!
//! These types mirror the declarative tournament description handed to us by
//! the spec loader, before any cross-referencing or validation. Unknown keys
//! are rejected during deserialization so typos fail loudly instead of being
//! silently dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::SpecError;

/// Pairing format tags understood by the engine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum FormatTag {
    #[serde(rename = "singleElimination")]
    SingleElimination,
    #[serde(rename = "swiss1")]
    Swiss1,
}

/// A game declaration: identity plus the role/goal semantics the engine
/// needs for pairing and scoring.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GameConfig {
    pub name: String,
    pub repository: String,
    pub num_roles: usize,
    pub fixed_sum: bool,
}

/// One match template within a round.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MatchConfig {
    pub game: String,
    pub start_clock: u32,
    pub play_clock: u32,
    /// Maps role index to relative seed within the pairing
    /// (0 = better-seeded player). Defaults to identity.
    #[serde(default)]
    pub seed_roles: Option<Vec<usize>>,
    /// Scales this match's contribution to format scoring.
    #[serde(default)]
    pub weight: Option<f64>,
}

/// A batch of match templates resolved together.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RoundConfig {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    pub matches: Vec<MatchConfig>,
}

/// One phase of the tournament, governed by a single pairing format.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StageConfig {
    pub format: FormatTag,
    #[serde(default)]
    pub player_cutoff: Option<usize>,
    pub rounds: Vec<RoundConfig>,
}

/// The root configuration document.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TournamentConfig {
    pub games: Vec<GameConfig>,
    pub name_internal: String,
    pub name_display: String,
    pub stages: Vec<StageConfig>,
}

impl TournamentConfig {
    /// Parse a configuration document from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a configuration document from an already-loaded JSON value.
    pub fn from_json_value(raw: serde_json::Value) -> Result<Self, SpecError> {
        Ok(serde_json::from_value(raw)?)
    }
}
