//! Deterministic match identity.
//!
//! A match id encodes the tournament's internal name and the match's logical
//! position: `"{name}.{stage}.{round}.{index}"`. The internal name is
//! restricted to `[A-Za-z0-9_]+`, so the separator never appears in it and
//! the encoding is injective. Rendering the same logical match always yields
//! byte-identical ids.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ResultError;

/// Separator between id segments.
const SEPARATOR: char = '.';

/// The logical coordinates of a match within one tournament run.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct MatchKey {
    /// Index of the stage the match belongs to.
    pub stage: usize,
    /// Round index within the stage (bracket depth or Swiss round).
    pub round: usize,
    /// Index within the round.
    pub index: usize,
}

impl MatchKey {
    #[must_use]
    pub const fn new(stage: usize, round: usize, index: usize) -> Self {
        Self {
            stage,
            round,
            index,
        }
    }

    /// Render the full match id for a tournament.
    #[must_use]
    pub fn render(&self, tournament_name: &str) -> String {
        format!(
            "{tournament_name}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.stage, self.round, self.index
        )
    }

    /// Parse a match id back into its tournament name and coordinates.
    pub fn parse(match_id: &str) -> Result<(String, Self), ResultError> {
        let malformed = || ResultError::MalformedMatchId(match_id.to_string());

        let mut segments = match_id.rsplitn(4, SEPARATOR);
        let index = segments.next().ok_or_else(malformed)?;
        let round = segments.next().ok_or_else(malformed)?;
        let stage = segments.next().ok_or_else(malformed)?;
        let name = segments.next().ok_or_else(malformed)?;
        if name.is_empty() {
            return Err(malformed());
        }

        let key = Self {
            stage: stage.parse().map_err(|_| malformed())?,
            round: round.parse().map_err(|_| malformed())?,
            index: index.parse().map_err(|_| malformed())?,
        };
        Ok((name.to_string(), key))
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} round {} match {}", self.stage, self.round, self.index)
    }
}
