//! Scores, player scores, and rankings.
//!
//! `Score` is a closed sum over every kind of score the engine produces.
//! Scores are only ever compared within one ranking, where all entries were
//! built by the same composition of rules; comparing raw scores of different
//! kinds is a programming error and panics rather than producing an
//! arbitrary ordering.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use crate::match_play::{Player, Seeding};

/// Fixed-point Swiss score unit: one win is 1000 milli-points.
pub type MilliPoints = u64;

/// Cumulative Swiss points, stored fixed-point so ordering is exact.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct SwissPoints(MilliPoints);

impl SwissPoints {
    const WIN: f64 = 1000.0;
    const DRAW: f64 = 500.0;

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Points for winning a match with the given weight.
    #[must_use]
    pub fn win(weight: f64) -> Self {
        Self((Self::WIN * weight).round() as MilliPoints)
    }

    /// Points for drawing a match with the given weight.
    #[must_use]
    pub fn draw(weight: f64) -> Self {
        Self((Self::DRAW * weight).round() as MilliPoints)
    }

    /// Accumulate points. Saturates at the top of the milli-point range,
    /// which extreme configured weights can reach.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    #[must_use]
    pub const fn millipoints(self) -> MilliPoints {
        self.0
    }
}

impl fmt::Display for SwissPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0 as f64 / 1000.0)
    }
}

/// Bracket progress: the number of rounds a player advanced through
/// (wins and byes both count).
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct BracketScore {
    pub rounds_advanced: u32,
}

/// Every kind of score the engine produces, with one explicit total order:
///
/// - `MadeCutoff` ranks above any non-cutoff score; `FailedCutoff` below.
/// - Wrapped scores compare by their inner score.
/// - Raw scores compare within their own kind only.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Score {
    /// No results yet; ordering falls entirely to the seed tie-break.
    SeedOnly,
    Bracket(BracketScore),
    Swiss(SwissPoints),
    /// Score of a player who advanced past a stage cutoff.
    MadeCutoff(Box<Score>),
    /// Score a player held when eliminated at a stage cutoff.
    FailedCutoff(Box<Score>),
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        use Score::{Bracket, FailedCutoff, MadeCutoff, SeedOnly, Swiss};
        match (self, other) {
            (SeedOnly, SeedOnly) => Ordering::Equal,
            (Bracket(a), Bracket(b)) => a.cmp(b),
            (Swiss(a), Swiss(b)) => a.cmp(b),
            (MadeCutoff(a), MadeCutoff(b)) => a.cmp(b),
            (FailedCutoff(a), FailedCutoff(b)) => a.cmp(b),
            (MadeCutoff(_), _) => Ordering::Greater,
            (_, MadeCutoff(_)) => Ordering::Less,
            (FailedCutoff(_), _) => Ordering::Less,
            (_, FailedCutoff(_)) => Ordering::Greater,
            (a, b) => panic!("comparing incompatible scores {a:?} and {b:?}"),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Score {
    #[must_use]
    pub fn made_cutoff(self) -> Self {
        Self::MadeCutoff(Box::new(self))
    }

    #[must_use]
    pub fn failed_cutoff(self) -> Self {
        Self::FailedCutoff(Box::new(self))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeedOnly => write!(f, "-"),
            Self::Bracket(score) => write!(f, "{} rounds", score.rounds_advanced),
            Self::Swiss(points) => points.fmt(f),
            Self::MadeCutoff(inner) => write!(f, "{inner} (advanced)"),
            Self::FailedCutoff(inner) => write!(f, "{inner} (eliminated)"),
        }
    }
}

/// A player's score together with the seed they held at round start.
///
/// Ordering is ranking order: better score first, then lower seed, then
/// player identity for total determinism.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerScore {
    pub player: Player,
    pub score: Score,
    pub seed: usize,
}

impl Ord for PlayerScore {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.seed.cmp(&other.seed))
            .then_with(|| self.player.cmp(&other.player))
    }
}

impl PartialOrd for PlayerScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlayerScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.player, self.score)
    }
}

/// A sorted, duplicate-free ranking of players, best first.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ranking(Vec<PlayerScore>);

impl Ranking {
    /// Build a ranking from per-player scores. Entries are sorted into
    /// ranking order; callers supply one entry per player.
    #[must_use]
    pub fn new(mut entries: Vec<PlayerScore>) -> Self {
        entries.sort();
        debug_assert!(
            entries
                .iter()
                .enumerate()
                .all(|(i, e)| !entries[..i].iter().any(|o| o.player == e.player)),
            "ranking entries must be one per player"
        );
        Self(entries)
    }

    /// The ranking implied by a seeding alone, before any results.
    #[must_use]
    pub fn seed_only(seeding: &Seeding) -> Self {
        Self(
            seeding
                .players()
                .iter()
                .enumerate()
                .map(|(seed, player)| PlayerScore {
                    player: player.clone(),
                    score: Score::SeedOnly,
                    seed,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn entries(&self) -> &[PlayerScore] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn leader(&self) -> Option<&PlayerScore> {
        self.0.first()
    }

    #[must_use]
    pub fn position_of(&self, player: &Player) -> Option<usize> {
        self.0.iter().position(|e| &e.player == player)
    }

    /// The best `min(cutoff, len)` players in ranking order, as the seeding
    /// for a subsequent stage.
    #[must_use]
    pub fn top(&self, cutoff: usize) -> Seeding {
        Seeding::from_unique(
            self.0
                .iter()
                .take(cutoff)
                .map(|e| e.player.clone())
                .collect(),
        )
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, entry) in self.0.iter().enumerate() {
            writeln!(f, "{:>3}. {entry}", position + 1)?;
        }
        Ok(())
    }
}
