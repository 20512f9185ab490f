//! Match-level value types: players, seedings, setups, and results.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use super::errors::ResultError;
use crate::spec::Game;

/// Type alias for a role's goal value. Goals range over `0..=100`.
pub type Goal = u16;

/// Highest admissible goal value.
pub const MAX_GOAL: Goal = 100;

/// An opaque player identifier. Equality is by identity.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Player(String);

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Player {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Player {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An ordered, duplicate-free sequence of players, best first.
///
/// A player's index in the sequence is their *seed*: seed 0 is the player
/// considered strongest going in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seeding(Vec<Player>);

impl Seeding {
    /// Build a seeding, rejecting duplicate players.
    pub fn new(players: Vec<Player>) -> Result<Self, ResultError> {
        for (i, player) in players.iter().enumerate() {
            if players[..i].contains(player) {
                return Err(ResultError::DuplicatePlayer(player.clone()));
            }
        }
        Ok(Self(players))
    }

    /// Build a seeding from players already known to be unique
    /// (e.g. drawn from a ranking).
    pub(crate) fn from_unique(players: Vec<Player>) -> Self {
        debug_assert!(
            players
                .iter()
                .enumerate()
                .all(|(i, p)| !players[..i].contains(p))
        );
        Self(players)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
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
    pub fn get(&self, seed: usize) -> Option<&Player> {
        self.0.get(seed)
    }

    #[must_use]
    pub fn seed_of(&self, player: &Player) -> Option<usize> {
        self.0.iter().position(|p| p == player)
    }
}

/// Everything the match-execution infrastructure needs to run one match.
///
/// Two setups are equal iff all fields are equal. Ordering is keyed by the
/// match id (which the engine keeps unique), so setups can live in ordered
/// sets.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchSetup {
    pub match_id: String,
    pub game: Game,
    /// Role-indexed: `players[r]` plays role `r`.
    pub players: Vec<Player>,
    pub start_clock: u32,
    pub play_clock: u32,
}

impl Ord for MatchSetup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.match_id
            .cmp(&other.match_id)
            .then_with(|| self.game.source.cmp(&other.game.source))
            .then_with(|| self.game.id.cmp(&other.game.id))
            .then_with(|| self.players.cmp(&other.players))
            .then_with(|| self.start_clock.cmp(&other.start_clock))
            .then_with(|| self.play_clock.cmp(&other.play_clock))
    }
}

impl PartialOrd for MatchSetup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MatchSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let players = self
            .players
            .iter()
            .map(Player::as_str)
            .collect::<Vec<_>>()
            .join(" vs ");
        write!(f, "{} [{}: {players}]", self.match_id, self.game)
    }
}

/// How a match ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Outcome {
    Completed,
    Aborted,
}

/// Raw, unvalidated result shape used for deserialization.
#[derive(Deserialize)]
struct RawMatchResult {
    setup: MatchSetup,
    outcome: Outcome,
    goals: Option<Vec<Goal>>,
    error_logs: Vec<Vec<String>>,
}

/// The reported outcome of one match.
///
/// Construction is fail-fast: a value of this type always satisfies the
/// goal-count, goal-range, and fixed-sum rules for its game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawMatchResult")]
pub struct MatchResult {
    setup: MatchSetup,
    outcome: Outcome,
    /// Present iff the match completed; role-indexed.
    goals: Option<Vec<Goal>>,
    /// Per-role error annotations collected over the match's turns.
    error_logs: Vec<Vec<String>>,
}

impl MatchResult {
    /// Record a completed match with its role-indexed goals.
    pub fn completed(
        setup: MatchSetup,
        goals: Vec<Goal>,
        error_logs: Vec<Vec<String>>,
    ) -> Result<Self, ResultError> {
        Self::build(setup, Outcome::Completed, Some(goals), error_logs)
    }

    /// Record an aborted match. Aborted matches carry no goals.
    pub fn aborted(setup: MatchSetup, error_logs: Vec<Vec<String>>) -> Result<Self, ResultError> {
        Self::build(setup, Outcome::Aborted, None, error_logs)
    }

    fn build(
        setup: MatchSetup,
        outcome: Outcome,
        goals: Option<Vec<Goal>>,
        error_logs: Vec<Vec<String>>,
    ) -> Result<Self, ResultError> {
        let roles = setup.players.len();

        match (outcome, &goals) {
            (Outcome::Completed, None) => return Err(ResultError::MissingGoals),
            (Outcome::Aborted, Some(_)) => return Err(ResultError::UnexpectedGoals),
            (Outcome::Completed, Some(goals)) => {
                if goals.len() != roles {
                    return Err(ResultError::GoalCountMismatch {
                        expected: roles,
                        actual: goals.len(),
                    });
                }
                if let Some(&bad) = goals.iter().find(|&&g| g > MAX_GOAL) {
                    return Err(ResultError::GoalOutOfRange(bad));
                }
                if setup.game.fixed_sum {
                    let total: u32 = goals.iter().map(|&g| u32::from(g)).sum();
                    if total != 100 {
                        return Err(ResultError::FixedSumViolation {
                            game: setup.game.to_string(),
                            total,
                        });
                    }
                }
            }
            (Outcome::Aborted, None) => {}
        }

        let error_logs = if error_logs.is_empty() {
            vec![Vec::new(); roles]
        } else if error_logs.len() == roles {
            error_logs
        } else {
            return Err(ResultError::ErrorLogCountMismatch {
                expected: roles,
                actual: error_logs.len(),
            });
        };

        Ok(Self {
            setup,
            outcome,
            goals,
            error_logs,
        })
    }

    #[must_use]
    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    #[must_use]
    pub fn match_id(&self) -> &str {
        &self.setup.match_id
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    #[must_use]
    pub fn goals(&self) -> Option<&[Goal]> {
        self.goals.as_deref()
    }

    /// The goal a given player earned, when the match completed and the
    /// player took part in it.
    #[must_use]
    pub fn goal_of(&self, player: &Player) -> Option<Goal> {
        let goals = self.goals.as_ref()?;
        let role = self.setup.players.iter().position(|p| p == player)?;
        goals.get(role).copied()
    }

    #[must_use]
    pub fn error_logs(&self) -> &[Vec<String>] {
        &self.error_logs
    }
}

impl TryFrom<RawMatchResult> for MatchResult {
    type Error = ResultError;

    fn try_from(raw: RawMatchResult) -> Result<Self, Self::Error> {
        Self::build(raw.setup, raw.outcome, raw.goals, raw.error_logs)
    }
}
