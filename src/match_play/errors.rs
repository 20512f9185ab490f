use thiserror::Error;

use super::models::Player;

/// Errors raised while constructing match-level values.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum ResultError {
    #[error("match id {0:?} is not of the form name.stage.round.match")]
    MalformedMatchId(String),
    #[error("player {0} appears more than once in the seeding")]
    DuplicatePlayer(Player),
    #[error("completed match must report goals")]
    MissingGoals,
    #[error("aborted match cannot report goals")]
    UnexpectedGoals,
    #[error("expected {expected} goals, got {actual}")]
    GoalCountMismatch { expected: usize, actual: usize },
    #[error("goal {0} outside 0..=100")]
    GoalOutOfRange(u16),
    #[error("goals for fixed-sum game {game} must total 100, got {total}")]
    FixedSumViolation { game: String, total: u32 },
    #[error("expected error logs for {expected} roles, got {actual}")]
    ErrorLogCountMismatch { expected: usize, actual: usize },
}
