use thiserror::Error;

use crate::match_play::ResultError;
use crate::spec::SpecError;

/// Errors raised by the tournament coordinator.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error("seeding must contain at least two players")]
    NotEnoughPlayers,
    #[error("result {id:?} does not belong to tournament {tournament:?}")]
    ForeignResult { id: String, tournament: String },
    #[error("result {id:?} references stage {stage}, but the tournament has {stages} stages")]
    StageOutOfRange {
        id: String,
        stage: usize,
        stages: usize,
    },
    #[error("conflicting result already recorded for match {0:?}")]
    ConflictingResult(String),
}
