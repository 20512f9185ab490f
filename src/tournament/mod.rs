//! Tournament coordination across stages.
//!
//! [`TournamentStatus`] is an immutable snapshot of one tournament run:
//! the validated spec, the initial seeding, and every result reported so
//! far. Recording a result produces a fresh snapshot; scheduling and
//! standings are recomputed from scratch on each query, so the answers
//! depend only on the accumulated set of results, never on the order they
//! arrived in.

pub mod errors;
pub mod status;

pub use errors::TournamentError;
pub use status::TournamentStatus;

use std::sync::Arc;

use crate::match_play::Seeding;
use crate::spec::TournamentSpec;

/// Start a tournament run from a validated spec and an initial seeding.
pub fn create_initial_status(
    spec: Arc<TournamentSpec>,
    seeding: Seeding,
) -> Result<TournamentStatus, TournamentError> {
    TournamentStatus::new(spec, seeding)
}
