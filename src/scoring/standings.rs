//! Cross-stage standings composition.
//!
//! Once a stage completes, its survivors become the next stage's seeding and
//! everyone else is frozen into a dropout tail. Each later snapshot wraps the
//! active stage's scores in `MadeCutoff` and appends the tail, producing one
//! continuous ranking over every player the tournament has seen. Tail
//! entries gain one `FailedCutoff` layer per stage boundary they sit out, so
//! later dropouts always outrank earlier ones without any cross-stage score
//! arithmetic.

use super::models::{PlayerScore, Ranking};
use crate::match_play::Seeding;

/// Merge a stage-internal snapshot with the frozen dropout tail.
///
/// Stage 0 snapshots keep their raw scores; later stages wrap entrant scores
/// in `MadeCutoff` so they rank above every eliminated player.
#[must_use]
pub(crate) fn merge_snapshot(
    snapshot: &Ranking,
    wrap_made_cutoff: bool,
    tail: &[PlayerScore],
) -> Ranking {
    let mut entries: Vec<PlayerScore> = snapshot
        .entries()
        .iter()
        .map(|entry| {
            let score = if wrap_made_cutoff {
                entry.score.clone().made_cutoff()
            } else {
                entry.score.clone()
            };
            PlayerScore {
                player: entry.player.clone(),
                score,
                seed: entry.seed,
            }
        })
        .collect();
    entries.extend(tail.iter().cloned());
    Ranking::new(entries)
}

/// Split a completed stage's merged standings into the next stage's seeding
/// and the new dropout tail.
///
/// The seeding takes the best `min(cutoff, len)` players in ranking order.
/// Every other entry, including the previous tail, is wrapped in one more
/// `FailedCutoff` layer and carried forward unreordered.
#[must_use]
pub(crate) fn apply_cutoff(
    merged: &Ranking,
    cutoff: Option<usize>,
) -> (Seeding, Vec<PlayerScore>) {
    let keep = cutoff.unwrap_or(merged.len()).min(merged.len());
    let seeding = merged.top(keep);
    let tail = merged.entries()[keep..]
        .iter()
        .map(|entry| PlayerScore {
            player: entry.player.clone(),
            score: entry.score.clone().failed_cutoff(),
            seed: entry.seed,
        })
        .collect();
    (seeding, tail)
}
