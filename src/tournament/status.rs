//! The tournament coordinator.
//!
//! [`TournamentStatus`] is an immutable snapshot of one tournament run: the
//! static spec, the initial seeding, and every result reported so far.
//! `with_new_result` produces a new snapshot instead of mutating, so callers
//! can share and branch statuses freely.
//!
//! Every query walks the stages in order and recomputes from scratch. The
//! result set is keyed by match coordinates, so the outcome of a query never
//! depends on the order results were submitted in.

use chrono::{DateTime, Utc};
use log::debug;
use std::{
    collections::{BTreeMap, BTreeSet, btree_map::Entry},
    sync::Arc,
};

use super::errors::TournamentError;
use crate::format::{FormatRunner, StageContext};
use crate::match_play::{MatchKey, MatchResult, MatchSetup, Seeding};
use crate::scoring::standings::{apply_cutoff, merge_snapshot};
use crate::scoring::{PlayerScore, Ranking};
use crate::spec::TournamentSpec;

/// An immutable snapshot of a tournament in progress.
#[derive(Clone, Debug)]
pub struct TournamentStatus {
    spec: Arc<TournamentSpec>,
    seeding: Seeding,
    results: BTreeMap<MatchKey, MatchResult>,
}

struct Evaluation {
    pending: BTreeSet<MatchSetup>,
    history: Vec<Ranking>,
}

impl TournamentStatus {
    /// Start a tournament run from a spec and an initial seeding.
    pub fn new(spec: Arc<TournamentSpec>, seeding: Seeding) -> Result<Self, TournamentError> {
        if seeding.len() < 2 {
            return Err(TournamentError::NotEnoughPlayers);
        }
        Ok(Self {
            spec,
            seeding,
            results: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn spec(&self) -> &TournamentSpec {
        &self.spec
    }

    #[must_use]
    pub fn seeding(&self) -> &Seeding {
        &self.seeding
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// A new snapshot with one more result recorded.
    ///
    /// The result must carry an id minted by this tournament. Resubmitting
    /// an identical result is idempotent; a different result under an
    /// already-recorded id is rejected.
    pub fn with_new_result(&self, result: MatchResult) -> Result<Self, TournamentError> {
        let (name, key) = MatchKey::parse(result.match_id())?;
        if name != self.spec.name_internal() {
            return Err(TournamentError::ForeignResult {
                id: result.match_id().to_string(),
                tournament: self.spec.name_internal().to_string(),
            });
        }
        let stages = self.spec.stages().len();
        if key.stage >= stages {
            return Err(TournamentError::StageOutOfRange {
                id: result.match_id().to_string(),
                stage: key.stage,
                stages,
            });
        }

        let mut results = self.results.clone();
        match results.entry(key) {
            Entry::Occupied(existing) => {
                if existing.get() != &result {
                    return Err(TournamentError::ConflictingResult(
                        result.match_id().to_string(),
                    ));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(result);
            }
        }
        Ok(Self {
            spec: self.spec.clone(),
            seeding: self.seeding.clone(),
            results,
        })
    }

    /// A new snapshot with several more results recorded.
    pub fn with_new_results(
        &self,
        results: impl IntoIterator<Item = MatchResult>,
    ) -> Result<Self, TournamentError> {
        let mut status = self.clone();
        for result in results {
            status = status.with_new_result(result)?;
        }
        Ok(status)
    }

    /// The matches that should be run now. Empty means the tournament is
    /// finished.
    #[must_use]
    pub fn next_matches_to_run(&self) -> BTreeSet<MatchSetup> {
        self.evaluate(None).pending
    }

    /// Like [`Self::next_matches_to_run`], but holds back rounds whose
    /// configured start time lies after `now`. Completion semantics ignore
    /// gating: a gated tournament is still in progress.
    #[must_use]
    pub fn next_matches_to_run_at(&self, now: DateTime<Utc>) -> BTreeSet<MatchSetup> {
        self.evaluate(Some(now)).pending
    }

    /// The current merged ranking over every player the tournament has
    /// seen.
    #[must_use]
    pub fn current_standings(&self) -> Ranking {
        let mut evaluation = self.evaluate(None);
        evaluation
            .history
            .pop()
            .unwrap_or_else(|| Ranking::seed_only(&self.seeding))
    }

    /// Every standings snapshot so far: the seeding-only entry followed by
    /// each stage's per-round history, up to the first stage with pending
    /// matches. Snapshots are append-only as results accumulate.
    #[must_use]
    pub fn standings_history(&self) -> Vec<Ranking> {
        self.evaluate(None).history
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_matches_to_run().is_empty()
    }

    fn evaluate(&self, now: Option<DateTime<Utc>>) -> Evaluation {
        let stage_count = self.spec.stages().len();
        let mut by_stage: Vec<BTreeMap<MatchKey, &MatchResult>> =
            vec![BTreeMap::new(); stage_count];
        for (key, result) in &self.results {
            // Stage bounds were checked when the result was recorded.
            if let Some(bucket) = by_stage.get_mut(key.stage) {
                bucket.insert(*key, result);
            }
        }

        let mut history = vec![Ranking::seed_only(&self.seeding)];
        let mut stage_seeding = self.seeding.clone();
        let mut dropout_tail: Vec<PlayerScore> = Vec::new();

        for (stage_num, stage) in self.spec.stages().iter().enumerate() {
            let runner = stage.runner();
            let ctx = StageContext {
                tournament_name: self.spec.name_internal(),
                stage_num,
                seeding: &stage_seeding,
                rounds: &stage.rounds,
                results: by_stage[stage_num].clone(),
                now: None,
            };

            let wrap = stage_num > 0;
            let stage_history = runner.standings_history(&ctx);
            for snapshot in &stage_history {
                history.push(merge_snapshot(snapshot, wrap, &dropout_tail));
            }

            let pending = runner.matches_to_run(&ctx);
            if !pending.is_empty() {
                let released = match now {
                    Some(_) => {
                        let gated_ctx = StageContext { now, ..ctx };
                        runner.matches_to_run(&gated_ctx)
                    }
                    None => pending,
                };
                return Evaluation {
                    pending: released,
                    history,
                };
            }

            let stage_final = match stage_history.last() {
                Some(snapshot) => merge_snapshot(snapshot, wrap, &dropout_tail),
                // A degenerate stage (single entrant) completes without
                // producing a snapshot of its own; record the merged
                // seed-only ranking so the history still ends with this
                // stage's standings.
                None => {
                    let merged =
                        merge_snapshot(&Ranking::seed_only(&stage_seeding), wrap, &dropout_tail);
                    history.push(merged.clone());
                    merged
                }
            };

            if stage_num + 1 < stage_count {
                let (next_seeding, next_tail) = apply_cutoff(&stage_final, stage.player_cutoff);
                debug!(
                    "tournament {}: stage {stage_num} complete, {} of {} players advance",
                    self.spec.name_internal(),
                    next_seeding.len(),
                    stage_final.len(),
                );
                stage_seeding = next_seeding;
                dropout_tail = next_tail;
            } else {
                debug!(
                    "tournament {}: final stage {stage_num} complete",
                    self.spec.name_internal(),
                );
            }
        }

        Evaluation {
            pending: BTreeSet::new(),
            history,
        }
    }
}
