//! Pluggable pairing formats.
//!
//! Each stage is governed by a [`FormatRunner`]: a pure pairing algorithm
//! that, given the stage's seeding and the results reported so far, decides
//! which matches to run next and how the stage's internal standings look
//! after each completed round. Dispatch is a closed enum; adding a format
//! means adding a variant here and implementing the trait.

pub mod single_elimination;
pub mod swiss;

use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;
use std::{cmp::Ordering, collections::BTreeMap, collections::BTreeSet};

use crate::match_play::{MatchKey, MatchResult, MatchSetup, Player, Seeding};
use crate::scoring::Ranking;
use crate::spec::{FormatTag, MatchSpec, RoundSpec, SpecError};

pub use single_elimination::SingleEliminationRunner;
pub use swiss::SwissRunner;

/// Everything a format runner needs to schedule one stage.
///
/// `results` holds only this stage's results, keyed by match coordinates.
/// `now` is set when the caller opted into start-time gating.
#[derive(Debug)]
pub struct StageContext<'a> {
    pub tournament_name: &'a str,
    pub stage_num: usize,
    pub seeding: &'a Seeding,
    pub rounds: &'a [RoundSpec],
    pub results: BTreeMap<MatchKey, &'a MatchResult>,
    pub now: Option<DateTime<Utc>>,
}

impl StageContext<'_> {
    #[must_use]
    pub fn result(&self, key: &MatchKey) -> Option<&MatchResult> {
        self.results.get(key).copied()
    }

    /// Whether a round's matches may be released, honoring its start time
    /// when gating is in effect.
    #[must_use]
    pub fn round_released(&self, round: &RoundSpec) -> bool {
        match (self.now, round.start_time) {
            (Some(now), Some(start)) => now >= start,
            _ => true,
        }
    }

    /// Build the setup for a pairing, assigning roles per the template's
    /// seed-role mapping (relative seed 0 is the better-placed player).
    #[must_use]
    pub fn build_setup(
        &self,
        key: MatchKey,
        template: &MatchSpec,
        better: &Player,
        worse: &Player,
    ) -> MatchSetup {
        let players = template
            .seed_roles
            .iter()
            .map(|&relative| {
                if relative == 0 {
                    better.clone()
                } else {
                    worse.clone()
                }
            })
            .collect();
        MatchSetup {
            match_id: key.render(self.tournament_name),
            game: (*template.game).clone(),
            players,
            start_clock: template.start_clock,
            play_clock: template.play_clock,
        }
    }
}

/// How one pairwise match went, from the better-placed player's side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PairOutcome {
    BetterWins,
    WorseWins,
    Draw,
}

/// Interpret a result for a pairing. Returns `None` for aborted matches and
/// for results whose players cannot be attributed (both contribute no
/// goals).
pub(crate) fn pair_outcome(
    result: &MatchResult,
    better: &Player,
    worse: &Player,
) -> Option<PairOutcome> {
    if !result.is_completed() {
        return None;
    }
    let better_goal = result.goal_of(better)?;
    let worse_goal = result.goal_of(worse)?;
    Some(match better_goal.cmp(&worse_goal) {
        Ordering::Greater => PairOutcome::BetterWins,
        Ordering::Less => PairOutcome::WorseWins,
        Ordering::Equal => PairOutcome::Draw,
    })
}

/// The contract every pairing format implements.
///
/// Both scheduling operations are pure functions of the context; they must
/// not depend on the order results were submitted in.
#[enum_dispatch]
pub trait FormatRunner {
    /// Reject round structures the format cannot run.
    fn validate_rounds(&self, stage_num: usize, rounds: &[RoundSpec]) -> Result<(), SpecError>;

    /// The matches that should be run now. Empty means the stage is done.
    fn matches_to_run(&self, ctx: &StageContext<'_>) -> BTreeSet<MatchSetup>;

    /// One standings snapshot per completed round, oldest first. Grows
    /// monotonically as results accumulate; earlier entries never change.
    fn standings_history(&self, ctx: &StageContext<'_>) -> Vec<Ranking>;
}

/// The closed set of supported pairing formats.
#[enum_dispatch(FormatRunner)]
#[derive(Clone, Copy, Debug)]
pub enum Format {
    SingleElimination(SingleEliminationRunner),
    Swiss(SwissRunner),
}

impl Format {
    #[must_use]
    pub fn from_tag(tag: FormatTag) -> Self {
        match tag {
            FormatTag::SingleElimination => Self::SingleElimination(SingleEliminationRunner),
            FormatTag::Swiss1 => Self::Swiss(SwissRunner),
        }
    }
}
