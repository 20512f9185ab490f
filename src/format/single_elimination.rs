//! Single-elimination bracket format.
//!
//! For `n` entrants the bracket runs ⌈log2 n⌉ rounds, ignoring the
//! configured round count; configured rounds only supply match templates
//! (the last round spec covers any deeper rounds). When `n` is not a power
//! of two, the top seeds receive first-round byes and advance unplayed.
//!
//! Each round re-pairs the survivors in the seed order established at stage
//! entry: best remaining seed against worst remaining seed, and so on
//! inward. A round becomes eligible only once every match of the previous
//! round carries a result.
//!
//! Advancement policy: the strictly higher goal wins. A drawn or aborted
//! match advances the better-seeded player; there are no replays.

use std::collections::BTreeSet;

use super::{FormatRunner, PairOutcome, StageContext, pair_outcome};
use crate::match_play::{MatchKey, MatchSetup};
use crate::scoring::{BracketScore, PlayerScore, Ranking, Score};
use crate::spec::{RoundSpec, SpecError};

/// Runner for the `singleElimination` format tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleEliminationRunner;

/// Number of bracket rounds for `n` entrants.
#[must_use]
pub fn round_count(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        n.next_power_of_two().trailing_zeros() as usize
    }
}

/// Split the survivors (ascending seed order) into byes and pairings.
///
/// With `m` survivors and bracket size `k` (next power of two), the top
/// `k - m` seeds sit out; the rest pair best against worst.
fn seed_pairs(alive: &[usize]) -> (Vec<usize>, Vec<(usize, usize)>) {
    let m = alive.len();
    if m <= 1 {
        return (alive.to_vec(), Vec::new());
    }
    let k = m.next_power_of_two();
    let byes = alive[..k - m].to_vec();
    let rest = &alive[k - m..];
    let pairs = (0..rest.len() / 2)
        .map(|i| (rest[i], rest[rest.len() - 1 - i]))
        .collect();
    (byes, pairs)
}

/// Round specs only template the bracket; depth beyond the configured
/// rounds reuses the last spec.
fn round_spec_for<'a>(rounds: &'a [RoundSpec], round: usize) -> &'a RoundSpec {
    &rounds[round.min(rounds.len() - 1)]
}

struct BracketWalk {
    pending: BTreeSet<MatchSetup>,
    pending_round: Option<usize>,
    history: Vec<Ranking>,
}

impl SingleEliminationRunner {
    fn walk(&self, ctx: &StageContext<'_>) -> BracketWalk {
        let n = ctx.seeding.len();
        let total_rounds = round_count(n);
        let mut advanced = vec![0u32; n];
        let mut alive: Vec<usize> = (0..n).collect();
        let mut history = Vec::new();

        for round in 0..total_rounds {
            let template = &round_spec_for(ctx.rounds, round).matches[0];
            let (byes, pairs) = seed_pairs(&alive);
            let mut next = byes;
            let mut pending = BTreeSet::new();

            for (index, &(a, b)) in pairs.iter().enumerate() {
                let key = MatchKey::new(ctx.stage_num, round, index);
                let (better, worse) = match (ctx.seeding.get(a), ctx.seeding.get(b)) {
                    (Some(better), Some(worse)) => (better, worse),
                    _ => continue,
                };
                match ctx.result(&key) {
                    Some(result) => {
                        let winner = match pair_outcome(result, better, worse) {
                            Some(PairOutcome::WorseWins) => b,
                            // Draws and aborts advance the better seed.
                            _ => a,
                        };
                        next.push(winner);
                    }
                    None => {
                        pending.insert(ctx.build_setup(key, template, better, worse));
                    }
                }
            }

            if !pending.is_empty() {
                return BracketWalk {
                    pending,
                    pending_round: Some(round),
                    history,
                };
            }

            for &seed in &next {
                advanced[seed] += 1;
            }
            next.sort_unstable();
            alive = next;
            history.push(snapshot(ctx, &advanced));
        }

        BracketWalk {
            pending: BTreeSet::new(),
            pending_round: None,
            history,
        }
    }
}

fn snapshot(ctx: &StageContext<'_>, advanced: &[u32]) -> Ranking {
    Ranking::new(
        ctx.seeding
            .players()
            .iter()
            .enumerate()
            .map(|(seed, player)| PlayerScore {
                player: player.clone(),
                score: Score::Bracket(BracketScore {
                    rounds_advanced: advanced[seed],
                }),
                seed,
            })
            .collect(),
    )
}

impl FormatRunner for SingleEliminationRunner {
    fn validate_rounds(&self, stage_num: usize, rounds: &[RoundSpec]) -> Result<(), SpecError> {
        for (round_num, round) in rounds.iter().enumerate() {
            if round.matches.len() != 1 {
                return Err(SpecError::TooManyBracketMatches {
                    stage: stage_num,
                    round: round_num,
                    count: round.matches.len(),
                });
            }
            for template in &round.matches {
                if template.game.num_roles != 2 {
                    return Err(SpecError::UnsupportedRoleCount {
                        game: template.game.to_string(),
                        num_roles: template.game.num_roles,
                        format: "single elimination",
                    });
                }
            }
        }
        Ok(())
    }

    fn matches_to_run(&self, ctx: &StageContext<'_>) -> BTreeSet<MatchSetup> {
        let walk = self.walk(ctx);
        match walk.pending_round {
            Some(round) if !ctx.round_released(round_spec_for(ctx.rounds, round)) => {
                BTreeSet::new()
            }
            _ => walk.pending,
        }
    }

    fn standings_history(&self, ctx: &StageContext<'_>) -> Vec<Ranking> {
        self.walk(ctx).history
    }
}
