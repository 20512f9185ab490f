//! Swiss-system format (Monrad-style score-group pairing).
//!
//! The stage runs exactly the configured number of rounds. Each round the
//! paired players play every match template declared for that round, and
//! cumulative points (win = 1, draw = ½, scaled by the template's weight)
//! decide the next round's pairing.
//!
//! Pairing for round R is a pure function of the results of rounds before R:
//! players are ordered by points (descending) then entry seed (ascending),
//! and paired by a backtracking search that tries the nearest-ranked
//! opponent first while refusing rematches. When no rematch-free pairing of
//! the whole field exists, the search reruns with rematches permitted
//! rather than deadlocking. Odd fields give a bye — a free win in each of
//! the round's templates — to the lowest-ranked player who has not had one
//! yet.
//!
//! Aborted matches award no points to either side.

use log::warn;
use std::collections::BTreeSet;

use super::{FormatRunner, PairOutcome, StageContext, pair_outcome};
use crate::match_play::{MatchKey, MatchResult, MatchSetup};
use crate::scoring::{PlayerScore, Ranking, Score, SwissPoints};
use crate::spec::{RoundSpec, SpecError};

/// Runner for the `swiss1` format tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwissRunner;

struct SwissWalk {
    pending: BTreeSet<MatchSetup>,
    pending_round: Option<usize>,
    history: Vec<Ranking>,
}

/// Normalize a pair for rematch bookkeeping.
fn played_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Order seeds for pairing: points descending, entry seed ascending.
fn pairing_order(points: &[SwissPoints]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[b].cmp(&points[a]).then(a.cmp(&b)));
    order
}

/// Backtracking pairing over the given order. The first unpaired player is
/// matched against the nearest-ranked admissible opponent such that the
/// rest of the field can still be paired.
fn try_pair(
    order: &[usize],
    played: &BTreeSet<(usize, usize)>,
    allow_rematch: bool,
) -> Option<Vec<(usize, usize)>> {
    let Some((&first, rest)) = order.split_first() else {
        return Some(Vec::new());
    };
    for (i, &opponent) in rest.iter().enumerate() {
        if !allow_rematch && played.contains(&played_key(first, opponent)) {
            continue;
        }
        let remainder: Vec<usize> = rest
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &seed)| seed)
            .collect();
        if let Some(mut pairs) = try_pair(&remainder, played, allow_rematch) {
            let mut all = vec![(first, opponent)];
            all.append(&mut pairs);
            return Some(all);
        }
    }
    None
}

/// Pick the bye for an odd field: the lowest-ranked player who has not had
/// one yet, falling back to the lowest-ranked overall.
fn pick_bye(order: &mut Vec<usize>, byes_taken: &[u32]) -> Option<usize> {
    if order.len() % 2 == 0 {
        return None;
    }
    let position = order
        .iter()
        .rposition(|&seed| byes_taken[seed] == 0)
        .unwrap_or(order.len() - 1);
    Some(order.remove(position))
}

impl SwissRunner {
    fn walk(&self, ctx: &StageContext<'_>) -> SwissWalk {
        let n = ctx.seeding.len();
        let mut points = vec![SwissPoints::zero(); n];
        let mut played: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut byes_taken = vec![0u32; n];
        let mut history = Vec::new();

        for (round, round_spec) in ctx.rounds.iter().enumerate() {
            let mut order = pairing_order(&points);
            let bye = pick_bye(&mut order, &byes_taken);
            let pairs = match try_pair(&order, &played, false) {
                Some(pairs) => pairs,
                None => {
                    warn!(
                        "stage {} round {round}: no rematch-free pairing exists, permitting rematches",
                        ctx.stage_num
                    );
                    try_pair(&order, &played, true).unwrap_or_default()
                }
            };

            let templates = &round_spec.matches;
            let mut pending = BTreeSet::new();
            let mut resolved: Vec<(usize, usize, usize, &MatchResult)> = Vec::new();

            for (pair_index, &(a, b)) in pairs.iter().enumerate() {
                let (better, worse) = match (ctx.seeding.get(a), ctx.seeding.get(b)) {
                    (Some(better), Some(worse)) => (better, worse),
                    _ => continue,
                };
                for (template_index, template) in templates.iter().enumerate() {
                    let key = MatchKey::new(
                        ctx.stage_num,
                        round,
                        pair_index * templates.len() + template_index,
                    );
                    match ctx.result(&key) {
                        Some(result) => resolved.push((a, b, template_index, result)),
                        None => {
                            pending.insert(ctx.build_setup(key, template, better, worse));
                        }
                    }
                }
            }

            if !pending.is_empty() {
                return SwissWalk {
                    pending,
                    pending_round: Some(round),
                    history,
                };
            }

            for (a, b, template_index, result) in resolved {
                let weight = templates[template_index].weight;
                let (better, worse) = match (ctx.seeding.get(a), ctx.seeding.get(b)) {
                    (Some(better), Some(worse)) => (better, worse),
                    _ => continue,
                };
                match pair_outcome(result, better, worse) {
                    Some(PairOutcome::BetterWins) => {
                        points[a] = points[a].plus(SwissPoints::win(weight));
                    }
                    Some(PairOutcome::WorseWins) => {
                        points[b] = points[b].plus(SwissPoints::win(weight));
                    }
                    Some(PairOutcome::Draw) => {
                        points[a] = points[a].plus(SwissPoints::draw(weight));
                        points[b] = points[b].plus(SwissPoints::draw(weight));
                    }
                    None => {}
                }
            }
            for &(a, b) in &pairs {
                played.insert(played_key(a, b));
            }
            if let Some(bye_seed) = bye {
                byes_taken[bye_seed] += 1;
                for template in templates {
                    points[bye_seed] = points[bye_seed].plus(SwissPoints::win(template.weight));
                }
            }
            history.push(snapshot(ctx, &points));
        }

        SwissWalk {
            pending: BTreeSet::new(),
            pending_round: None,
            history,
        }
    }
}

fn snapshot(ctx: &StageContext<'_>, points: &[SwissPoints]) -> Ranking {
    Ranking::new(
        ctx.seeding
            .players()
            .iter()
            .enumerate()
            .map(|(seed, player)| PlayerScore {
                player: player.clone(),
                score: Score::Swiss(points[seed]),
                seed,
            })
            .collect(),
    )
}

impl FormatRunner for SwissRunner {
    fn validate_rounds(&self, _stage_num: usize, rounds: &[RoundSpec]) -> Result<(), SpecError> {
        for round in rounds {
            for template in &round.matches {
                if template.game.num_roles != 2 {
                    return Err(SpecError::UnsupportedRoleCount {
                        game: template.game.to_string(),
                        num_roles: template.game.num_roles,
                        format: "swiss",
                    });
                }
            }
        }
        Ok(())
    }

    fn matches_to_run(&self, ctx: &StageContext<'_>) -> BTreeSet<MatchSetup> {
        let walk = self.walk(ctx);
        match walk.pending_round {
            Some(round) if !ctx.round_released(&ctx.rounds[round]) => BTreeSet::new(),
            _ => walk.pending,
        }
    }

    fn standings_history(&self, ctx: &StageContext<'_>) -> Vec<Ranking> {
        self.walk(ctx).history
    }
}
