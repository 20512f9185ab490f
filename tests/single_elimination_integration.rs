//! Integration tests for single-elimination tournaments.
//!
//! These tests drive full bracket runs through the public status API and
//! verify pairings, bye handling, upset propagation, and final standings.

use std::sync::Arc;

use tourney::{
    MatchResult, MatchSetup, Player, Score, Seeding, TournamentSpec, TournamentStatus,
    create_initial_status,
};

/// One single-elimination stage with `rounds` configured round templates.
fn bracket_spec(name: &str, rounds: usize) -> Arc<TournamentSpec> {
    let round = r#"{"matches": [{"game": "ttt", "startClock": 60, "playClock": 15}]}"#;
    let rounds_json = vec![round; rounds].join(", ");
    Arc::new(
        TournamentSpec::from_json_str(&format!(
            r#"{{
                "games": [{{"name": "ttt", "repository": "base", "numRoles": 2, "fixedSum": true}}],
                "nameInternal": "{name}",
                "nameDisplay": "{name}",
                "stages": [{{"format": "singleElimination", "rounds": [{rounds_json}]}}]
            }}"#
        ))
        .unwrap(),
    )
}

fn seeding(n: usize) -> Seeding {
    Seeding::new((0..n).map(|i| Player::new(format!("p{i}"))).collect()).unwrap()
}

/// A completed result in which `winner` takes the full goal pool.
fn win_for(setup: MatchSetup, winner: &Player) -> MatchResult {
    let goals = setup
        .players
        .iter()
        .map(|p| if p == winner { 100 } else { 0 })
        .collect();
    MatchResult::completed(setup, goals, vec![]).unwrap()
}

/// Resolve every pending match, choosing winners with `pick`.
fn resolve_all(
    status: &TournamentStatus,
    mut pick: impl FnMut(&MatchSetup) -> Player,
) -> TournamentStatus {
    let mut status = status.clone();
    loop {
        let pending = status.next_matches_to_run();
        if pending.is_empty() {
            return status;
        }
        for setup in pending {
            let winner = pick(&setup);
            status = status.with_new_result(win_for(setup, &winner)).unwrap();
        }
    }
}

fn favorite(setup: &MatchSetup) -> Player {
    // The default seed-role mapping places the better seed in role 0.
    setup.players[0].clone()
}

#[test]
fn test_eight_player_first_round_pairings() {
    let status = create_initial_status(bracket_spec("se8", 3), seeding(8)).unwrap();
    let pending: Vec<MatchSetup> = status.next_matches_to_run().into_iter().collect();
    assert_eq!(pending.len(), 4);

    let ids: Vec<&str> = pending.iter().map(|s| s.match_id.as_str()).collect();
    assert_eq!(ids, vec!["se8.0.0.0", "se8.0.0.1", "se8.0.0.2", "se8.0.0.3"]);

    // Best against worst, working inward.
    let pairings: Vec<(&str, &str)> = pending
        .iter()
        .map(|s| (s.players[0].as_str(), s.players[1].as_str()))
        .collect();
    assert_eq!(
        pairings,
        vec![("p0", "p7"), ("p1", "p6"), ("p2", "p5"), ("p3", "p4")]
    );
}

#[test]
fn test_eight_player_favorites_run() {
    let status = create_initial_status(bracket_spec("se8", 3), seeding(8)).unwrap();
    let done = resolve_all(&status, favorite);
    assert!(done.is_complete());
    assert_eq!(done.result_count(), 7);

    let standings = done.current_standings();
    let order: Vec<&str> = standings
        .entries()
        .iter()
        .map(|e| e.player.as_str())
        .collect();
    // Ties on rounds advanced break by entry seed.
    assert_eq!(order, vec!["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
}

#[test]
fn test_upset_reshapes_later_rounds() {
    let status = create_initial_status(bracket_spec("se4", 2), seeding(4)).unwrap();
    let p3 = Player::from("p3");

    // p3 upsets everyone it meets; other matches go to the favorite.
    let done = resolve_all(&status, |setup| {
        if setup.players.contains(&p3) {
            p3.clone()
        } else {
            favorite(setup)
        }
    });
    assert!(done.is_complete());

    let standings = done.current_standings();
    assert_eq!(standings.leader().unwrap().player, p3);
    let order: Vec<&str> = standings
        .entries()
        .iter()
        .map(|e| e.player.as_str())
        .collect();
    // p3 won two rounds, p1 one, p0 and p2 none.
    assert_eq!(order, vec!["p3", "p1", "p0", "p2"]);
}

#[test]
fn test_six_players_get_byes_and_five_matches() {
    let status = create_initial_status(bracket_spec("se6", 3), seeding(6)).unwrap();

    // Round one plays only the bottom four; p0 and p1 sit out.
    let first: Vec<MatchSetup> = status.next_matches_to_run().into_iter().collect();
    assert_eq!(first.len(), 2);
    let pairings: Vec<(&str, &str)> = first
        .iter()
        .map(|s| (s.players[0].as_str(), s.players[1].as_str()))
        .collect();
    assert_eq!(pairings, vec![("p2", "p5"), ("p3", "p4")]);

    let done = resolve_all(&status, favorite);
    assert!(done.is_complete());
    assert_eq!(done.result_count(), 5);
    assert_eq!(
        done.current_standings().leader().unwrap().player,
        Player::from("p0")
    );
}

#[test]
fn test_configured_rounds_clamp_to_bracket_depth() {
    // One configured round templates all three bracket rounds.
    let status = create_initial_status(bracket_spec("se_shallow", 1), seeding(8)).unwrap();
    let done = resolve_all(&status, favorite);
    assert!(done.is_complete());
    assert_eq!(done.result_count(), 7);

    // The extra configured round beyond the bracket depth is ignored.
    let status = create_initial_status(bracket_spec("se_deep", 5), seeding(4)).unwrap();
    let done = resolve_all(&status, favorite);
    assert!(done.is_complete());
    assert_eq!(done.result_count(), 3);
}

#[test]
fn test_partial_round_blocks_next_round() {
    let status = create_initial_status(bracket_spec("se_partial", 3), seeding(8)).unwrap();
    let pending: Vec<MatchSetup> = status.next_matches_to_run().into_iter().collect();

    // Resolve three of the four first-round matches.
    let mut status = status.clone();
    for setup in pending.iter().take(3).cloned() {
        let winner = favorite(&setup);
        status = status.with_new_result(win_for(setup, &winner)).unwrap();
    }

    let remaining: Vec<MatchSetup> = status.next_matches_to_run().into_iter().collect();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0], pending[3]);
}

#[test]
fn test_draw_advances_better_seed() {
    let status = create_initial_status(bracket_spec("se_draw", 1), seeding(2)).unwrap();
    let setup = status.next_matches_to_run().into_iter().next().unwrap();
    let drawn = MatchResult::completed(setup, vec![50, 50], vec![]).unwrap();
    let done = status.with_new_result(drawn).unwrap();

    assert!(done.is_complete());
    let standings = done.current_standings();
    assert_eq!(standings.leader().unwrap().player, Player::from("p0"));
    assert!(matches!(standings.entries()[0].score, Score::Bracket(_)));
}

#[test]
fn test_aborted_final_advances_better_seed() {
    let status = create_initial_status(bracket_spec("se_abort", 2), seeding(4)).unwrap();
    let mut status = resolve_partial(&status);

    // Abort the final; p0 keeps the title.
    let final_setup = status.next_matches_to_run().into_iter().next().unwrap();
    let aborted = MatchResult::aborted(final_setup, vec![]).unwrap();
    status = status.with_new_result(aborted).unwrap();

    assert!(status.is_complete());
    assert_eq!(
        status.current_standings().leader().unwrap().player,
        Player::from("p0")
    );
}

/// Resolve one batch of pending matches, favorites winning.
fn resolve_partial(status: &TournamentStatus) -> TournamentStatus {
    let mut status = status.clone();
    for setup in status.clone().next_matches_to_run() {
        let winner = favorite(&setup);
        status = status.with_new_result(win_for(setup, &winner)).unwrap();
    }
    status
}

#[test]
fn test_standings_history_grows_per_round() {
    let status = create_initial_status(bracket_spec("se_hist", 3), seeding(8)).unwrap();
    assert_eq!(status.standings_history().len(), 1);

    let after_round_one = resolve_partial(&status);
    let history = after_round_one.standings_history();
    assert_eq!(history.len(), 2);

    let done = resolve_all(&after_round_one, favorite);
    let full = done.standings_history();
    assert_eq!(full.len(), 4);
    // Earlier snapshots are unchanged by later results.
    assert_eq!(full[0], status.standings_history()[0]);
    assert_eq!(full[1], history[1]);
}
