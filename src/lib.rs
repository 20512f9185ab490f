//! # Tourney
//!
//! A deterministic tournament progression engine.
//!
//! Tournaments are described by a declarative spec: an ordered list of
//! stages, each running a pairing format (single-elimination bracket or
//! Swiss) over rounds of match templates. Between stages a cutoff keeps
//! the top players and reseeds them by their standing.
//!
//! The engine is a pure recomputation core. A [`TournamentStatus`] snapshot
//! holds the spec, the seeding, and the set of reported results; every
//! query (pending matches, current standings, standings history) is
//! recomputed from those three inputs, so the answers are independent of
//! the order results were reported in. Recording a result never mutates a
//! snapshot; it returns a new one.
//!
//! ## Core Modules
//!
//! - [`spec`]: tournament configuration, parsing, and validation
//! - [`match_play`]: match identity, setups, seedings, and result intake
//! - [`scoring`]: scores, rankings, and cross-stage standings merging
//! - [`format`]: the pairing formats behind each stage
//! - [`tournament`]: the status snapshot tying it all together
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tourney::{Player, Seeding, TournamentSpec, create_initial_status};
//!
//! let spec = TournamentSpec::from_json_str(
//!     r#"{
//!         "nameInternal": "demo",
//!         "nameDisplay": "Demo Cup",
//!         "games": [{"name": "chess", "repository": "base", "numRoles": 2, "fixedSum": true}],
//!         "stages": [{
//!             "format": "singleElimination",
//!             "rounds": [{"matches": [{"game": "chess", "startClock": 60, "playClock": 30}]}]
//!         }]
//!     }"#,
//! )
//! .unwrap();
//! let seeding = Seeding::new(vec![
//!     Player::from("alice"),
//!     Player::from("bob"),
//! ])
//! .unwrap();
//!
//! let status = create_initial_status(Arc::new(spec), seeding).unwrap();
//! assert_eq!(status.next_matches_to_run().len(), 1);
//! ```

/// Tournament configuration: JSON schema, validated spec, and errors.
pub mod spec;
pub use spec::{FormatTag, Game, MatchSpec, RoundSpec, SpecError, StageSpec, TournamentSpec};

/// Match identity, setups, seedings, and validated results.
pub mod match_play;
pub use match_play::{
    Goal, MAX_GOAL, MatchKey, MatchResult, MatchSetup, Outcome, Player, ResultError, Seeding,
};

/// Scores, per-player standings, and rankings.
pub mod scoring;
pub use scoring::{BracketScore, PlayerScore, Ranking, Score, SwissPoints};

/// Pairing formats and the stage-scheduling contract.
pub mod format;
pub use format::{Format, FormatRunner, SingleEliminationRunner, StageContext, SwissRunner};

/// The tournament status snapshot and its queries.
pub mod tournament;
pub use tournament::{TournamentError, TournamentStatus, create_initial_status};
