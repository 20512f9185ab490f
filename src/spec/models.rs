//! Validated tournament specification tree.
//!
//! [`TournamentSpec::from_config`] turns the raw schema into an immutable,
//! cross-checked model: game references are resolved to shared [`Game`]
//! values, defaults are filled in, and every configuration rule is enforced
//! here so the scheduling code never sees a bad spec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use super::config::{FormatTag, MatchConfig, RoundConfig, StageConfig, TournamentConfig};
use super::errors::SpecError;
use crate::format::{Format, FormatRunner};

/// A playable game, identified by its repository and name.
///
/// Equality and hashing consider identity only; `num_roles` and `fixed_sum`
/// are descriptive attributes of that identity.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Game {
    /// The repository the game was loaded from.
    pub source: String,
    /// The game's name within its repository.
    pub id: String,
    pub num_roles: usize,
    /// Whether role goals always total 100.
    pub fixed_sum: bool,
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.id == other.id
    }
}

impl Eq for Game {}

impl Hash for Game {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.id)
    }
}

/// A fully resolved match template.
#[derive(Clone, Debug)]
pub struct MatchSpec {
    pub game: Arc<Game>,
    pub start_clock: u32,
    pub play_clock: u32,
    /// Role index -> relative seed within the pairing (0 = better seed).
    pub seed_roles: Vec<usize>,
    /// Scoring weight; 1.0 unless configured otherwise.
    pub weight: f64,
}

/// A batch of match templates resolved together.
#[derive(Clone, Debug)]
pub struct RoundSpec {
    /// Matches in this round are not released before this instant,
    /// when the caller opts into time gating.
    pub start_time: Option<DateTime<Utc>>,
    pub matches: Vec<MatchSpec>,
}

/// One phase of the tournament.
#[derive(Clone, Debug)]
pub struct StageSpec {
    pub format: FormatTag,
    /// How many of this stage's top finishers advance. `None` advances
    /// everyone.
    pub player_cutoff: Option<usize>,
    pub rounds: Vec<RoundSpec>,
}

impl StageSpec {
    /// The pairing format runner governing this stage.
    #[must_use]
    pub fn runner(&self) -> Format {
        Format::from_tag(self.format)
    }
}

/// The immutable root of a tournament's static configuration.
///
/// Always built through [`Self::from_config`], so a value of this type has
/// passed every validation rule.
#[derive(Clone, Debug)]
pub struct TournamentSpec {
    name_internal: String,
    name_display: String,
    games: BTreeMap<String, Arc<Game>>,
    stages: Vec<StageSpec>,
}

impl TournamentSpec {
    /// Validate a raw configuration document and build the spec tree.
    pub fn from_config(config: TournamentConfig) -> Result<Self, SpecError> {
        if !is_valid_internal_name(&config.name_internal) {
            return Err(SpecError::MalformedInternalName(config.name_internal));
        }
        if config.games.is_empty() {
            return Err(SpecError::NoGames);
        }
        if config.stages.is_empty() {
            return Err(SpecError::NoStages);
        }

        let mut games: BTreeMap<String, Arc<Game>> = BTreeMap::new();
        for game in config.games {
            let name = game.name.clone();
            let game = Arc::new(Game {
                source: game.repository,
                id: game.name,
                num_roles: game.num_roles,
                fixed_sum: game.fixed_sum,
            });
            if games.insert(name.clone(), game).is_some() {
                return Err(SpecError::DuplicateGame(name));
            }
        }

        let mut stages = Vec::with_capacity(config.stages.len());
        for (stage_num, stage) in config.stages.into_iter().enumerate() {
            stages.push(resolve_stage(stage_num, stage, &games)?);
        }

        Ok(Self {
            name_internal: config.name_internal,
            name_display: config.name_display,
            games,
            stages,
        })
    }

    /// Parse and validate a configuration document from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, SpecError> {
        Self::from_config(TournamentConfig::from_json_str(raw)?)
    }

    #[must_use]
    pub fn name_internal(&self) -> &str {
        &self.name_internal
    }

    #[must_use]
    pub fn name_display(&self) -> &str {
        &self.name_display
    }

    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    #[must_use]
    pub fn game(&self, name: &str) -> Option<&Arc<Game>> {
        self.games.get(name)
    }
}

fn is_valid_internal_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn resolve_stage(
    stage_num: usize,
    stage: StageConfig,
    games: &BTreeMap<String, Arc<Game>>,
) -> Result<StageSpec, SpecError> {
    if stage.player_cutoff == Some(0) {
        return Err(SpecError::NonPositiveCutoff { stage: stage_num });
    }
    if stage.rounds.is_empty() {
        return Err(SpecError::NoRounds { stage: stage_num });
    }

    let mut rounds = Vec::with_capacity(stage.rounds.len());
    for (round_num, round) in stage.rounds.into_iter().enumerate() {
        rounds.push(resolve_round(stage_num, round_num, round, games)?);
    }

    let resolved = StageSpec {
        format: stage.format,
        player_cutoff: stage.player_cutoff,
        rounds,
    };
    resolved.runner().validate_rounds(stage_num, &resolved.rounds)?;
    Ok(resolved)
}

fn resolve_round(
    stage_num: usize,
    round_num: usize,
    round: RoundConfig,
    games: &BTreeMap<String, Arc<Game>>,
) -> Result<RoundSpec, SpecError> {
    if round.matches.is_empty() {
        return Err(SpecError::NoMatches {
            stage: stage_num,
            round: round_num,
        });
    }
    let mut matches = Vec::with_capacity(round.matches.len());
    for template in round.matches {
        matches.push(resolve_match(template, games)?);
    }
    Ok(RoundSpec {
        start_time: round.start_time,
        matches,
    })
}

fn resolve_match(
    template: MatchConfig,
    games: &BTreeMap<String, Arc<Game>>,
) -> Result<MatchSpec, SpecError> {
    let game = games
        .get(&template.game)
        .ok_or_else(|| SpecError::UnknownGame(template.game.clone()))?
        .clone();

    let weight = template.weight.unwrap_or(1.0);
    if !weight.is_finite() || weight < 0.0 {
        return Err(SpecError::InvalidWeight(weight));
    }

    let seed_roles = match template.seed_roles {
        Some(roles) => {
            let mut seen = vec![false; game.num_roles];
            let valid = roles.len() == game.num_roles
                && roles.iter().all(|&r| {
                    if r < game.num_roles && !seen[r] {
                        seen[r] = true;
                        true
                    } else {
                        false
                    }
                });
            if !valid {
                return Err(SpecError::InvalidSeedRoles {
                    got: roles,
                    num_roles: game.num_roles,
                });
            }
            roles
        }
        None => (0..game.num_roles).collect(),
    };

    Ok(MatchSpec {
        game,
        start_clock: template.start_clock,
        play_clock: template.play_clock,
        seed_roles,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> TournamentConfig {
        TournamentConfig::from_json_str(
            r#"{
                "games": [{"name": "ttt", "repository": "base", "numRoles": 2, "fixedSum": true}],
                "nameInternal": "spring_open",
                "nameDisplay": "Spring Open",
                "stages": [{
                    "format": "swiss1",
                    "playerCutoff": 4,
                    "rounds": [{
                        "matches": [{"game": "ttt", "startClock": 60, "playClock": 15}]
                    }]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_resolves() {
        let spec = TournamentSpec::from_config(base_config()).unwrap();
        assert_eq!(spec.name_internal(), "spring_open");
        assert_eq!(spec.stages().len(), 1);
        let stage = &spec.stages()[0];
        assert_eq!(stage.player_cutoff, Some(4));
        let template = &stage.rounds[0].matches[0];
        assert_eq!(template.seed_roles, vec![0, 1]);
        assert_eq!(template.weight, 1.0);
        assert_eq!(template.game.source, "base");
        assert!(template.game.fixed_sum);
    }

    #[test]
    fn test_malformed_internal_name_rejected() {
        let mut config = base_config();
        config.name_internal = "spring open!".to_string();
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::MalformedInternalName(_))
        ));
    }

    #[test]
    fn test_dangling_game_reference_rejected() {
        let mut config = base_config();
        config.stages[0].rounds[0].matches[0].game = "chess".to_string();
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::UnknownGame(name)) if name == "chess"
        ));
    }

    #[test]
    fn test_duplicate_game_name_rejected() {
        let mut config = base_config();
        let duplicate = config.games[0].clone();
        config.games.push(duplicate);
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::DuplicateGame(_))
        ));
    }

    #[test]
    fn test_zero_cutoff_rejected() {
        let mut config = base_config();
        config.stages[0].player_cutoff = Some(0);
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::NonPositiveCutoff { stage: 0 })
        ));
    }

    #[test]
    fn test_empty_rounds_rejected() {
        let mut config = base_config();
        config.stages[0].rounds.clear();
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::NoRounds { stage: 0 })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = base_config();
        config.stages[0].rounds[0].matches[0].weight = Some(-1.0);
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_bad_seed_roles_rejected() {
        let mut config = base_config();
        config.stages[0].rounds[0].matches[0].seed_roles = Some(vec![1, 1]);
        assert!(matches!(
            TournamentSpec::from_config(config),
            Err(SpecError::InvalidSeedRoles { .. })
        ));
    }

    #[test]
    fn test_game_equality_is_by_identity() {
        let a = Game {
            source: "base".to_string(),
            id: "ttt".to_string(),
            num_roles: 2,
            fixed_sum: true,
        };
        let b = Game {
            source: "base".to_string(),
            id: "ttt".to_string(),
            num_roles: 3,
            fixed_sum: false,
        };
        assert_eq!(a, b);
    }
}
