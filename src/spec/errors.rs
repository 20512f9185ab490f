use thiserror::Error;

/// Errors raised while constructing a tournament specification.
///
/// Every configuration problem is reported here, at construction time.
/// Scheduling never has to deal with a malformed spec.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("internal name {0:?} must be non-empty and match [A-Za-z0-9_]+")]
    MalformedInternalName(String),
    #[error("no games declared")]
    NoGames,
    #[error("duplicate game name {0:?}")]
    DuplicateGame(String),
    #[error("match references unknown game {0:?}")]
    UnknownGame(String),
    #[error("no stages declared")]
    NoStages,
    #[error("stage {stage}: player cutoff must be positive")]
    NonPositiveCutoff { stage: usize },
    #[error("stage {stage}: no rounds declared")]
    NoRounds { stage: usize },
    #[error("stage {stage}, round {round}: no matches declared")]
    NoMatches { stage: usize, round: usize },
    #[error(
        "stage {stage}: single elimination rounds hold exactly one match template, \
         round {round} holds {count}"
    )]
    TooManyBracketMatches {
        stage: usize,
        round: usize,
        count: usize,
    },
    #[error("game {game:?} has {num_roles} roles; {format} pairs exactly two players")]
    UnsupportedRoleCount {
        game: String,
        num_roles: usize,
        format: &'static str,
    },
    #[error("match weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),
    #[error("seed roles {got:?} must be a permutation of 0..{num_roles}")]
    InvalidSeedRoles { got: Vec<usize>, num_roles: usize },
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}
