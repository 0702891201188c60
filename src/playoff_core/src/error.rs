use thiserror::Error;

use crate::team::{Conference, TeamId};

/// Errors raised while building ratings, seeding the field or simulating.
#[derive(Error, Debug)]
pub enum PlayoffError {
    // Seeding errors
    #[error("Insufficient teams: {conference} has {found} eligible teams, 8 are required")]
    InsufficientTeams { conference: Conference, found: usize },

    // Input errors
    #[error("Invalid game result {game_id}: {reason}")]
    InvalidGameResult { game_id: u64, reason: String },

    #[error("Invalid rating for team {team_id}: {rating}")]
    InvalidRating { team_id: TeamId, rating: f64 },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Simulation errors
    #[error("Trial {trial} failed: {source}")]
    Trial {
        trial: u64,
        #[source]
        source: Box<PlayoffError>,
    },

    #[error("Simulation cancelled before any trial completed")]
    NoTrialsCompleted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlayoffError {
    pub fn invalid_game(game_id: u64, reason: impl Into<String>) -> Self {
        PlayoffError::InvalidGameResult {
            game_id,
            reason: reason.into(),
        }
    }

    /// Attach the trial index to an error raised inside a Monte Carlo trial.
    pub fn in_trial(self, trial: u64) -> Self {
        PlayoffError::Trial {
            trial,
            source: Box::new(self),
        }
    }
}

/// Result type alias for PlayoffError
pub type Result<T> = std::result::Result<T, PlayoffError>;
