//! Playoff Core - Elo ratings and Monte Carlo playoff odds.
//!
//! This library folds regular-season results into Elo ratings, seeds a
//! 16-team best-of-7 bracket and simulates it many thousands of times under a
//! reproducible seed. Python bindings are available behind the `python`
//! feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod elo;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod seeding;
pub mod series;
pub mod simulation;
pub mod standings;
pub mod team;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use bracket::{simulate_bracket, BracketRun, ConferenceBracket};
pub use config::{EngineConfig, InvalidGamePolicy, LoggingConfig, ModelConfig, SimulationConfig};
pub use constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_RATING, ELO_SCALE};
pub use elo::{build_regular_season_ratings, update_elo, RatingStore};
pub use error::{PlayoffError, Result};
pub use game::GameResult;
pub use pipeline::{run_pipeline, PipelineOutput, SeasonData};
pub use seeding::{build_playoff_field, seed_conference, PlayoffField};
pub use series::{simulate_series, SeriesOutcome};
pub use simulation::{run_simulations, MonteCarloDriver, OddsReport, OddsTally};
pub use standings::standings_from_games;
pub use team::{Conference, SeededTeam, Team, TeamId, TeamStanding};
pub use win_prob::{calculate_win_prob, expected_home_win_prob};
