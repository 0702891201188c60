use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{infer_season, EngineConfig};
use crate::elo::{build_regular_season_ratings, RatingStore};
use crate::error::Result;
use crate::game::GameResult;
use crate::seeding::{build_playoff_field, PlayoffField};
use crate::simulation::{run_simulations, OddsReport};
use crate::standings::standings_from_games;
use crate::team::{Team, TeamStanding};

/// Season snapshot handed over by the ingestion collaborator.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeasonData {
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub games: Vec<GameResult>,
    /// Provider standings; derived from `games` when absent
    #[serde(default)]
    pub standings: Option<Vec<TeamStanding>>,
}

impl SeasonData {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Everything the persistence/dashboard side needs from one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub season: i32,
    pub ratings: RatingStore,
    pub field: PlayoffField,
    pub report: OddsReport,
}

/// Ratings -> standings -> seeds -> Monte Carlo odds.
pub fn run_pipeline(data: &SeasonData, config: &EngineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let season = data
        .season
        .unwrap_or_else(|| infer_season(chrono::Utc::now().date_naive()));

    let ratings = build_regular_season_ratings(&data.games, &config.model)?;
    info!(
        season,
        games = ratings.games_applied(),
        teams = ratings.len(),
        "Ratings built"
    );

    let standings = match &data.standings {
        Some(rows) => rows.clone(),
        None => {
            warn!("No standings snapshot supplied; deriving standings from games");
            standings_from_games(&data.games, &data.teams)
        }
    };

    let field = build_playoff_field(&standings)?;
    info!(season, "Playoff field seeded");

    let report = run_simulations(&field, &ratings, &config.model, &config.simulation)?;
    info!(
        season,
        trials = report.parameters.completed_trials,
        seed = report.parameters.master_seed,
        "Playoff odds complete"
    );

    Ok(PipelineOutput {
        season,
        ratings,
        field,
        report,
    })
}
