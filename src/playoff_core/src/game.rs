use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlayoffError, Result};
use crate::team::TeamId;

/// A completed game as delivered by the ingestion collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: u64,
    #[serde(default)]
    pub season: Option<i32>,
    pub date: NaiveDate,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub postseason: bool,
}

impl GameResult {
    /// Check the record is usable: two distinct teams and no tie.
    pub fn validate(&self) -> Result<()> {
        if self.home_team_id == self.away_team_id {
            return Err(PlayoffError::invalid_game(
                self.game_id,
                format!("team {} listed as both home and away", self.home_team_id),
            ));
        }
        if self.home_score == self.away_score {
            return Err(PlayoffError::invalid_game(
                self.game_id,
                format!("tied score {}-{}", self.home_score, self.away_score),
            ));
        }
        Ok(())
    }

    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn winner(&self) -> &str {
        if self.home_won() {
            &self.home_team_id
        } else {
            &self.away_team_id
        }
    }

    pub fn loser(&self) -> &str {
        if self.home_won() {
            &self.away_team_id
        } else {
            &self.home_team_id
        }
    }

    /// Chronological fold order: date, then provider game id.
    pub fn ordering_key(&self) -> (NaiveDate, u64) {
        (self.date, self.game_id)
    }
}
