//! Elo rating updates and the per-team rating store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::{InvalidGamePolicy, ModelConfig};
use crate::constants::DEFAULT_RATING;
use crate::error::Result;
use crate::game::GameResult;
use crate::win_prob::expected_home_win_prob;

/// Update two ratings after one game.
///
/// The home side moves by `k_factor * (actual - expected)` and the away side
/// by the negation, so the sum of the two ratings is unchanged.
///
/// # Returns
/// `(new_home_elo, new_away_elo)`
pub fn update_elo(
    home_elo: f64,
    away_elo: f64,
    home_won: bool,
    k_factor: f64,
    home_court_adv: f64,
) -> (f64, f64) {
    let expected = expected_home_win_prob(home_elo, away_elo, home_court_adv);
    let actual = if home_won { 1.0 } else { 0.0 };
    let delta = k_factor * (actual - expected);
    (home_elo + delta, away_elo - delta)
}

/// One rating per team, mutated in chronological game order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingStore {
    initial_rating: f64,
    ratings: BTreeMap<String, f64>,
    games_applied: u64,
}

impl Default for RatingStore {
    fn default() -> Self {
        Self::new(DEFAULT_RATING)
    }
}

impl RatingStore {
    pub fn new(initial_rating: f64) -> Self {
        RatingStore {
            initial_rating,
            ratings: BTreeMap::new(),
            games_applied: 0,
        }
    }

    /// Store seeded with fixed ratings, e.g. for what-if runs.
    pub fn with_ratings<I, S>(initial_rating: f64, ratings: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        RatingStore {
            initial_rating,
            ratings: ratings.into_iter().map(|(id, r)| (id.into(), r)).collect(),
            games_applied: 0,
        }
    }

    /// Current rating, or the baseline for a team that has not played.
    pub fn rating(&self, team_id: &str) -> f64 {
        self.ratings
            .get(team_id)
            .copied()
            .unwrap_or(self.initial_rating)
    }

    pub fn set_rating(&mut self, team_id: &str, rating: f64) {
        self.ratings.insert(team_id.to_string(), rating);
    }

    pub fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    pub fn games_applied(&self) -> u64 {
        self.games_applied
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ratings.iter().map(|(id, &r)| (id.as_str(), r))
    }

    /// Ratings sorted best-first, ties by team id.
    pub fn leaderboard(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self.ratings.iter().map(|(id, &r)| (id.clone(), r)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Validate one game and fold it into the store.
    ///
    /// Returns the rating delta applied to the home team.
    pub fn apply(&mut self, game: &GameResult, model: &ModelConfig) -> Result<f64> {
        game.validate()?;

        let home_elo = self.rating(&game.home_team_id);
        let away_elo = self.rating(&game.away_team_id);
        let (new_home, new_away) = update_elo(
            home_elo,
            away_elo,
            game.home_won(),
            model.k_factor,
            model.home_court_adv,
        );

        self.set_rating(&game.home_team_id, new_home);
        self.set_rating(&game.away_team_id, new_away);
        self.games_applied += 1;

        Ok(new_home - home_elo)
    }
}

/// Fold the regular season into a rating store.
///
/// Postseason games are ignored. The rest are applied in `(date, game_id)`
/// order regardless of input order. Invalid records are handled per
/// `model.on_invalid_game`.
pub fn build_regular_season_ratings(games: &[GameResult], model: &ModelConfig) -> Result<RatingStore> {
    let mut ordered: Vec<&GameResult> = games.iter().filter(|g| !g.postseason).collect();
    ordered.sort_by_key(|g| g.ordering_key());

    let mut store = RatingStore::new(model.initial_rating);
    let mut skipped = 0usize;

    for game in ordered {
        match store.apply(game, model) {
            Ok(_) => {}
            Err(e) if model.on_invalid_game == InvalidGamePolicy::Skip => {
                warn!(game_id = game.game_id, error = %e, "Skipping invalid game result");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        applied = store.games_applied(),
        skipped,
        teams = store.len(),
        "Regular-season ratings built"
    );
    Ok(store)
}
