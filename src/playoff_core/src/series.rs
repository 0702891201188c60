use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{HOME_COURT_PATTERN, SERIES_WINS};
use crate::error::{PlayoffError, Result};
use crate::team::TeamId;
use crate::win_prob::expected_home_win_prob;

/// One simulated game of a series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesGame {
    pub home_team_id: TeamId,
    pub winner_id: TeamId,
}

/// Result of a best-of-7 series. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesOutcome {
    pub winner_id: TeamId,
    pub loser_id: TeamId,
    /// Team that held home-court advantage
    pub higher_seed_id: TeamId,
    /// Games actually played, in order (4-7 entries)
    pub games: Vec<SeriesGame>,
}

impl SeriesOutcome {
    pub fn games_played(&self) -> usize {
        self.games.len()
    }

    pub fn wins_for(&self, team_id: &str) -> usize {
        self.games.iter().filter(|g| g.winner_id == team_id).count()
    }

    /// Home team of each game played, in order.
    pub fn home_sequence(&self) -> impl Iterator<Item = &str> {
        self.games.iter().map(|g| g.home_team_id.as_str())
    }
}

/// Simulate one best-of-7 series.
///
/// The team holding home court (`a_has_home_court` selects A or B) hosts
/// games 1, 2, 5 and 7. Each game draws exactly one uniform value from `rng`
/// and the home team wins when the draw is below its win probability. The
/// series stops as soon as a team reaches four wins, so the number of draws
/// consumed equals the number of games played.
///
/// # Arguments
/// * `team_a`, `rating_a` - First team and its rating snapshot
/// * `team_b`, `rating_b` - Second team and its rating snapshot
/// * `a_has_home_court` - Whether A is the higher seed for this series
/// * `home_court_adv` - Rating points added to the home team of each game
/// * `rng` - Injected random source
pub fn simulate_series<R: Rng>(
    team_a: &str,
    rating_a: f64,
    team_b: &str,
    rating_b: f64,
    a_has_home_court: bool,
    home_court_adv: f64,
    rng: &mut R,
) -> Result<SeriesOutcome> {
    check_rating(team_a, rating_a)?;
    check_rating(team_b, rating_b)?;

    let (high, high_rating, low, low_rating) = if a_has_home_court {
        (team_a, rating_a, team_b, rating_b)
    } else {
        (team_b, rating_b, team_a, rating_a)
    };

    let mut high_wins = 0;
    let mut low_wins = 0;
    let mut games = Vec::with_capacity(HOME_COURT_PATTERN.len());

    for &high_is_home in HOME_COURT_PATTERN.iter() {
        if high_wins == SERIES_WINS || low_wins == SERIES_WINS {
            break;
        }

        let (home, home_rating, away_rating) = if high_is_home {
            (high, high_rating, low_rating)
        } else {
            (low, low_rating, high_rating)
        };

        let home_prob = expected_home_win_prob(home_rating, away_rating, home_court_adv);
        let home_won = rng.gen::<f64>() < home_prob;

        let high_won = home_won == high_is_home;
        if high_won {
            high_wins += 1;
        } else {
            low_wins += 1;
        }

        games.push(SeriesGame {
            home_team_id: home.to_string(),
            winner_id: (if high_won { high } else { low }).to_string(),
        });
    }

    let (winner, loser) = if high_wins > low_wins { (high, low) } else { (low, high) };

    Ok(SeriesOutcome {
        winner_id: winner.to_string(),
        loser_id: loser.to_string(),
        higher_seed_id: high.to_string(),
        games,
    })
}

fn check_rating(team_id: &str, rating: f64) -> Result<()> {
    if rating.is_finite() {
        Ok(())
    } else {
        Err(PlayoffError::InvalidRating {
            team_id: team_id.to_string(),
            rating,
        })
    }
}
