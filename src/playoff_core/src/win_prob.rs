use crate::constants::ELO_SCALE;

/// Probability of the home team winning a single game.
///
/// Standard Elo logistic curve on the rating gap after adding the home-court
/// bonus to the home side.
///
/// # Arguments
/// * `home_elo` - Home team rating
/// * `away_elo` - Away team rating
/// * `home_court_adv` - Rating points added to the home team
///
/// # Returns
/// Probability of the home team winning (0.0-1.0)
pub fn expected_home_win_prob(home_elo: f64, away_elo: f64, home_court_adv: f64) -> f64 {
    let exponent = (away_elo - (home_elo + home_court_adv)) / ELO_SCALE;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Probability of `team1` beating `team2` on a given floor.
///
/// `team1_home` selects which side receives the home-court bonus.
pub fn calculate_win_prob(team1_elo: f64, team2_elo: f64, team1_home: bool, home_court_adv: f64) -> f64 {
    if team1_home {
        expected_home_win_prob(team1_elo, team2_elo, home_court_adv)
    } else {
        1.0 - expected_home_win_prob(team2_elo, team1_elo, home_court_adv)
    }
}
