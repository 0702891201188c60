use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_RATING, DEFAULT_SIMULATIONS};
use crate::pipeline::{run_pipeline, SeasonData};

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Probability of the home team winning a single game.
#[pyfunction]
#[pyo3(signature = (home_elo, away_elo, home_court_adv = DEFAULT_HOME_COURT_ADV))]
fn expected_home_win_prob(home_elo: f64, away_elo: f64, home_court_adv: f64) -> f64 {
    crate::win_prob::expected_home_win_prob(home_elo, away_elo, home_court_adv)
}

/// Ratings after one game, as `(new_home, new_away)`.
#[pyfunction]
#[pyo3(signature = (home_elo, away_elo, home_won, k_factor = DEFAULT_K_FACTOR, home_court_adv = DEFAULT_HOME_COURT_ADV))]
fn update_elo(home_elo: f64, away_elo: f64, home_won: bool, k_factor: f64, home_court_adv: f64) -> (f64, f64) {
    crate::elo::update_elo(home_elo, away_elo, home_won, k_factor, home_court_adv)
}

/// Run the full pipeline on a season JSON document.
///
/// Returns the pipeline output (ratings, field, odds report) as JSON.
#[pyfunction]
#[pyo3(signature = (
    season_json,
    n_simulations = DEFAULT_SIMULATIONS,
    k_factor = DEFAULT_K_FACTOR,
    home_court_adv = DEFAULT_HOME_COURT_ADV,
    seed = None,
    initial_rating = DEFAULT_RATING
))]
fn simulate_odds(
    py: Python<'_>,
    season_json: &str,
    n_simulations: u64,
    k_factor: f64,
    home_court_adv: f64,
    seed: Option<u64>,
    initial_rating: f64,
) -> PyResult<String> {
    let data: SeasonData = serde_json::from_str(season_json).map_err(to_py_err)?;

    let mut config = EngineConfig::default();
    config.model.k_factor = k_factor;
    config.model.home_court_adv = home_court_adv;
    config.model.initial_rating = initial_rating;
    config.simulation.trials = n_simulations;
    config.simulation.seed = seed;

    let output = py
        .allow_threads(|| run_pipeline(&data, &config))
        .map_err(to_py_err)?;
    serde_json::to_string(&output).map_err(to_py_err)
}

/// Python module definition
#[pymodule]
fn playoff_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(expected_home_win_prob, m)?)?;
    m.add_function(wrap_pyfunction!(update_elo, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_odds, m)?)?;

    m.add("DEFAULT_RATING", DEFAULT_RATING)?;
    m.add("DEFAULT_K_FACTOR", DEFAULT_K_FACTOR)?;
    m.add("DEFAULT_HOME_COURT_ADV", DEFAULT_HOME_COURT_ADV)?;

    Ok(())
}
