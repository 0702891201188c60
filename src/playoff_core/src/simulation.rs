//! Monte Carlo driver: repeat the bracket simulation and turn outcome counts
//! into odds.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::bracket::{simulate_bracket, BracketRun};
use crate::config::{ModelConfig, SimulationConfig};
use crate::constants::{INTERVAL_CONFIDENCE, TOP_FINALS_MATCHUPS};
use crate::elo::RatingStore;
use crate::error::{PlayoffError, Result};
use crate::seeding::PlayoffField;
use crate::team::{Conference, TeamId};

/// Outcome counters for a set of trials. Shards merge by addition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OddsTally {
    pub trials: u64,
    /// Finals wins per team
    pub champions: BTreeMap<TeamId, u64>,
    /// Finals wins per conference
    pub conference_titles: BTreeMap<Conference, u64>,
    /// Conference championships per team
    pub conference_champions: BTreeMap<TeamId, u64>,
    /// Finals appearances per unordered team pair (lower id first)
    pub finals_matchups: BTreeMap<(TeamId, TeamId), u64>,
}

impl OddsTally {
    pub fn record(&mut self, run: &BracketRun) {
        let champion = run.champion();
        self.trials += 1;
        *self.champions.entry(champion.team_id.clone()).or_insert(0) += 1;
        *self.conference_titles.entry(champion.conference).or_insert(0) += 1;

        for bracket in [&run.east, &run.west] {
            *self
                .conference_champions
                .entry(bracket.champion.team_id.clone())
                .or_insert(0) += 1;
        }

        let key = matchup_key(&run.east.champion.team_id, &run.west.champion.team_id);
        *self.finals_matchups.entry(key).or_insert(0) += 1;
    }

    /// Add another shard's counts into this one.
    pub fn merge(mut self, other: OddsTally) -> OddsTally {
        self.trials += other.trials;
        for (team, count) in other.champions {
            *self.champions.entry(team).or_insert(0) += count;
        }
        for (conference, count) in other.conference_titles {
            *self.conference_titles.entry(conference).or_insert(0) += count;
        }
        for (team, count) in other.conference_champions {
            *self.conference_champions.entry(team).or_insert(0) += count;
        }
        for (pair, count) in other.finals_matchups {
            *self.finals_matchups.entry(pair).or_insert(0) += count;
        }
        self
    }
}

fn matchup_key(a: &str, b: &str) -> (TeamId, TeamId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Parameters needed to reproduce and audit a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub k_factor: f64,
    pub home_court_adv: f64,
    pub requested_trials: u64,
    pub completed_trials: u64,
    pub master_seed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamOdds {
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: Conference,
    pub seed: u8,
    pub count: u64,
    pub probability: f64,
    /// Wilson score interval at [`INTERVAL_CONFIDENCE`]
    pub interval: (f64, f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConferenceOdds {
    pub conference: Conference,
    pub count: u64,
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchupOdds {
    pub teams: (TeamId, TeamId),
    pub label: String,
    pub count: u64,
    pub probability: f64,
}

/// Aggregated odds handed to persistence and the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OddsReport {
    pub parameters: RunParameters,
    /// All 16 field teams, most likely champion first
    pub championship: Vec<TeamOdds>,
    /// Conference title odds for all 16 teams, East first, best first
    pub conference_champions: Vec<TeamOdds>,
    /// Probability each conference produces the champion
    pub conference_titles: Vec<ConferenceOdds>,
    /// Most frequent Finals pairings, at most ten
    pub finals_matchups: Vec<MatchupOdds>,
}

impl OddsReport {
    pub fn championship_probability(&self, team_id: &str) -> f64 {
        self.championship
            .iter()
            .find(|t| t.team_id == team_id)
            .map_or(0.0, |t| t.probability)
    }
}

/// Runs the bracket simulation many times under a reproducible seed.
///
/// Trial `i` draws from `ChaCha8Rng::seed_from_u64(master_seed)` on stream
/// `i`, so each trial's randomness depends only on `(master_seed, i)`. That
/// makes any split of the trial range across workers produce the same counts.
pub struct MonteCarloDriver<'a> {
    field: &'a PlayoffField,
    ratings: &'a RatingStore,
    model: &'a ModelConfig,
    trials: u64,
    chunk_size: u64,
    master_seed: u64,
}

impl<'a> MonteCarloDriver<'a> {
    pub fn new(
        field: &'a PlayoffField,
        ratings: &'a RatingStore,
        model: &'a ModelConfig,
        simulation: &SimulationConfig,
    ) -> Result<Self> {
        model.validate()?;
        simulation.validate()?;

        let master_seed = simulation.seed.unwrap_or_else(rand::random);
        Ok(MonteCarloDriver {
            field,
            ratings,
            model,
            trials: simulation.trials,
            chunk_size: simulation.chunk_size,
            master_seed,
        })
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generator for one trial.
    pub fn trial_rng(&self, trial: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.master_seed);
        rng.set_stream(trial);
        rng
    }

    /// Simulate one postseason.
    pub fn simulate_trial(&self, trial: u64) -> Result<BracketRun> {
        let mut rng = self.trial_rng(trial);
        simulate_bracket(self.field, self.ratings, self.model.home_court_adv, &mut rng)
            .map_err(|e| e.in_trial(trial))
    }

    /// Tally a contiguous range of trials on the current thread.
    ///
    /// Stops early (keeping what it has) once `cancel` is set.
    pub fn run_trials(&self, trials: Range<u64>, cancel: Option<&AtomicBool>) -> Result<OddsTally> {
        let mut tally = OddsTally::default();
        for trial in trials {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break;
            }
            let run = self.simulate_trial(trial)?;
            tally.record(&run);
        }
        Ok(tally)
    }

    /// Run every trial on one thread.
    pub fn run_sequential(&self) -> Result<OddsReport> {
        let tally = self.run_trials(0..self.trials, None)?;
        self.report(tally)
    }

    /// Run every trial, chunked across the rayon pool.
    pub fn run(&self) -> Result<OddsReport> {
        self.run_with_cancel(&AtomicBool::new(false))
    }

    /// Parallel run that stops scheduling trials once `cancel` is set.
    ///
    /// The report covers the trials that finished; its probabilities divide by
    /// `completed_trials`.
    pub fn run_with_cancel(&self, cancel: &AtomicBool) -> Result<OddsReport> {
        info!(
            trials = self.trials,
            master_seed = self.master_seed,
            "Starting Monte Carlo simulation"
        );

        let chunks = self.trials.div_ceil(self.chunk_size);
        let tally = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk.saturating_mul(self.chunk_size);
                let end = start.saturating_add(self.chunk_size).min(self.trials);
                self.run_trials(start..end, Some(cancel))
            })
            .try_reduce(OddsTally::default, |a, b| Ok(a.merge(b)))?;

        self.report(tally)
    }

    /// Turn counts into probabilities.
    pub fn report(&self, tally: OddsTally) -> Result<OddsReport> {
        if tally.trials == 0 {
            return Err(PlayoffError::NoTrialsCompleted);
        }
        let n = tally.trials;
        let z = z_score(INTERVAL_CONFIDENCE);

        let team_odds = |counts: &BTreeMap<TeamId, u64>| -> Vec<TeamOdds> {
            self.field
                .teams()
                .map(|t| {
                    let count = counts.get(&t.team_id).copied().unwrap_or(0);
                    TeamOdds {
                        team_id: t.team_id.clone(),
                        team_name: t.team_name.clone(),
                        conference: t.conference,
                        seed: t.seed,
                        count,
                        probability: count as f64 / n as f64,
                        interval: wilson_interval(count, n, z),
                    }
                })
                .collect()
        };

        let mut championship = team_odds(&tally.champions);
        championship.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.team_id.cmp(&b.team_id)));

        let mut conference_champions = team_odds(&tally.conference_champions);
        conference_champions.sort_by(|a, b| {
            a.conference
                .cmp(&b.conference)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.team_id.cmp(&b.team_id))
        });

        let conference_titles = Conference::ALL
            .iter()
            .map(|&conference| {
                let count = tally.conference_titles.get(&conference).copied().unwrap_or(0);
                ConferenceOdds {
                    conference,
                    count,
                    probability: count as f64 / n as f64,
                }
            })
            .collect();

        let mut matchups: Vec<(&(TeamId, TeamId), u64)> =
            tally.finals_matchups.iter().map(|(pair, &count)| (pair, count)).collect();
        matchups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let finals_matchups = matchups
            .into_iter()
            .take(TOP_FINALS_MATCHUPS)
            .map(|(pair, count)| MatchupOdds {
                teams: pair.clone(),
                label: self.matchup_label(pair),
                count,
                probability: count as f64 / n as f64,
            })
            .collect();

        debug!(completed = n, requested = self.trials, "Odds report built");

        Ok(OddsReport {
            parameters: RunParameters {
                k_factor: self.model.k_factor,
                home_court_adv: self.model.home_court_adv,
                requested_trials: self.trials,
                completed_trials: n,
                master_seed: self.master_seed,
            },
            championship,
            conference_champions,
            conference_titles,
            finals_matchups,
        })
    }

    /// "East team vs West team" using display names.
    fn matchup_label(&self, pair: &(TeamId, TeamId)) -> String {
        let name = |id: &str| {
            self.field
                .team(id)
                .map_or_else(|| id.to_string(), |t| t.team_name.clone())
        };
        let (east, west) = match self.field.team(&pair.0).map(|t| t.conference) {
            Some(Conference::West) => (&pair.1, &pair.0),
            _ => (&pair.0, &pair.1),
        };
        format!("{} vs {}", name(east.as_str()), name(west.as_str()))
    }
}

/// Run `simulation.trials` postseasons and aggregate the odds.
///
/// Identical inputs with a fixed seed reproduce an identical report.
pub fn run_simulations(
    field: &PlayoffField,
    ratings: &RatingStore,
    model: &ModelConfig,
    simulation: &SimulationConfig,
) -> Result<OddsReport> {
    MonteCarloDriver::new(field, ratings, model, simulation)?.run()
}

/// Two-sided standard normal quantile for a confidence level.
fn z_score(confidence: f64) -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(0.5 + confidence / 2.0))
        .unwrap_or(1.959_963_984_540_054)
}

/// Wilson score interval for `successes` out of `trials`.
fn wilson_interval(successes: u64, trials: u64, z: f64) -> (f64, f64) {
    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let centre = (p + z2 / (2.0 * n)) / denom;
    let half = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    ((centre - half).max(0.0), (centre + half).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::SeededTeam;

    fn seeded(prefix: &str, conference: Conference) -> Vec<SeededTeam> {
        (1..=8u8)
            .map(|seed| SeededTeam {
                team_id: format!("{prefix}{seed}"),
                team_name: format!("{conference} {seed}"),
                conference,
                seed,
                wins: 60 - 2 * seed as u32,
                losses: 22 + 2 * seed as u32,
            })
            .collect()
    }

    fn make_field() -> PlayoffField {
        PlayoffField {
            east: seeded("E", Conference::East),
            west: seeded("W", Conference::West),
        }
    }

    fn make_ratings() -> RatingStore {
        let mut ratings = RatingStore::default();
        for seed in 1..=8 {
            ratings.set_rating(&format!("E{seed}"), 1580.0 - 10.0 * seed as f64);
            ratings.set_rating(&format!("W{seed}"), 1590.0 - 12.0 * seed as f64);
        }
        ratings
    }

    fn sim_config(trials: u64, seed: u64) -> SimulationConfig {
        SimulationConfig {
            trials,
            seed: Some(seed),
            chunk_size: 64,
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let report = run_simulations(&field, &ratings, &model, &sim_config(500, 3)).unwrap();

        assert_eq!(report.championship.len(), 16);
        let total: f64 = report.championship.iter().map(|t| t.probability).sum();
        assert!((total - 1.0).abs() < 1e-9, "Championship odds should sum to 1, got {}", total);

        let conf_total: f64 = report.conference_titles.iter().map(|c| c.probability).sum();
        assert!((conf_total - 1.0).abs() < 1e-9);

        for conference in Conference::ALL {
            let per_conf: f64 = report
                .conference_champions
                .iter()
                .filter(|t| t.conference == conference)
                .map(|t| t.probability)
                .sum();
            assert!((per_conf - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let a = run_simulations(&field, &ratings, &model, &sim_config(300, 123)).unwrap();
        let b = run_simulations(&field, &ratings, &model, &sim_config(300, 123)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let config = sim_config(700, 9);
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &config).unwrap();
        assert_eq!(driver.run().unwrap(), driver.run_sequential().unwrap());
    }

    #[test]
    fn test_sharded_tallies_merge_to_whole() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let config = sim_config(200, 77);
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &config).unwrap();

        let whole = driver.run_trials(0..200, None).unwrap();
        let merged = driver
            .run_trials(120..200, None)
            .unwrap()
            .merge(driver.run_trials(0..120, None).unwrap());
        assert_eq!(whole, merged);
    }

    #[test]
    fn test_different_seeds_differ() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let a = run_simulations(&field, &ratings, &model, &sim_config(300, 1)).unwrap();
        let b = run_simulations(&field, &ratings, &model, &sim_config(300, 2)).unwrap();
        assert_ne!(a.championship, b.championship);
    }

    #[test]
    fn test_finals_matchups_sorted_and_capped() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let report = run_simulations(&field, &ratings, &model, &sim_config(2000, 5)).unwrap();

        assert!(report.finals_matchups.len() <= 10);
        for pair in report.finals_matchups.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].teams < pair[1].teams)
            );
        }
        for m in &report.finals_matchups {
            assert!(m.teams.0 < m.teams.1);
            assert!(m.teams.0.starts_with('E') && m.teams.1.starts_with('W'));
            assert!(m.label.starts_with("East") && m.label.contains(" vs West"));
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &sim_config(100, 1)).unwrap();
        let cancel = AtomicBool::new(true);
        assert!(matches!(driver.run_with_cancel(&cancel), Err(PlayoffError::NoTrialsCompleted)));
    }

    #[test]
    fn test_chunk_bounds_at_u64_limit() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let config = SimulationConfig {
            trials: u64::MAX,
            seed: Some(1),
            chunk_size: u64::MAX / 2 + 1,
        };
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &config).unwrap();
        let cancel = AtomicBool::new(true);
        assert!(matches!(driver.run_with_cancel(&cancel), Err(PlayoffError::NoTrialsCompleted)));
    }

    #[test]
    fn test_partial_tally_still_normalized() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &sim_config(1000, 4)).unwrap();
        let report = driver.report(driver.run_trials(0..250, None).unwrap()).unwrap();

        assert_eq!(report.parameters.completed_trials, 250);
        assert_eq!(report.parameters.requested_trials, 1000);
        let total: f64 = report.championship.iter().map(|t| t.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let result = MonteCarloDriver::new(&field, &ratings, &model, &sim_config(0, 1));
        assert!(matches!(result, Err(PlayoffError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_trial_error_carries_index() {
        let field = make_field();
        let mut ratings = make_ratings();
        ratings.set_rating("E8", f64::NAN);
        let model = ModelConfig::default();
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &sim_config(10, 1)).unwrap();
        let err = driver.run_sequential().unwrap_err();
        assert!(matches!(err, PlayoffError::Trial { trial: 0, .. }));
    }

    #[test]
    fn test_unseeded_run_records_seed() {
        let (field, ratings, model) = (make_field(), make_ratings(), ModelConfig::default());
        let config = SimulationConfig {
            trials: 50,
            seed: None,
            chunk_size: 16,
        };
        let driver = MonteCarloDriver::new(&field, &ratings, &model, &config).unwrap();
        let report = driver.run().unwrap();

        let replay = run_simulations(&field, &ratings, &model, &sim_config(50, report.parameters.master_seed)).unwrap();
        assert_eq!(report.championship, replay.championship);
    }

    #[test]
    fn test_wilson_interval_contains_estimate() {
        let z = z_score(0.95);
        assert!((z - 1.959_964).abs() < 1e-4);
        let (lo, hi) = wilson_interval(30, 100, z);
        assert!(lo < 0.3 && 0.3 < hi);
        assert_eq!(wilson_interval(0, 100, z).0, 0.0);
        assert!(wilson_interval(100, 100, z).1 <= 1.0);
    }
}
