use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::{CONFERENCE_SERIES, FIRST_ROUND_PAIRINGS, PLAYOFF_SEEDS, POSTSEASON_SERIES};
use crate::elo::RatingStore;
use crate::error::{PlayoffError, Result};
use crate::seeding::PlayoffField;
use crate::series::{simulate_series, SeriesOutcome};
use crate::team::{Conference, SeededTeam};

/// One conference's bracket: four first-round series, two semifinals and the
/// conference final, in that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConferenceBracket {
    pub conference: Conference,
    pub series: Vec<SeriesOutcome>,
    pub champion: SeededTeam,
}

/// One full simulated postseason. Lives for a single Monte Carlo trial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketRun {
    pub east: ConferenceBracket,
    pub west: ConferenceBracket,
    pub finals: SeriesOutcome,
}

impl BracketRun {
    pub fn conference(&self, conference: Conference) -> &ConferenceBracket {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    /// All 15 series: East rounds, West rounds, then the Finals.
    pub fn series(&self) -> impl Iterator<Item = &SeriesOutcome> {
        self.east
            .series
            .iter()
            .chain(self.west.series.iter())
            .chain(std::iter::once(&self.finals))
    }

    pub fn champion(&self) -> &SeededTeam {
        if self.finals.winner_id == self.east.champion.team_id {
            &self.east.champion
        } else {
            &self.west.champion
        }
    }
}

/// Simulate a full postseason with static rating snapshots.
///
/// Seeds advance along fixed bracket slots (no re-seeding): 1/8 meets 4/5,
/// 3/6 meets 2/7, and the two semifinal winners meet for the conference
/// title. Inside a conference the lower seed number holds home court. In the
/// Finals the champion with the better regular-season record does (see
/// [`finals_home_court`]).
pub fn simulate_bracket<R: Rng>(
    field: &PlayoffField,
    ratings: &RatingStore,
    home_court_adv: f64,
    rng: &mut R,
) -> Result<BracketRun> {
    let east = simulate_conference(Conference::East, field.conference(Conference::East), ratings, home_court_adv, rng)?;
    let west = simulate_conference(Conference::West, field.conference(Conference::West), ratings, home_court_adv, rng)?;

    let east_home = finals_home_court(&east.champion, &west.champion) == Ordering::Less;
    let finals = play(&east.champion, &west.champion, east_home, ratings, home_court_adv, rng)?;

    let run = BracketRun { east, west, finals };
    debug_assert_eq!(run.series().count(), POSTSEASON_SERIES);
    Ok(run)
}

/// Run the 8 -> 4 -> 2 -> 1 bracket for one conference.
///
/// `seeds` must hold seeds 1-8 ordered by seed, as produced by the seeder.
pub fn simulate_conference<R: Rng>(
    conference: Conference,
    seeds: &[SeededTeam],
    ratings: &RatingStore,
    home_court_adv: f64,
    rng: &mut R,
) -> Result<ConferenceBracket> {
    if seeds.len() != PLAYOFF_SEEDS {
        return Err(PlayoffError::InsufficientTeams {
            conference,
            found: seeds.len(),
        });
    }

    let by_seed = |seed: u8| &seeds[seed as usize - 1];
    let mut series = Vec::with_capacity(CONFERENCE_SERIES);

    let mut slots: Vec<&SeededTeam> = Vec::with_capacity(FIRST_ROUND_PAIRINGS.len());
    for &(high, low) in FIRST_ROUND_PAIRINGS.iter() {
        let outcome = play(by_seed(high), by_seed(low), true, ratings, home_court_adv, rng)?;
        slots.push(winner_of(&outcome, by_seed(high), by_seed(low)));
        series.push(outcome);
    }

    while slots.len() > 1 {
        let mut next = Vec::with_capacity(slots.len() / 2);

        for pair in slots.chunks(2) {
            let (a, b) = (pair[0], pair[1]);
            let outcome = play(a, b, a.seed < b.seed, ratings, home_court_adv, rng)?;
            next.push(winner_of(&outcome, a, b));
            series.push(outcome);
        }

        slots = next;
    }

    Ok(ConferenceBracket {
        conference,
        series,
        champion: slots[0].clone(),
    })
}

/// Finals home-court order between the two conference champions.
///
/// `Less` means `a` hosts. Better regular-season record first (the seeding
/// order), then lower seed number, then team id.
pub fn finals_home_court(a: &SeededTeam, b: &SeededTeam) -> Ordering {
    a.record()
        .record_cmp(&b.record())
        .then_with(|| a.seed.cmp(&b.seed))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

fn play<R: Rng>(
    a: &SeededTeam,
    b: &SeededTeam,
    a_has_home_court: bool,
    ratings: &RatingStore,
    home_court_adv: f64,
    rng: &mut R,
) -> Result<SeriesOutcome> {
    simulate_series(
        &a.team_id,
        ratings.rating(&a.team_id),
        &b.team_id,
        ratings.rating(&b.team_id),
        a_has_home_court,
        home_court_adv,
        rng,
    )
}

fn winner_of<'a>(outcome: &SeriesOutcome, a: &'a SeededTeam, b: &'a SeededTeam) -> &'a SeededTeam {
    if outcome.winner_id == a.team_id {
        a
    } else {
        b
    }
}
