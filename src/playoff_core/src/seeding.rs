use serde::{Deserialize, Serialize};

use crate::constants::PLAYOFF_SEEDS;
use crate::error::{PlayoffError, Result};
use crate::team::{Conference, SeededTeam, TeamStanding};

/// Seeds 1-8 for both conferences, each list ordered by seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoffField {
    pub east: Vec<SeededTeam>,
    pub west: Vec<SeededTeam>,
}

impl PlayoffField {
    pub fn conference(&self, conference: Conference) -> &[SeededTeam] {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    /// All 16 teams, East seeds first.
    pub fn teams(&self) -> impl Iterator<Item = &SeededTeam> {
        self.east.iter().chain(self.west.iter())
    }

    pub fn team(&self, team_id: &str) -> Option<&SeededTeam> {
        self.teams().find(|t| t.team_id == team_id)
    }
}

/// Rank one conference and keep the eight best records.
///
/// Standings from other conferences are ignored. Ordering is total
/// (see [`crate::team::Record::seeding_cmp`]), so identical inputs in any
/// order produce the same seeds. Play-in is not modelled: seeds 7 and 8 go
/// straight to the 7th and 8th best records.
pub fn seed_conference(conference: Conference, standings: &[TeamStanding]) -> Result<Vec<SeededTeam>> {
    let mut rows: Vec<&TeamStanding> = standings
        .iter()
        .filter(|s| s.conference == conference)
        .collect();

    if rows.len() < PLAYOFF_SEEDS {
        return Err(PlayoffError::InsufficientTeams {
            conference,
            found: rows.len(),
        });
    }

    rows.sort_by(|a, b| a.record().seeding_cmp(&b.record()));

    Ok(rows
        .into_iter()
        .take(PLAYOFF_SEEDS)
        .enumerate()
        .map(|(i, s)| SeededTeam {
            team_id: s.team_id.clone(),
            team_name: s.team_name.clone(),
            conference,
            seed: (i + 1) as u8,
            wins: s.wins,
            losses: s.losses,
        })
        .collect())
}

/// Seed both conferences from a league-wide standings snapshot.
pub fn build_playoff_field(standings: &[TeamStanding]) -> Result<PlayoffField> {
    Ok(PlayoffField {
        east: seed_conference(Conference::East, standings)?,
        west: seed_conference(Conference::West, standings)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(id: &str, conference: Conference, wins: u32, losses: u32) -> TeamStanding {
        TeamStanding {
            team_id: id.to_string(),
            team_name: format!("Team {id}"),
            conference,
            wins,
            losses,
        }
    }

    fn conference_rows(prefix: &str, conference: Conference, n: u32) -> Vec<TeamStanding> {
        (0..n)
            .map(|i| standing(&format!("{prefix}{i:02}"), conference, 60 - 2 * i, 22 + 2 * i))
            .collect()
    }

    #[test]
    fn test_takes_top_eight_by_record() {
        let rows = conference_rows("E", Conference::East, 15);
        let seeds = seed_conference(Conference::East, &rows).unwrap();
        assert_eq!(seeds.len(), 8);
        for (i, team) in seeds.iter().enumerate() {
            assert_eq!(team.seed as usize, i + 1);
            assert_eq!(team.team_id, format!("E{i:02}"));
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut rows = conference_rows("E", Conference::East, 10);
        let forward = seed_conference(Conference::East, &rows).unwrap();
        rows.reverse();
        let backward = seed_conference(Conference::East, &rows).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_tie_broken_by_team_id() {
        let mut rows = conference_rows("E", Conference::East, 8);
        rows.push(standing("AAA", Conference::East, 46, 36));
        rows.push(standing("ZZZ", Conference::East, 46, 36));
        // AAA, E07 and ZZZ share 46-36; one spot left
        let seeds = seed_conference(Conference::East, &rows).unwrap();
        assert_eq!(seeds[7].team_id, "AAA");
        let ids: Vec<_> = seeds.iter().map(|s| s.team_id.as_str()).collect();
        assert!(!ids.contains(&"E07"));
        assert!(!ids.contains(&"ZZZ"));
    }

    #[test]
    fn test_other_conference_ignored() {
        let mut rows = conference_rows("E", Conference::East, 7);
        rows.extend(conference_rows("W", Conference::West, 8));
        let err = seed_conference(Conference::East, &rows).unwrap_err();
        assert!(matches!(
            err,
            PlayoffError::InsufficientTeams {
                conference: Conference::East,
                found: 7
            }
        ));
    }

    #[test]
    fn test_build_playoff_field() {
        let mut rows = conference_rows("E", Conference::East, 15);
        rows.extend(conference_rows("W", Conference::West, 15));
        let field = build_playoff_field(&rows).unwrap();
        assert_eq!(field.teams().count(), 16);
        assert!(field.east.iter().all(|t| t.conference == Conference::East));
        assert!(field.west.iter().all(|t| t.conference == Conference::West));
        assert_eq!(field.team("W00").map(|t| t.seed), Some(1));
    }

    #[test]
    fn test_build_playoff_field_missing_west() {
        let rows = conference_rows("E", Conference::East, 15);
        let err = build_playoff_field(&rows).unwrap_err();
        assert!(matches!(
            err,
            PlayoffError::InsufficientTeams {
                conference: Conference::West,
                found: 0
            }
        ));
    }
}
