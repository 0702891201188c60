use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Stable team identifier supplied by the data provider.
pub type TeamId = String;

/// One of the two playoff conferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conference {
    type Err = String;

    /// Parses "east", " West ", "EAST"... Anything else is not a playoff conference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "east" => Ok(Conference::East),
            "west" => Ok(Conference::West),
            other => Err(format!("unknown conference: {other:?}")),
        }
    }
}

impl TryFrom<String> for Conference {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Static team metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub conference: Conference,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, conference: Conference) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            conference,
        }
    }
}

/// Regular-season record of one team, used only for seeding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: Conference,
    pub wins: u32,
    pub losses: u32,
}

impl TeamStanding {
    pub fn new(team: &Team, wins: u32, losses: u32) -> Self {
        TeamStanding {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            conference: team.conference,
            wins,
            losses,
        }
    }

    /// Win percentage, 0.0 before the first game.
    pub fn win_pct(&self) -> f64 {
        let total = self.wins + self.losses;
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64
        }
    }

    pub fn record(&self) -> Record<'_> {
        Record {
            team_id: &self.team_id,
            wins: self.wins,
            losses: self.losses,
        }
    }
}

/// A seeded playoff team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: Conference,
    /// 1 (best record) through 8
    pub seed: u8,
    pub wins: u32,
    pub losses: u32,
}

impl SeededTeam {
    pub fn record(&self) -> Record<'_> {
        Record {
            team_id: &self.team_id,
            wins: self.wins,
            losses: self.losses,
        }
    }
}

/// Borrowed view of a win/loss record with the total ordering used for seeding.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    pub team_id: &'a str,
    pub wins: u32,
    pub losses: u32,
}

impl Record<'_> {
    /// Orders records best-first: win percentage descending, wins descending,
    /// losses ascending, then team id ascending.
    ///
    /// Win percentage is compared on integer cross-products so equal
    /// percentages (41-41 vs 40-40) compare equal regardless of rounding.
    pub fn seeding_cmp(&self, other: &Record<'_>) -> Ordering {
        self.record_cmp(other)
            .then_with(|| self.team_id.cmp(other.team_id))
    }

    /// The win/loss part of [`Record::seeding_cmp`]: `Equal` for identical
    /// records of different teams.
    pub fn record_cmp(&self, other: &Record<'_>) -> Ordering {
        let (num_a, den_a) = self.pct_fraction();
        let (num_b, den_b) = other.pct_fraction();
        (num_b * den_a)
            .cmp(&(num_a * den_b))
            .then_with(|| other.wins.cmp(&self.wins))
            .then_with(|| self.losses.cmp(&other.losses))
    }

    fn pct_fraction(&self) -> (u64, u64) {
        let total = self.wins as u64 + self.losses as u64;
        (self.wins as u64, total.max(1))
    }
}
