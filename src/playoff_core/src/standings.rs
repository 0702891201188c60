use std::collections::{BTreeMap, HashMap};

use crate::game::GameResult;
use crate::team::{Team, TeamStanding};

/// Derive win/loss standings from completed regular-season games.
///
/// Fallback for when the provider's standings snapshot is unavailable.
/// Postseason games, ties and games involving teams missing from `teams`
/// are not counted. Teams that have not played yet appear with a 0-0 record.
pub fn standings_from_games(games: &[GameResult], teams: &[Team]) -> Vec<TeamStanding> {
    let lookup: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut records: BTreeMap<&str, (u32, u32)> = teams.iter().map(|t| (t.id.as_str(), (0, 0))).collect();

    for game in games.iter().filter(|g| !g.postseason) {
        if game.validate().is_err() {
            continue;
        }
        if !lookup.contains_key(game.home_team_id.as_str()) || !lookup.contains_key(game.away_team_id.as_str()) {
            continue;
        }
        if let Some(rec) = records.get_mut(game.winner()) {
            rec.0 += 1;
        }
        if let Some(rec) = records.get_mut(game.loser()) {
            rec.1 += 1;
        }
    }

    records
        .into_iter()
        .filter_map(|(id, (wins, losses))| lookup.get(id).map(|team| TeamStanding::new(team, wins, losses)))
        .collect()
}
