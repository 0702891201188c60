use playoff_core::{
    build_playoff_field, seed_conference, simulate_series, update_elo, Conference, ModelConfig,
    MonteCarloDriver, SimulationConfig, TeamStanding,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arb_standings(conference: Conference, n: usize) -> impl Strategy<Value = Vec<TeamStanding>> {
    prop::collection::vec((0u32..70, 0u32..70), n).prop_map(move |records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, (wins, losses))| TeamStanding {
                team_id: format!("{}{:02}", conference.as_str(), i),
                team_name: format!("{conference} team {i}"),
                conference,
                wins,
                losses,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn rating_update_is_zero_sum(
        home in 1000.0f64..2000.0,
        away in 1000.0f64..2000.0,
        home_won: bool,
        k in 1.0f64..60.0,
        adv in -100.0f64..150.0,
    ) {
        let (new_home, new_away) = update_elo(home, away, home_won, k, adv);
        let gain = new_home - home;
        let loss = away - new_away;
        prop_assert!((gain - loss).abs() < 1e-9);
        prop_assert!(gain.abs() <= k);
        prop_assert_eq!(gain > 0.0, home_won);
    }

    #[test]
    fn series_ends_with_four_wins(
        seed: u64,
        rating_a in 1200.0f64..1800.0,
        rating_b in 1200.0f64..1800.0,
        a_home: bool,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outcome = simulate_series("A", rating_a, "B", rating_b, a_home, 65.0, &mut rng).unwrap();
        prop_assert!((4..=7).contains(&outcome.games_played()));
        prop_assert_eq!(outcome.wins_for(&outcome.winner_id), 4);
        prop_assert!(outcome.wins_for(&outcome.loser_id) <= 3);
    }

    #[test]
    fn seeding_ignores_input_order(
        rows in arb_standings(Conference::East, 12),
        rotate in 0usize..12,
    ) {
        let mut shuffled = rows.clone();
        shuffled.rotate_left(rotate);
        shuffled.reverse();

        let a = seed_conference(Conference::East, &rows).unwrap();
        let b = seed_conference(Conference::East, &shuffled).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn identical_records_order_by_id(wins in 0u32..70, losses in 0u32..70) {
        let make = |id: &str| TeamStanding {
            team_id: id.to_string(),
            team_name: id.to_string(),
            conference: Conference::West,
            wins,
            losses,
        };
        let mut rows: Vec<_> = ["W7", "W3", "W5", "W0", "W6", "W2", "W4", "W1"]
            .iter()
            .map(|id| make(*id))
            .collect();
        let seeds = seed_conference(Conference::West, &rows).unwrap();
        rows.reverse();
        let reversed = seed_conference(Conference::West, &rows).unwrap();

        let ids: Vec<_> = seeds.iter().map(|s| s.team_id.clone()).collect();
        prop_assert_eq!(ids, vec!["W0", "W1", "W2", "W3", "W4", "W5", "W6", "W7"]);
        prop_assert_eq!(seeds, reversed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn championship_odds_normalized(
        east in arb_standings(Conference::East, 10),
        west in arb_standings(Conference::West, 10),
        seed: u64,
    ) {
        let mut standings = east;
        standings.extend(west);
        let field = build_playoff_field(&standings).unwrap();

        let mut ratings = playoff_core::RatingStore::default();
        for (i, team) in field.teams().enumerate() {
            ratings.set_rating(&team.team_id, 1420.0 + 10.0 * i as f64);
        }

        let model = ModelConfig::default();
        let config = SimulationConfig { trials: 200, seed: Some(seed), chunk_size: 50 };
        let report = MonteCarloDriver::new(&field, &ratings, &model, &config)
            .unwrap()
            .run()
            .unwrap();

        prop_assert_eq!(report.championship.len(), 16);
        let total: f64 = report.championship.iter().map(|t| t.probability).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        let conf_total: f64 = report.conference_titles.iter().map(|c| c.probability).sum();
        prop_assert!((conf_total - 1.0).abs() < 1e-9);
    }
}
