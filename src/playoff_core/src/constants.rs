/// League-average baseline rating for teams that have not played yet
pub const DEFAULT_RATING: f64 = 1500.0;

/// Logistic scale of the Elo curve (400 points = 10:1 odds)
pub const ELO_SCALE: f64 = 400.0;

/// Default K-factor for regular-season updates
pub const DEFAULT_K_FACTOR: f64 = 20.0;

/// Default home-court advantage in rating points
pub const DEFAULT_HOME_COURT_ADV: f64 = 65.0;

/// Default number of Monte Carlo trials
pub const DEFAULT_SIMULATIONS: u64 = 10_000;

/// Default master seed for reproducible runs
pub const DEFAULT_SEED: u64 = 7;

/// Trials handed to a single rayon task
pub const DEFAULT_CHUNK_SIZE: u64 = 1024;

/// Wins needed to take a best-of-7 series
pub const SERIES_WINS: u32 = 4;

/// Teams seeded per conference
pub const PLAYOFF_SEEDS: usize = 8;

/// Finals matchups kept in the odds report
pub const TOP_FINALS_MATCHUPS: usize = 10;

/// Confidence level of the probability intervals in the odds report
pub const INTERVAL_CONFIDENCE: f64 = 0.95;

/// Venue for each game of a series, `true` when the higher seed is home (2-2-1-1-1).
pub const HOME_COURT_PATTERN: [bool; 7] = [true, true, false, false, true, false, true];

/// First-round seed pairings in bracket slot order.
///
/// Winners of adjacent slots meet in the next round: 1/8 vs 4/5 and 3/6 vs 2/7.
pub const FIRST_ROUND_PAIRINGS: [(u8, u8); 4] = [(1, 8), (4, 5), (3, 6), (2, 7)];

/// Series per conference bracket (4 + 2 + 1)
pub const CONFERENCE_SERIES: usize = 7;

/// Series in a full postseason, both conferences plus the Finals
pub const POSTSEASON_SERIES: usize = 2 * CONFERENCE_SERIES + 1;
