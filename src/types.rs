//! Standings record types shared across the scraper.

use serde::Serialize;

/// Number of numeric columns in the statistics table.
pub const STAT_FIELDS: usize = 8;

/// One team's row in the standings table.
///
/// Field order is the output schema order; the CSV header is derived from it.
/// Values are captured verbatim from the page: nothing is recomputed, so
/// `goal_difference` is whatever the site printed, not `goals_for -
/// goals_against`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRecord {
    pub position: u32,
    pub team: String,
    pub games_played: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
}

impl StandingsRecord {
    /// Assemble a record from a position, team name and the numeric cells in
    /// document order: games played, wins, draws, losses, goals for, goals
    /// against, goal difference, points. Missing trailing values default to
    /// zero; cells beyond the eighth are ignored.
    pub fn from_parts(position: u32, team: String, stats: &[i64]) -> Self {
        let stat = |i: usize| stats.get(i).copied().unwrap_or(0);
        Self {
            position,
            team,
            games_played: stat(0),
            wins: stat(1),
            draws: stat(2),
            losses: stat(3),
            goals_for: stat(4),
            goals_against: stat(5),
            goal_difference: stat(6),
            points: stat(7),
        }
    }
}
