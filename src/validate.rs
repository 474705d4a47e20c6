//! Structural checks on an extracted record set.
//!
//! Validation is diagnostic only: it never mutates or drops records and
//! never blocks persistence.

use std::fmt;

use crate::types::StandingsRecord;
use crate::EXPECTED_TEAMS;

/// A structural oddity in an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The run produced no records at all.
    NoRecords,
    /// Team count differs from the league size.
    UnexpectedTeamCount { got: usize },
    /// Positions, sorted, do not form the dense range `1..=N`.
    NonSequentialPositions { positions: Vec<u32> },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NoRecords => write!(f, "no records extracted"),
            Anomaly::UnexpectedTeamCount { got } => {
                write!(f, "expected {EXPECTED_TEAMS} teams, got {got}")
            }
            Anomaly::NonSequentialPositions { positions } => {
                write!(f, "positions not sequential: {positions:?}")
            }
        }
    }
}

/// Report anomalies in `records`. Always returns; an empty vec means the set
/// looks like a complete league table.
pub fn validate(records: &[StandingsRecord]) -> Vec<Anomaly> {
    if records.is_empty() {
        return vec![Anomaly::NoRecords];
    }

    let mut anomalies = Vec::new();
    if records.len() != EXPECTED_TEAMS {
        anomalies.push(Anomaly::UnexpectedTeamCount {
            got: records.len(),
        });
    }

    let positions: Vec<u32> = records.iter().map(|r| r.position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    let dense: Vec<u32> = (1..=records.len() as u32).collect();
    if sorted != dense {
        anomalies.push(Anomaly::NonSequentialPositions { positions });
    }

    anomalies
}
