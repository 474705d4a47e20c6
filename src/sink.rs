//! CSV sink for one extraction run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::StandingsRecord;

/// Write `records` to `path` in ascending position order, regardless of
/// extraction order. The header row is derived from the record's field
/// order. One file per run; an existing file is overwritten.
pub fn write_standings(path: &Path, records: &[StandingsRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut sorted: Vec<&StandingsRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.position);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in sorted {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "standings written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_header_and_rows_sorted_by_position() {
        // Records arrive out of order; the file must not.
        let records = vec![
            StandingsRecord::from_parts(2, "Girona".into(), &[38, 25, 6, 7, 85, 46, 39, 81]),
            StandingsRecord::from_parts(1, "Real Madrid".into(), &[38, 29, 8, 1, 87, 26, 61, 95]),
        ];

        let path = std::env::temp_dir().join(format!("laliga_sink_{}.csv", std::process::id()));
        write_standings(&path, &records).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "position,team,games_played,wins,draws,losses,goals_for,goals_against,goal_difference,points",
                "1,Real Madrid,38,29,8,1,87,26,61,95",
                "2,Girona,38,25,6,7,85,46,39,81",
            ]
        );
    }
}
