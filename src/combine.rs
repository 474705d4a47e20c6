//! Concatenate per-season CSV files into one combined table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use csv::StringRecord;
use tracing::{info, warn};

/// Combine every `*.csv` under `dir` (sorted by file name) into `output`.
///
/// With `source_column` set, each row is tagged with its originating file
/// name in a trailing `source_file` column. Files that fail to load are
/// skipped with a logged cause; the batch only fails when zero files match
/// or zero load, in which case nothing is written.
pub fn run_combine(dir: &Path, output: &Path, source_column: bool) -> Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "csv"))
        .filter(|p| p != output)
        .collect();

    if files.is_empty() {
        bail!("no csv files found in {}", dir.display());
    }
    files.sort();
    info!(count = files.len(), dir = %dir.display(), "combining csv files");

    let mut header: Option<StringRecord> = None;
    let mut rows: Vec<StringRecord> = Vec::new();
    let mut loaded = 0usize;
    for file in &files {
        match load_rows(file, source_column) {
            Ok((file_header, file_rows)) => {
                if let Some(first) = &header {
                    if first.len() != file_header.len() {
                        // A different width cannot be appended to the
                        // combined table; skip the file, keep the batch.
                        warn!(
                            file = %file.display(),
                            expected = first.len(),
                            got = file_header.len(),
                            "skipping file with mismatched column count"
                        );
                        continue;
                    }
                    if *first != file_header {
                        // Same width, different names; appended positionally.
                        warn!(file = %file.display(), "header differs from first file");
                    }
                } else {
                    header = Some(file_header);
                }
                rows.extend(file_rows);
                loaded += 1;
            }
            Err(e) => warn!(file = %file.display(), error = %e, "skipping file"),
        }
    }

    let Some(header) = header else {
        bail!("no csv files could be loaded from {}", dir.display());
    };

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record(&header)?;
    let total = rows.len();
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(files = loaded, rows = total, output = %output.display(), "combine complete");
    Ok(())
}

fn load_rows(file: &Path, source_column: bool) -> Result<(StringRecord, Vec<StringRecord>)> {
    let source = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader = csv::Reader::from_path(file)?;
    let mut header = reader.headers()?.clone();
    if source_column {
        header.push_field("source_file");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record?;
        if source_column {
            record.push_field(&source);
        }
        rows.push(record);
    }
    Ok((header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("laliga_combine_{tag}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn combines_files_in_name_order() {
        let dir = temp_dir("order");
        fs::write(dir.join("b.csv"), "position,team\n2,Girona\n").unwrap();
        fs::write(dir.join("a.csv"), "position,team\n1,Real Madrid\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let output = dir.join("combined.csv");
        run_combine(&dir, &output, false).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec!["position,team", "1,Real Madrid", "2,Girona"]
        );
    }

    #[test]
    fn source_column_tags_each_row_with_its_file() {
        let dir = temp_dir("source");
        fs::write(dir.join("laliga_2019.csv"), "position,team\n1,Barcelona\n").unwrap();

        let output = dir.join("combined.csv");
        run_combine(&dir, &output, true).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec![
                "position,team,source_file",
                "1,Barcelona,laliga_2019.csv"
            ]
        );
    }

    #[test]
    fn zero_matching_files_errors_without_writing() {
        let dir = temp_dir("empty");
        let output = dir.join("combined.csv");

        let result = run_combine(&dir, &output, false);
        assert!(result.is_err());
        assert!(!output.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_column_count_is_skipped_not_fatal() {
        let dir = temp_dir("width");
        fs::write(dir.join("a.csv"), "position,team\n1,Real Madrid\n2,Girona\n").unwrap();
        // Wider file: would corrupt the combined table if appended.
        fs::write(dir.join("b.csv"), "position,team,points\n1,Barcelona,88\n").unwrap();

        let output = dir.join("combined.csv");
        run_combine(&dir, &output, false).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec!["position,team", "1,Real Madrid", "2,Girona"]
        );
    }

    #[test]
    fn same_width_header_mismatch_appends_positionally() {
        let dir = temp_dir("names");
        fs::write(dir.join("a.csv"), "position,team\n1,Sevilla\n").unwrap();
        fs::write(dir.join("b.csv"), "rank,club\n2,Villarreal\n").unwrap();

        let output = dir.join("combined.csv");
        run_combine(&dir, &output, false).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec!["position,team", "1,Sevilla", "2,Villarreal"]
        );
    }

    #[test]
    fn malformed_file_is_skipped_not_fatal() {
        let dir = temp_dir("malformed");
        fs::write(dir.join("a.csv"), "position,team\n1,Sevilla\n").unwrap();
        // Ragged row: wrong field count makes the reader error out.
        fs::write(dir.join("broken.csv"), "position,team\n1,too,many,fields\n").unwrap();

        let output = dir.join("combined.csv");
        run_combine(&dir, &output, false).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec!["position,team", "1,Sevilla"]
        );
    }
}
