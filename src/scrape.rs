//! Scrape orchestration: fetch, extract, validate, persist, per season.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::fetch::Fetcher;
use crate::{extract, sink, validate};

pub fn run_scrape(seasons: &str, out_dir: &Path) -> Result<()> {
    let seasons = parse_seasons(seasons)?;
    let fetcher = Fetcher::new().context("Failed to build http client")?;

    let mut failures = 0usize;
    for season in &seasons {
        if let Err(e) = scrape_season(&fetcher, season, out_dir) {
            error!(season = %season, error = %e, "season scrape failed");
            failures += 1;
        }
    }
    if failures == seasons.len() {
        bail!("all {failures} season(s) failed");
    }
    Ok(())
}

/// Parse a comma-separated list of four-digit season years.
fn parse_seasons(raw: &str) -> Result<Vec<String>> {
    let mut seasons = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.len() == 4 && part.chars().all(|c| c.is_ascii_digit()) {
            seasons.push(part.to_string());
        } else {
            bail!("invalid season '{part}': expected a four-digit year");
        }
    }
    Ok(seasons)
}

fn scrape_season(fetcher: &Fetcher, season: &str, out_dir: &Path) -> Result<()> {
    let doc = fetcher
        .fetch_standings(season)
        .with_context(|| format!("Failed to fetch season {season}"))?;

    let records = extract::extract_standings(&doc);
    if records.is_empty() {
        bail!("no standings data extracted for season {season}");
    }

    // Anomalies are diagnostics only; the file is still written.
    for anomaly in validate::validate(&records) {
        warn!(season, %anomaly, "validation anomaly");
    }

    let path = out_dir.join(format!("laliga_{season}_standings.csv"));
    sink::write_standings(&path, &records)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if let Some(leader) = records.iter().min_by_key(|r| r.position) {
        info!(
            season,
            teams = records.len(),
            leader = %leader.team,
            points = leader.points,
            "season scraped"
        );
    }
    Ok(())
}
