//! Extraction pipeline: locate the standings markup, recover per-row fields
//! and coerce them into [`StandingsRecord`]s.
//!
//! ESPN renders the standings as two visually adjacent but structurally
//! separate tables: an identity table (rank + team name) and a statistics
//! table (eight numeric columns). Row `i` of one describes the same team as
//! row `i` of the other; positional order is the only correlation, so
//! document order is preserved end to end. When that layout is missing the
//! pipeline degrades through two lower-fidelity strategies rather than
//! failing.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::normalize::{normalize_int, normalize_name};
use crate::types::StandingsRecord;
use crate::{EXPECTED_TEAMS, STAT_FIELDS};

/// Link target fragment identifying a team profile page.
const TEAM_URL_FRAGMENT: &str = "/futbol/equipo/";

const E: &str = "Invalid selector";
lazy_static! {
    static ref STANDINGS_TABLE: Selector = Selector::parse("table.Table").expect(E);
    static ref ANY_TABLE: Selector = Selector::parse("table").expect(E);
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TBODY_TR: Selector = Selector::parse("tbody tr").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref CELL: Selector = Selector::parse("td, th").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
    static ref ANCHOR_LINK: Selector = Selector::parse("a.AnchorLink").expect(E);
}

/// One extraction algorithm. Strategies are tried in [`Strategy::PRIORITY`]
/// order; the first to yield at least one record wins outright, even if a
/// later one might have found more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Paired identity/statistics tables; recovers the full typed schema.
    DualTable,
    /// One table with per-row selectors; resilient to flattened layouts.
    SingleTable,
    /// Any sufficiently large table; position and name only, stats zeroed.
    Generic,
}

impl Strategy {
    pub const PRIORITY: [Strategy; 3] =
        [Strategy::DualTable, Strategy::SingleTable, Strategy::Generic];

    fn name(self) -> &'static str {
        match self {
            Strategy::DualTable => "dual_table",
            Strategy::SingleTable => "single_table",
            Strategy::Generic => "generic",
        }
    }

    fn attempt(self, doc: &Html) -> Vec<StandingsRecord> {
        match self {
            Strategy::DualTable => extract_dual_table(doc),
            Strategy::SingleTable => extract_single_table(doc),
            Strategy::Generic => extract_generic(doc),
        }
    }
}

/// Run the strategy chain over a parsed document. An empty result means
/// every strategy came up dry and the caller should treat the run as failed.
pub fn extract_standings(doc: &Html) -> Vec<StandingsRecord> {
    for strategy in Strategy::PRIORITY {
        let records = strategy.attempt(doc);
        if !records.is_empty() {
            info!(
                strategy = strategy.name(),
                teams = records.len(),
                "extraction succeeded"
            );
            return records;
        }
        debug!(strategy = strategy.name(), "no rows, falling back");
    }
    warn!("all extraction strategies came up empty");
    Vec::new()
}

/// Rendered text of a node: every text fragment trimmed and concatenated.
fn element_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Leading run of decimal digits, if any.
fn leading_digits(text: &str) -> Option<u32> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        None
    } else {
        text[..end].parse().ok()
    }
}

/// First run of decimal digits anywhere in the text.
fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    leading_digits(&text[start..])
}

fn is_team_link(el: ElementRef) -> bool {
    el.value()
        .attr("href")
        .map_or(false, |href| href.contains(TEAM_URL_FRAGMENT))
}

/// Numeric cells of a statistics row, in document order.
fn numeric_cells(row: ElementRef) -> Vec<i64> {
    row.select(&TD)
        .map(|cell| normalize_int(&element_text(cell)))
        .collect()
}

/// Find the paired identity/statistics tables, or signal fallback-needed.
///
/// Both tables carry the site's `Table` class and share a parent context;
/// the first is identity, the second statistics. Each table's first row is
/// a header and is dropped.
fn locate_dual_tables(doc: &Html) -> Option<(Vec<ElementRef<'_>>, Vec<ElementRef<'_>>)> {
    let first = doc.select(&STANDINGS_TABLE).next()?;
    let parent = first.parent().and_then(ElementRef::wrap)?;
    let tables: Vec<ElementRef> = parent.select(&STANDINGS_TABLE).collect();
    if tables.len() < 2 {
        debug!(found = tables.len(), "dual-table layout not present");
        return None;
    }

    let identity_rows: Vec<ElementRef> = tables[0].select(&TR).skip(1).collect();
    let stats_rows: Vec<ElementRef> = tables[1].select(&TR).skip(1).collect();
    if identity_rows.is_empty() || stats_rows.is_empty() {
        return None;
    }
    Some((identity_rows, stats_rows))
}

/// Assemble one record from an aligned row pair.
///
/// Returns `None` only when the identity row has no data cell at all; every
/// other malformation degrades to a default so the row survives.
fn extract_row(
    identity_row: ElementRef,
    stats_row: ElementRef,
    fallback_rank: u32,
) -> Option<StandingsRecord> {
    let identity_cell = identity_row.select(&TD).next()?;

    let cell_text = element_text(identity_cell);
    let position = leading_digits(&cell_text).unwrap_or(fallback_rank);

    // Team cells carry several links (abbreviation, crest, full name); the
    // longest text over three characters is the display name.
    let mut raw_name = String::new();
    for link in identity_cell.select(&A).filter(|l| is_team_link(*l)) {
        let text = element_text(link);
        if text.chars().count() > raw_name.chars().count() && text.chars().count() > 3 {
            raw_name = text;
        }
    }
    let team = if raw_name.is_empty() {
        format!("Team {position}")
    } else {
        normalize_name(&raw_name)
    };

    let stats = numeric_cells(stats_row);
    if stats.len() < STAT_FIELDS {
        debug!(position, have = stats.len(), "padding short statistics row");
    }

    Some(StandingsRecord::from_parts(position, team, &stats))
}

/// Preferred strategy: aligned identity/statistics table pair.
fn extract_dual_table(doc: &Html) -> Vec<StandingsRecord> {
    let Some((identity_rows, stats_rows)) = locate_dual_tables(doc) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for (i, (identity, stats)) in identity_rows.iter().zip(&stats_rows).enumerate() {
        // One malformed row must not abort the rest.
        match extract_row(*identity, *stats, (i + 1) as u32) {
            Some(record) => records.push(record),
            None => warn!(row = i + 1, "skipping row without an identity cell"),
        }
    }
    records
}

/// Second strategy: a single table where each row carries position, team and
/// statistics together.
fn extract_single_table(doc: &Html) -> Vec<StandingsRecord> {
    let Some(table) = doc.select(&STANDINGS_TABLE).next() else {
        return Vec::new();
    };

    let rows: Vec<ElementRef> = {
        let tbody_rows: Vec<ElementRef> = table.select(&TBODY_TR).collect();
        if tbody_rows.is_empty() {
            table.select(&TR).collect()
        } else {
            tbody_rows
        }
    };

    let mut records = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<ElementRef> = row.select(&TD).collect();
        if cells.len() < STAT_FIELDS {
            continue;
        }

        let position = first_number(&element_text(cells[0])).unwrap_or((i + 1) as u32);

        let team_cell = cells[1];
        let mut team = team_cell
            .select(&ANCHOR_LINK)
            .next()
            .filter(|link| is_team_link(*link))
            .map(|link| normalize_name(&element_text(link)))
            .unwrap_or_default();
        if team.is_empty() {
            team = team_cell
                .select(&A)
                .find(|link| is_team_link(*link))
                .map(|link| normalize_name(&element_text(link)))
                .unwrap_or_default();
        }
        if team.is_empty() {
            team = normalize_name(&element_text(team_cell));
        }

        let stats: Vec<i64> = cells
            .iter()
            .skip(2)
            .take(STAT_FIELDS)
            .map(|cell| normalize_int(&element_text(*cell)))
            .collect();

        records.push(StandingsRecord::from_parts(position, team, &stats));
    }
    records
}

/// Last resort: scan every table and take the first league-sized one.
/// Produces position + name only; numeric fields are zeroed. Trades
/// accuracy for returning something when the layout changes under us.
fn extract_generic(doc: &Html) -> Vec<StandingsRecord> {
    for table in doc.select(&ANY_TABLE) {
        let rows: Vec<ElementRef> = table.select(&TR).collect();
        if rows.len() < EXPECTED_TEAMS {
            continue;
        }

        let mut records = Vec::new();
        for (i, row) in rows.iter().skip(1).enumerate() {
            let cells: Vec<ElementRef> = row.select(&CELL).collect();
            if cells.len() < STAT_FIELDS {
                continue;
            }

            let position = (i + 1) as u32;
            let mut team = format!("Team {position}");
            for cell in cells.iter().take(3) {
                let text = element_text(*cell);
                if text.chars().count() > 3 && !text.chars().all(|c| c.is_ascii_digit()) {
                    team = normalize_name(&text);
                    break;
                }
            }

            records.push(StandingsRecord::from_parts(position, team, &[]));
            if records.len() >= EXPECTED_TEAMS {
                break;
            }
        }

        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}
