//! Cell-level text coercion.

/// Parse a trimmed cell as a base-10 integer, optionally signed.
///
/// Malformed, empty or non-numeric cells default to 0 rather than erroring:
/// a garbled cell should not cost us the whole row. Callers log the anomaly
/// where it matters.
pub fn normalize_int(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

/// Strip parenthetical abbreviations from a team label.
///
/// `"Real Madrid (RMCF)"` becomes `"Real Madrid"`. An unmatched `(` is left
/// alone. If stripping leaves fewer than three characters, the original
/// trimmed input wins; that guards short legitimate names against collapsing
/// to nothing.
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                cleaned.push_str(rest[..open].trim_end());
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    cleaned.push_str(rest);

    let cleaned = cleaned.trim();
    if cleaned.chars().count() < 3 {
        raw.trim().to_string()
    } else {
        cleaned.to_string()
    }
}
