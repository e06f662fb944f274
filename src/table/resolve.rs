//! Column resolution and lenient numeric coercion.

/// Short names accepted in place of the canonical metric columns.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("acc", "accuracy"),
    ("prec", "precision"),
    ("rec", "recall"),
    ("f1", "f1_score"),
    ("time", "training_time"),
];

/// Finds the index of the column matching `key`.
///
/// Lookup order: exact name, case-insensitive name, then the alias table
/// (also case-insensitive). Returns `None` when nothing matches; callers
/// skip the entry rather than fail.
///
/// # Examples
///
/// ```
/// use u_mrprank::table::resolve_column;
///
/// let columns = vec!["accuracy".to_string(), "loss".to_string()];
/// assert_eq!(resolve_column(&columns, "ACCURACY"), Some(0));
/// assert_eq!(resolve_column(&columns, "acc"), Some(0));
/// assert_eq!(resolve_column(&columns, "latency"), None);
/// ```
pub fn resolve_column(columns: &[String], key: &str) -> Option<usize> {
    if let Some(idx) = columns.iter().position(|c| c == key) {
        return Some(idx);
    }

    let lowered = key.to_lowercase();
    // Later duplicates win, matching a lower-case name map built in column order.
    let by_lower = |needle: &str| columns.iter().rposition(|c| c.to_lowercase() == needle);

    if let Some(idx) = by_lower(&lowered) {
        return Some(idx);
    }

    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .and_then(|(_, canonical)| by_lower(canonical))
}

/// Parses a cell as a finite number.
///
/// Empty cells, text and `NaN` all coerce to `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}
