//! Cleanup of raw model output before validation.

/// Strip fenced-code markers a model may wrap around generated SQL.
///
/// Removes one leading fence (with its language tag, matched
/// case-insensitively) and one trailing fence, then trims. SQL content
/// inside the fences is never altered. An empty input stays empty; the
/// gate rejects it downstream, so normalization fails closed.
pub fn normalize(raw: &str) -> String {
    let mut sql = raw.trim();

    if matches!(sql.get(..6), Some(prefix) if prefix.eq_ignore_ascii_case("```sql")) {
        sql = sql[6..].trim_start();
    } else if let Some(rest) = sql.strip_prefix("```") {
        sql = rest.trim_start();
    }

    if let Some(rest) = sql.strip_suffix("```") {
        sql = rest.trim_end();
    }

    sql.to_string()
}
