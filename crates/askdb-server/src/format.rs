//! Formatting of query results into a text table for the narration prompt.

use serde_json::{Map, Value};

/// Rows beyond this cap are summarized, not listed; the narration model
/// does not need more than a sample to answer.
const MAX_ROWS_FOR_LLM: usize = 15;

/// Format database rows as a markdown-ish table.
pub fn format_results(results: &[Map<String, Value>]) -> String {
    if results.is_empty() {
        return "The query returned no rows.".to_string();
    }

    let display = &results[..results.len().min(MAX_ROWS_FOR_LLM)];
    let columns: Vec<&str> = display[0].keys().map(String::as_str).collect();

    let mut formatted = String::from("Results:\n");
    formatted.push_str(&format!("| {} |\n", columns.join(" | ")));

    let separators: Vec<String> = columns
        .iter()
        .map(|column| "-".repeat(column.len().max(3)))
        .collect();
    formatted.push_str(&format!("|-{}-|\n", separators.join("-|-")));

    for row in display {
        let values: Vec<String> = columns.iter().map(|column| cell(row.get(*column))).collect();
        formatted.push_str(&format!("| {} |\n", values.join(" | ")));
    }

    if results.len() > MAX_ROWS_FOR_LLM {
        formatted.push_str(&format!(
            "(... {} more rows hidden ...)\n",
            results.len() - MAX_ROWS_FOR_LLM
        ));
    }

    formatted
}

/// Render one cell. Pipes would break the table layout, so they are
/// replaced.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(text)) => text.replace('|', "-"),
        Some(other) => other.to_string().replace('|', "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_results_have_a_message() {
        assert_eq!(format_results(&[]), "The query returned no rows.");
    }

    #[test]
    fn renders_header_and_rows() {
        let rows = vec![
            row(&[("event_id", json!(1)), ("name", json!("Tech Conf"))]),
            row(&[("event_id", json!(2)), ("name", json!("Hackathon"))]),
        ];
        let table = format_results(&rows);
        assert!(table.starts_with("Results:\n| event_id | name |\n"));
        assert!(table.contains("| 1 | Tech Conf |"));
        assert!(table.contains("| 2 | Hackathon |"));
    }

    #[test]
    fn nulls_and_pipes_are_sanitized() {
        let rows = vec![row(&[
            ("name", json!("a|b")),
            ("location", Value::Null),
        ])];
        let table = format_results(&rows);
        assert!(table.contains("| a-b | NULL |"));
    }

    #[test]
    fn long_result_sets_are_capped() {
        let rows: Vec<_> = (0..20).map(|i| row(&[("event_id", json!(i))])).collect();
        let table = format_results(&rows);
        assert!(table.contains("(... 5 more rows hidden ...)"));
        assert!(!table.contains("| 19 |"));
    }
}
