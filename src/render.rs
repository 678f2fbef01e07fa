//! Markdown presentation of result sets.

use crate::db::QueryResult;

/// Output shape for a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Raw rows, one JSON object per row.
    #[default]
    Raw,
    /// A single Markdown table string.
    Markdown,
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Invalid render mode: {s}. Expected: raw or markdown")),
        }
    }
}

/// Renders a result set as a Markdown table.
///
/// Headers come from the result's columns in return order. A row shorter
/// than the header renders empty strings for its missing cells, so every
/// line carries the same number of separators. Temporal values appear in
/// ISO-8601 text form.
pub fn markdown_table(result: &QueryResult) -> String {
    if result.is_empty() {
        return "No results found.".to_string();
    }

    let header_row = format!(
        "| {} |",
        result
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    );

    let separator_row = format!(
        "| {} |",
        vec!["---"; result.columns.len()].join(" | ")
    );

    let mut lines = Vec::with_capacity(result.rows.len() + 2);
    lines.push(header_row);
    lines.push(separator_row);

    for row in &result.rows {
        let cells: Vec<String> = (0..result.columns.len())
            .map(|i| {
                row.get(i)
                    .map(|v| v.to_display_string())
                    .unwrap_or_default()
            })
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, QueryResult, Value};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_result_renders_placeholder() {
        assert_eq!(markdown_table(&QueryResult::new()), "No results found.");
    }

    #[test]
    fn test_table_with_dates() {
        let columns = vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("name", "VARCHAR"),
            ColumnInfo::new("joined", "DATE"),
        ];
        let rows = vec![
            vec![
                Value::Int(1),
                Value::String("A".to_string()),
                Value::Date(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()),
            ],
            vec![
                Value::Int(2),
                Value::String("B".to_string()),
                Value::Date(NaiveDate::from_ymd_opt(2023, 2, 10).unwrap()),
            ],
        ];
        let result = QueryResult::with_data(columns, rows);

        let expected = "\
| id | name | joined |
| --- | --- | --- |
| 1 | A | 2023-01-05 |
| 2 | B | 2023-02-10 |";
        assert_eq!(markdown_table(&result), expected);
    }

    #[test]
    fn test_short_rows_pad_with_empty_cells() {
        let columns = vec![
            ColumnInfo::new("a", "BIGINT"),
            ColumnInfo::new("b", "BIGINT"),
            ColumnInfo::new("c", "BIGINT"),
        ];
        let rows = vec![
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            vec![Value::Int(4)],
        ];
        let result = QueryResult::with_data(columns, rows);

        let output = markdown_table(&result);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        // Every line has the same number of cell separators as the header
        let header_pipes = lines[0].matches('|').count();
        for line in &lines {
            assert_eq!(line.matches('|').count(), header_pipes);
        }
        assert_eq!(lines[3], "| 4 |  |  |");
    }

    #[test]
    fn test_separator_has_one_dash_group_per_column() {
        let columns = vec![ColumnInfo::new("x", "BIGINT"), ColumnInfo::new("y", "BIGINT")];
        let rows = vec![vec![Value::Int(1), Value::Int(2)]];
        let result = QueryResult::with_data(columns, rows);

        let output = markdown_table(&result);
        assert_eq!(output.lines().nth(1).unwrap(), "| --- | --- |");
    }

    #[test]
    fn test_render_mode_from_str() {
        assert_eq!("raw".parse::<RenderMode>().unwrap(), RenderMode::Raw);
        assert_eq!(
            "Markdown".parse::<RenderMode>().unwrap(),
            RenderMode::Markdown
        );
        assert!("table".parse::<RenderMode>().is_err());
    }
}
