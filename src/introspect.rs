//! Schema and sample-data introspection for the offline context generator.
//!
//! Walks the current database's tables collecting three sections per table:
//! column schema, a few sample rows, and light per-column statistics. Errors
//! on a single table degrade to inline notes so one unreadable table does
//! not abort the whole run.

use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::Result;
use crate::render::markdown_table;
use tracing::{info, warn};

/// Default number of sample rows fetched per table.
pub const DEFAULT_SAMPLE_ROWS: usize = 3;

/// MySQL type keywords treated as numeric for column analysis.
const NUMERIC_TYPES: [&str; 7] = [
    "int", "bigint", "decimal", "float", "double", "tinyint", "smallint",
];

/// MySQL type keywords treated as text for column analysis.
const TEXT_TYPES: [&str; 4] = ["char", "varchar", "text", "enum"];

/// Backtick-quotes an identifier, doubling any embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Everything gathered about one database, ready to feed the LLM.
#[derive(Debug, Clone, Default)]
pub struct DatabaseContext {
    /// Per table: schema description lines.
    pub schema: Vec<(String, Vec<String>)>,

    /// Per table: sample rows rendered as a Markdown table.
    pub samples: Vec<(String, String)>,

    /// Per table: column analysis lines.
    pub analysis: Vec<(String, Vec<String>)>,
}

impl DatabaseContext {
    /// Assembles the sections into the Markdown document sent to the LLM.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec!["\n# DATABASE INFORMATION\n".to_string()];

        lines.push("## Database Schema:".to_string());
        for (table, schema) in &self.schema {
            lines.push(format!("\n### Table: {}", quote_ident(table)));
            lines.extend(schema.iter().map(|col| format!("- {col}")));
        }

        lines.push("\n---\n## Table Data Samples:".to_string());
        for (table, sample) in &self.samples {
            lines.push(format!(
                "\n### Samples for table {}:\n{}",
                quote_ident(table),
                sample
            ));
        }

        lines.push("\n---\n## Column Data Analysis:".to_string());
        for (table, analysis) in &self.analysis {
            if !analysis.is_empty() {
                lines.push(format!("\n### Analysis of Table {}:", quote_ident(table)));
                lines.extend(analysis.iter().cloned());
            }
        }

        lines.join("\n")
    }
}

/// Collects schema, samples, and analysis for every base table in the
/// current database.
pub async fn collect_context(
    client: &mut dyn DatabaseClient,
    sample_limit: usize,
) -> Result<DatabaseContext> {
    let tables = list_tables(client).await?;
    info!("Analyzing {} tables", tables.len());

    let mut context = DatabaseContext::default();
    for (i, table) in tables.iter().enumerate() {
        info!("({}/{}) Processing table: {}", i + 1, tables.len(), table);
        context
            .schema
            .push((table.clone(), table_schema(client, table).await));
        context
            .samples
            .push((table.clone(), sample_rows(client, table, sample_limit).await));
        context
            .analysis
            .push((table.clone(), column_analysis(client, table).await));
    }

    Ok(context)
}

/// Fetches the base tables of the current database, ordered by name.
pub async fn list_tables(client: &mut dyn DatabaseClient) -> Result<Vec<String>> {
    let result = client
        .execute_query(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
             ORDER BY table_name;",
        )
        .await?;

    Ok(first_column_strings(&result))
}

/// Retrieves the column schema for a table as `` `col`: **TYPE** `` lines.
pub async fn table_schema(client: &mut dyn DatabaseClient, table: &str) -> Vec<String> {
    match client
        .execute_query(&format!("DESCRIBE {};", quote_ident(table)))
        .await
    {
        // DESCRIBE yields (Field, Type, Null, Key, Default, Extra)
        Ok(result) => result
            .rows
            .iter()
            .filter_map(|row| {
                let field = row.first()?;
                let data_type = row.get(1)?;
                Some(format!(
                    "{}: **{}**",
                    quote_ident(&field.to_display_string()),
                    data_type.to_display_string().to_uppercase()
                ))
            })
            .collect(),
        Err(e) => {
            warn!("Error getting schema for table {table}: {e}");
            vec![format!("Error retrieving schema: {e}")]
        }
    }
}

/// Fetches a few sample rows and renders them as a Markdown table.
pub async fn sample_rows(client: &mut dyn DatabaseClient, table: &str, limit: usize) -> String {
    match client
        .execute_query(&format!(
            "SELECT * FROM {} LIMIT {limit};",
            quote_ident(table)
        ))
        .await
    {
        Ok(result) if result.is_empty() => {
            format!("No sample rows found for table {}.", quote_ident(table))
        }
        Ok(result) => markdown_table(&result),
        Err(e) => {
            warn!("Could not retrieve samples for table {table}: {e}");
            format!(
                "Could not retrieve samples for table {}. Details: {e}",
                quote_ident(table)
            )
        }
    }
}

/// Performs basic per-column data analysis on a table.
///
/// Numeric columns report MIN/MAX/AVG and distinct count; text columns
/// report distinct count and the five most frequent values. Columns that
/// fail to aggregate are skipped.
pub async fn column_analysis(client: &mut dyn DatabaseClient, table: &str) -> Vec<String> {
    let described = match client
        .execute_query(&format!("DESCRIBE {};", quote_ident(table)))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            warn!("Could not describe table {table} for analysis: {e}");
            return vec![format!("Could not analyze table. Error: {e}")];
        }
    };

    let mut lines = Vec::new();
    for row in &described.rows {
        let (Some(col), Some(data_type)) = (row.first(), row.get(1)) else {
            continue;
        };
        let col_name = col.to_display_string();
        let type_lower = data_type.to_display_string().to_lowercase();

        if NUMERIC_TYPES.iter().any(|t| type_lower.contains(t)) {
            if let Some(line) = analyze_numeric_column(client, table, &col_name).await {
                lines.push(line);
            }
        }

        if TEXT_TYPES.iter().any(|t| type_lower.contains(t)) {
            if let Some(line) = analyze_text_column(client, table, &col_name).await {
                lines.push(line);
            }
        }
    }

    if lines.is_empty() {
        vec!["No specific column analysis was possible.".to_string()]
    } else {
        lines
    }
}

async fn analyze_numeric_column(
    client: &mut dyn DatabaseClient,
    table: &str,
    column: &str,
) -> Option<String> {
    let col = quote_ident(column);
    let result = client
        .execute_query(&format!(
            "SELECT MIN({col}), MAX({col}), AVG({col}), COUNT(DISTINCT {col}) FROM {};",
            quote_ident(table)
        ))
        .await
        .ok()?;

    let row = result.rows.first()?;
    let (min, max, avg) = (row.first()?, row.get(1)?, row.get(2)?);
    if min.is_null() || max.is_null() || avg.is_null() {
        return None;
    }
    let distinct = row.get(3).map(Value::to_display_string).unwrap_or_default();

    Some(format!(
        "- **{column}**: Numeric. MIN=`{min}`, MAX=`{max}`, AVG=`{}`, Distinct Values=`{distinct}`",
        format_avg(avg)
    ))
}

async fn analyze_text_column(
    client: &mut dyn DatabaseClient,
    table: &str,
    column: &str,
) -> Option<String> {
    let col = quote_ident(column);
    let table_quoted = quote_ident(table);

    let distinct_result = client
        .execute_query(&format!(
            "SELECT COUNT(DISTINCT {col}) FROM {table_quoted} WHERE {col} IS NOT NULL;"
        ))
        .await
        .ok()?;
    let distinct = match distinct_result.rows.first()?.first()? {
        Value::Int(n) => *n,
        _ => return None,
    };
    if distinct == 0 {
        return None;
    }

    let top_result = client
        .execute_query(&format!(
            "SELECT {col} FROM {table_quoted} WHERE {col} IS NOT NULL \
             GROUP BY {col} ORDER BY COUNT(*) DESC LIMIT 5;"
        ))
        .await
        .ok()?;
    let top_values = top_result
        .rows
        .iter()
        .filter_map(|row| row.first())
        .map(|v| format!("`{}`", v.to_display_string()))
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "- **{column}**: Text. Distinct Values=`{distinct}`. Top values: {top_values}"
    ))
}

/// Formats an average to two decimal places regardless of driver type.
fn format_avg(value: &Value) -> String {
    match value {
        Value::Float(f) => format!("{f:.2}"),
        Value::Int(i) => format!("{:.2}", *i as f64),
        other => other.to_display_string(),
    }
}

/// Extracts the first column of every row as strings. Shared by callers
/// that issue single-column catalog queries.
pub fn first_column_strings(result: &QueryResult) -> Vec<String> {
    result
        .rows
        .iter()
        .filter_map(|row| row.first().map(Value::to_display_string))
        .collect()
}
