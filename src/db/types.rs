//! Query result types.
//!
//! Defines the structures used to represent result sets fetched from the
//! database. Rows are columnar: a shared header plus one `Vec<Value>` per
//! row, keyed back to column names on serialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map};
use std::fmt;
use std::time::Duration;

/// Represents the result of executing a SQL query.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column metadata for the result set, in the database's return order.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data, in the database's return order.
    pub rows: Vec<Row>,

    /// Time taken to execute the query.
    pub execution_time: Duration,

    /// Number of rows fetched.
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the result as a JSON array of objects, one per row, with
    /// keys in column order. Cells missing from a short row are omitted.
    pub fn to_json_rows(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::with_capacity(self.columns.len());
                for (i, column) in self.columns.iter().enumerate() {
                    if let Some(value) = row.get(i) {
                        object.insert(column.name.clone(), value.to_json());
                    }
                }
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type, as reported by the driver.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// A single value from a database query.
///
/// Closed set of variants; the access layer reports column name and type per
/// fetch, so no reflection is involved in decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Calendar date (no time component).
    Date(NaiveDate),

    /// Date and time without timezone (MySQL DATETIME).
    DateTime(NaiveDateTime),

    /// Timezone-aware instant (MySQL TIMESTAMP).
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a date/time variant.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Value::Date(_) | Value::DateTime(_) | Value::Timestamp(_)
        )
    }

    /// Converts the value to a display string. Temporal variants render in
    /// ISO-8601 form, never the driver-native representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339(),
        }
    }

    /// Converts the value to its JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::Float(f) => json!(f),
            Value::String(s) => json!(s),
            Value::Bytes(b) => json!(format!("<{} bytes>", b.len())),
            Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::Timestamp(ts) => json!(ts.to_rfc3339()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "NULL");
        assert_eq!(Value::Bool(true).to_display_string(), "true");
        assert_eq!(Value::Int(42).to_display_string(), "42");
        assert_eq!(Value::Float(2.71).to_display_string(), "2.71");
        assert_eq!(
            Value::String("hello".to_string()).to_display_string(),
            "hello"
        );
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_display_string(), "<3 bytes>");
    }

    #[test]
    fn test_temporal_display_is_iso_8601() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(Value::Date(date).to_display_string(), "2023-01-05");

        let dt = date.and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(
            Value::DateTime(dt).to_display_string(),
            "2023-01-05T14:30:00"
        );

        let ts = DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
        assert_eq!(
            Value::Timestamp(ts).to_display_string(),
            "2023-01-05T14:30:00+00:00"
        );
    }

    #[test]
    fn test_is_temporal() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert!(Value::Date(date).is_temporal());
        assert!(Value::DateTime(date.and_hms_opt(0, 0, 0).unwrap()).is_temporal());
        assert!(!Value::Int(1).is_temporal());
        assert!(!Value::Null.is_temporal());
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(2.71f64), Value::Float(2.71));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(42i64)), Value::Int(42));
    }

    #[test]
    fn test_to_json_rows_preserves_column_order() {
        let columns = vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("name", "VARCHAR"),
        ];
        let rows = vec![
            vec![Value::Int(1), Value::String("Alice".to_string())],
            vec![Value::Int(2), Value::String("Bob".to_string())],
        ];
        let result = QueryResult::with_data(columns, rows);

        let serialized = serde_json::to_string(&result.to_json_rows()).unwrap();
        assert_eq!(
            serialized,
            r#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]"#
        );
    }

    #[test]
    fn test_to_json_rows_serializes_dates_as_iso_strings() {
        let columns = vec![ColumnInfo::new("joined", "DATE")];
        let rows = vec![vec![Value::Date(
            NaiveDate::from_ymd_opt(2023, 2, 10).unwrap(),
        )]];
        let result = QueryResult::with_data(columns, rows);

        assert_eq!(
            result.to_json_rows(),
            serde_json::json!([{"joined": "2023-02-10"}])
        );
    }

    #[test]
    fn test_to_json_rows_omits_missing_cells() {
        let columns = vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("name", "VARCHAR"),
        ];
        let rows = vec![vec![Value::Int(1)]];
        let result = QueryResult::with_data(columns, rows);

        assert_eq!(result.to_json_rows(), serde_json::json!([{"id": 1}]));
    }

    #[test]
    fn test_query_result_with_data() {
        let columns = vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("email", "VARCHAR"),
        ];
        let rows = vec![
            vec![Value::Int(1), Value::String("a@example.com".to_string())],
            vec![Value::Int(2), Value::String("b@example.com".to_string())],
        ];

        let result = QueryResult::with_data(columns, rows);

        assert!(!result.is_empty());
        assert_eq!(result.row_count, 2);
        assert_eq!(result.columns.len(), 2);
    }
}
