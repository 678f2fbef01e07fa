//! MySQL database client implementation.
//!
//! One plain `MySqlConnection` per invocation, decoded column-by-column
//! using the driver's reported type names.

use crate::config::DbConfig;
use crate::db::{ClientFactory, ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Column as SqlxColumn, Connection, Row as SqlxRow, TypeInfo};
use std::time::Instant;
use tracing::debug;

/// MySQL database client wrapping a single scoped connection.
#[derive(Debug)]
pub struct MySqlClient {
    connection: MySqlConnection,
}

impl MySqlClient {
    /// Opens a fresh connection using the given configuration.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        debug!("Connecting to {}", config.display_string());
        let connection = MySqlConnection::connect(&conn_str)
            .await
            .map_err(|e| BridgeError::database(format!("MySQL Error: {e}"), String::new()))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let fetched = sqlx::query(sql)
            .fetch_all(&mut self.connection)
            .await
            .map_err(|e| BridgeError::database(format!("MySQL Error: {e}"), sql))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = match fetched.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            None => Vec::new(),
        };

        let rows: Vec<Row> = fetched.iter().map(convert_row).collect();
        let row_count = rows.len();

        debug!(
            "Fetched {} rows in {:?}",
            row_count, execution_time
        );

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
        })
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.connection
            .close()
            .await
            .map_err(|e| BridgeError::database(format!("MySQL Error: {e}"), String::new()))
    }
}

/// Converts a driver row into our value variants, by reported type name.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

fn convert_value(row: &MySqlRow, i: usize, type_name: &str) -> Value {
    match type_name {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "BIT" => row
            .try_get::<Option<u64>, _>(i)
            .map(|v| match v {
                // u64 values past i64::MAX fall back to text
                Some(n) => i64::try_from(n)
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::String(n.to_string())),
                None => Value::Null,
            })
            .unwrap_or(Value::Null),

        "YEAR" => row
            .try_get::<Option<u16>, _>(i)
            .map(|v| v.map(|n| Value::Int(i64::from(n))).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(i)
            .map(|v| v.map(|f| Value::Float(f64::from(f))).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "DECIMAL" => row
            .try_get::<Option<rust_decimal::Decimal>, _>(i)
            .map(|v| match v {
                Some(d) => d
                    .to_f64()
                    .map(Value::Float)
                    .unwrap_or_else(|| Value::String(d.to_string())),
                None => Value::Null,
            })
            .unwrap_or(Value::Null),

        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            row.try_get::<Option<String>, _>(i)
                .map(Value::from)
                .unwrap_or(Value::Null)
        }

        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "DATETIME" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "TIMESTAMP" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(i)
            .map(Value::from)
            .unwrap_or(Value::Null),

        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(i)
            .map(|v| {
                v.map(|t| Value::String(t.format("%H:%M:%S").to_string()))
                    .unwrap_or(Value::Null)
            })
            .unwrap_or(Value::Null),

        "JSON" => row
            .try_get::<Option<serde_json::Value>, _>(i)
            .map(|v| v.map(|j| Value::String(j.to_string())).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),

        _ => row
            .try_get::<Option<String>, _>(i)
            .map(Value::from)
            .unwrap_or_else(|_| {
                row.try_get::<Option<Vec<u8>>, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null)
            }),
    }
}

/// Factory producing one fresh MySQL connection per invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlFactory;

#[async_trait]
impl ClientFactory for MySqlFactory {
    async fn connect(&self, config: &DbConfig) -> Result<Box<dyn DatabaseClient>> {
        let client = MySqlClient::connect(config).await?;
        Ok(Box::new(client))
    }
}
