//! The SQL tool surface consumed by the agent runtime.
//!
//! One invocation performs one connect, execute, fetch-all, close sequence.
//! No state survives between invocations, so concurrent calls are
//! independent by construction.
//!
//! The SQL string is executed verbatim. The component performs no
//! validation, sanitization, or read-only restriction; the agent, guided by
//! its instructions, is solely responsible for what it submits. A failed
//! query is reported immediately with no retry; the caller decides whether
//! to reformulate.

use crate::config::DbConfig;
use crate::db::ClientFactory;
use crate::error::BridgeError;
use crate::render::{markdown_table, RenderMode};
use serde_json::{json, Map};
use tracing::warn;

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Raw rows as a JSON array of objects, keys in column order.
    Data(serde_json::Value),

    /// The result set rendered as a single Markdown table string.
    Markdown(String),

    /// A structured failure.
    Failure {
        message: String,
        detail: Option<String>,
        sql_sent: Option<String>,
    },
}

impl QueryOutcome {
    /// Returns true on success.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }

    /// Serializes the outcome into the wire mapping the agent framework
    /// sees: a `data` or `results_markdown` key on success, an `error` key
    /// (with optional `details` and `sql_sent`) on failure.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Data(rows) => json!({ "data": rows }),
            Self::Markdown(text) => json!({ "results_markdown": text }),
            Self::Failure {
                message,
                detail,
                sql_sent,
            } => {
                let mut object = Map::new();
                object.insert("error".to_string(), json!(message));
                if let Some(detail) = detail {
                    object.insert("details".to_string(), json!(detail));
                }
                if let Some(sql) = sql_sent {
                    object.insert("sql_sent".to_string(), json!(sql));
                }
                serde_json::Value::Object(object)
            }
        }
    }

    fn from_error(error: BridgeError, sql: &str) -> Self {
        match error {
            BridgeError::Database {
                message, detail, ..
            } => Self::Failure {
                message,
                detail: Some(detail),
                sql_sent: Some(sql.to_string()),
            },
            BridgeError::Config(message) => Self::Failure {
                message,
                detail: None,
                sql_sent: Some(sql.to_string()),
            },
            other => Self::Failure {
                message: other.to_string(),
                detail: None,
                sql_sent: Some(sql.to_string()),
            },
        }
    }
}

/// Executes a caller-supplied SQL statement and shapes the result.
///
/// Configuration is checked before the factory is touched; incomplete
/// credentials yield a failure with no connection attempt. The connection is
/// closed on every exit path.
pub async fn execute(
    config: &DbConfig,
    factory: &dyn ClientFactory,
    sql: &str,
    mode: RenderMode,
) -> QueryOutcome {
    if let Err(e) = config.validate() {
        return QueryOutcome::from_error(e, sql);
    }

    let mut client = match factory.connect(config).await {
        Ok(client) => client,
        Err(e) => return QueryOutcome::from_error(e, sql),
    };

    let fetched = client.execute_query(sql).await;

    // Release the connection before shaping the result; a close failure is
    // logged but never masks the query outcome.
    if let Err(e) = client.close().await {
        warn!("Failed to close connection: {e}");
    }

    match fetched {
        Ok(result) => match mode {
            RenderMode::Raw => QueryOutcome::Data(result.to_json_rows()),
            RenderMode::Markdown => QueryOutcome::Markdown(markdown_table(&result)),
        },
        Err(e) => QueryOutcome::from_error(e, sql),
    }
}
