//! Mock database clients for testing.
//!
//! `MockFactory` counts its invocations so tests can assert that no
//! connection is attempted when configuration is incomplete.

use super::{ClientFactory, DatabaseClient, QueryResult};
use crate::config::DbConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A mock database client that returns a predefined result.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    result: QueryResult,
}

impl MockClient {
    /// Creates a mock client returning an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock client returning the given result for every query.
    pub fn with_result(result: QueryResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    async fn execute_query(&mut self, _sql: &str) -> Result<QueryResult> {
        Ok(self.result.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// A mock client whose queries always fail with the given driver text.
#[derive(Debug, Clone)]
pub struct FailingClient {
    detail: String,
}

impl FailingClient {
    /// Creates a failing client reporting the given error detail.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingClient {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        Err(BridgeError::database(self.detail.clone(), sql))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// What a [`MockFactory`] hands out on connect.
#[derive(Debug, Clone)]
enum FactoryBehavior {
    Succeed(QueryResult),
    FailQuery(String),
    RefuseConnection(String),
}

/// A counting connection factory for tests.
#[derive(Debug, Clone)]
pub struct MockFactory {
    behavior: FactoryBehavior,
    connect_count: Arc<AtomicUsize>,
}

impl MockFactory {
    /// Factory whose clients return the given result for every query.
    pub fn returning(result: QueryResult) -> Self {
        Self {
            behavior: FactoryBehavior::Succeed(result),
            connect_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Factory whose clients fail every query with the given driver text.
    pub fn failing_queries(detail: impl Into<String>) -> Self {
        Self {
            behavior: FactoryBehavior::FailQuery(detail.into()),
            connect_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Factory that refuses to connect at all.
    pub fn refusing(detail: impl Into<String>) -> Self {
        Self {
            behavior: FactoryBehavior::RefuseConnection(detail.into()),
            connect_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `connect` has been called.
    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    async fn connect(&self, _config: &DbConfig) -> Result<Box<dyn DatabaseClient>> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FactoryBehavior::Succeed(result) => {
                Ok(Box::new(MockClient::with_result(result.clone())))
            }
            FactoryBehavior::FailQuery(detail) => Ok(Box::new(FailingClient::new(detail.clone()))),
            FactoryBehavior::RefuseConnection(detail) => {
                Err(BridgeError::database(detail.clone(), String::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, Value};

    #[tokio::test]
    async fn test_mock_client_returns_configured_result() {
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("n", "BIGINT")],
            vec![vec![Value::Int(7)]],
        );
        let mut client = MockClient::with_result(result);
        let fetched = client.execute_query("SELECT 7").await.unwrap();
        assert_eq!(fetched.row_count, 1);
        assert_eq!(fetched.rows[0][0], Value::Int(7));
    }

    #[tokio::test]
    async fn test_failing_client_echoes_sql() {
        let mut client = FailingClient::new("1146 table doesn't exist");
        let err = client.execute_query("SELECT * FROM nope").await.unwrap_err();
        match err {
            BridgeError::Database { sql, detail, .. } => {
                assert_eq!(sql, "SELECT * FROM nope");
                assert!(detail.contains("1146"));
            }
            other => panic!("expected Database error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_factory_counts_connects() {
        let factory = MockFactory::returning(QueryResult::new());
        assert_eq!(factory.connect_count(), 0);
        let config = DbConfig::default();
        let _ = factory.connect(&config).await.unwrap();
        let _ = factory.connect(&config).await.unwrap();
        assert_eq!(factory.connect_count(), 2);
    }
}
