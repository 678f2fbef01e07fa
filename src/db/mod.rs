//! Database access layer.
//!
//! Provides a trait-based interface for query execution so the tool surface
//! and the offline generator can run against a mock backend in tests.
//!
//! Connections are deliberately not pooled: one invocation acquires one
//! connection, runs one statement, and closes it. Pooling, if desired, is an
//! external concern layered by the host environment.

mod mock;
mod mysql;
mod types;

pub use mock::{FailingClient, MockClient, MockFactory};
pub use mysql::{MySqlClient, MySqlFactory};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::DbConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement verbatim and fetches all resulting rows.
    ///
    /// The statement is not validated, sanitized, or restricted to reads;
    /// the caller is solely responsible for what it submits.
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Factory for acquiring a scoped connection.
///
/// The executor validates its configuration before calling `connect`, so a
/// factory is never invoked with incomplete credentials. Tests rely on that
/// by counting invocations on a mock factory.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Opens a fresh connection for a single invocation.
    async fn connect(&self, config: &DbConfig) -> Result<Box<dyn DatabaseClient>>;
}
