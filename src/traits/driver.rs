use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Binding, RawQueryResult};

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Converting Binding parameters to native types
/// - Executing statements against an already-open handle
/// - Exposing the begin/commit/rollback primitives used by transactions
///
/// The connection façade never opens or closes the underlying handle; its
/// lifetime belongs to whoever constructed the driver.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a query expected to produce rows.
    async fn query(&self, sql: &str, params: &[Binding]) -> Result<RawQueryResult>;

    /// Execute a statement, returning the number of affected rows.
    async fn execute(&self, sql: &str, params: &[Binding]) -> Result<u64>;

    /// Execute raw SQL without parameter binding, returning affected rows.
    async fn execute_raw(&self, sql: &str) -> Result<u64>;

    /// Begin a transaction scope. Nested calls open a second scope against
    /// the same handle; nesting semantics are the driver's.
    async fn begin(&self) -> Result<()>;

    /// Commit the innermost transaction scope.
    async fn commit(&self) -> Result<()>;

    /// Roll back the innermost transaction scope.
    async fn rollback(&self) -> Result<()>;
}
