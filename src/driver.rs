//! Seam to the external store driver.
//!
//! The driver owns connections, pooling, deadlines, and the wire protocol;
//! this crate only prepares batches, executes statements, and iterates result
//! rows through these traits. All three are object safe so callers can hand
//! the client an `Arc<dyn Driver>`.

use async_trait::async_trait;

use crate::error::DriverError;
use crate::value::Value;

/// Batch-write and statement surface the store driver must expose.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Acquire a fresh batch handle scoped to one table and insert column
    /// list. Appended tuples must align positionally with `columns`.
    async fn prepare_batch(
        &self,
        table: &str,
        columns: &[String],
    ) -> Result<Box<dyn BatchHandle>, DriverError>;

    /// Execute raw DDL/DML with no result set.
    async fn exec(&self, statement: &str) -> Result<(), DriverError>;

    /// Execute a query and return its rows.
    async fn query(&self, statement: &str) -> Result<Box<dyn RowSet>, DriverError>;
}

/// Accumulator for one chunk's rows; sent as a single unit.
#[async_trait]
pub trait BatchHandle: Send {
    /// Append one row tuple, index-aligned with the prepared column list.
    async fn append(&mut self, row: Vec<Value>) -> Result<(), DriverError>;

    /// Commit every appended row as one unit. The handle must not be reused
    /// afterwards.
    async fn send(&mut self) -> Result<(), DriverError>;
}

/// Query result rows in arrival order.
#[async_trait]
pub trait RowSet: Send {
    /// Result column names, in result order.
    fn columns(&self) -> &[String];

    /// The next row's values, index-aligned with [`RowSet::columns`], or
    /// `None` once exhausted.
    async fn next_row(&mut self) -> Result<Option<Vec<Value>>, DriverError>;
}
