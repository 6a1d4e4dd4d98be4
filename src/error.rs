//! Error taxonomy for ingestion, DDL, and result mapping.

use thiserror::Error;

/// Error type produced by the external store driver.
///
/// Drivers are free to surface whatever error type they use internally; it
/// crosses the seam boxed and is carried on our errors unmodified.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by this crate.
///
/// Every variant that wraps a driver failure keeps the original cause as a
/// public field; nothing is swallowed. Value conversion has no variant here
/// because it cannot fail (see [`crate::value::wire_value`]).
#[derive(Debug, Error)]
pub enum Error {
    /// A schema precondition failed: the record type resolves to no columns,
    /// or a table spec is missing its creation-timestamp column.
    #[error("schema error: {0}")]
    Schema(String),

    /// An append or send failed while ingesting the chunk covering record
    /// indices `[start, end)`. Chunks before `start` were already committed
    /// and are not rolled back; chunks after `end` were never attempted.
    #[error("ingest failed for records [{start}, {end}): {cause}")]
    Ingest {
        start: usize,
        end: usize,
        cause: DriverError,
    },

    /// A DDL or raw statement failed to execute.
    #[error("statement execution failed: {cause}")]
    Exec { cause: DriverError },

    /// A result row could not be bound into the destination record type.
    /// Rows bound before the failure remain in the destination sequence.
    #[error("row scan failed: {cause}")]
    Scan { cause: DriverError },
}

impl Error {
    /// The `[start, end)` record range of a failed ingest chunk, if any.
    pub fn chunk_range(&self) -> Option<(usize, usize)> {
        match self {
            Error::Ingest { start, end, .. } => Some((*start, *end)),
            _ => None,
        }
    }
}
