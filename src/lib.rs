//! Schema-driven batch ingestion and table provisioning for ClickHouse-style
//! columnar stores.
//!
//! Record types declare their shape once through [`schema::Introspectable`];
//! the [`client::Client`] converts field values (including nested record
//! arrays) into wire form, writes them in size-bounded ordered batches
//! through an external [`driver::Driver`], provisions replicated and
//! distributed table variants from a [`ddl::TableSpec`], and binds query
//! result rows back into typed records.
//!
//! The store driver itself — connections, pooling, deadlines, the wire
//! protocol — stays behind the [`driver`] traits and is supplied by the
//! caller.

// Public API
pub mod client;
pub mod ddl;
pub mod driver;
pub mod error;
pub mod schema;
pub mod value;

// Internal modules
mod config;
mod ingest;
mod scan;

pub use client::{last_client, Client, ClientArgs, ClientArgsBuilder};
pub use config::DEFAULT_BATCH_SIZE;
pub use ddl::{TableSpec, TableSpecBuilder};
pub use error::{DriverError, Error};
pub use schema::{resolve_columns, Column, FieldDef, Introspectable};
pub use value::Value;


#[cfg(test)]
mod test_support;
