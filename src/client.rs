//! Client handle tying ingestion, DDL, and result mapping to one driver.

use std::sync::{Arc, RwLock};

use derive_builder::Builder;

use crate::config::DEFAULT_BATCH_SIZE;
use crate::ddl::{self, TableSpec};
use crate::driver::{Driver, RowSet};
use crate::error::Error;
use crate::ingest;
use crate::scan;
use crate::schema::Introspectable;

/// Construction arguments for [`Client`].
#[derive(Builder)]
#[builder(pattern = "owned", build_fn(validate = "Self::validate"))]
pub struct ClientArgs {
    /// The external store driver all calls go through.
    pub driver: Arc<dyn Driver>,
    /// Maximum records per batch send; must be positive.
    #[builder(default = "DEFAULT_BATCH_SIZE")]
    pub batch_size: usize,
}

impl ClientArgsBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == Some(0) {
            return Err("batch size must be a positive integer".to_string());
        }
        Ok(())
    }
}

/// Handle over one store driver.
///
/// All operations run to completion within the caller's task: no internal
/// spawning, retries, or timeouts. Concurrency and deadlines belong to the
/// driver underneath.
#[derive(Clone)]
pub struct Client {
    driver: Arc<dyn Driver>,
    batch_size: usize,
}

static LAST_CLIENT: RwLock<Option<Client>> = RwLock::new(None);

impl Client {
    /// Construct a client and remember it as the process-wide
    /// [`last_client`] convenience alias.
    pub fn new(args: ClientArgs) -> Self {
        let client = Self {
            driver: args.driver,
            batch_size: args.batch_size,
        };
        let mut alias = LAST_CLIENT.write().unwrap_or_else(|e| e.into_inner());
        *alias = Some(client.clone());
        client
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Write `records` to `table` in chunks of at most the configured batch
    /// size, strictly in order, one driver batch per chunk.
    ///
    /// There is no cross-chunk transaction: when a chunk fails, the returned
    /// [`Error::Ingest`] names its `[start, end)` record range, chunks before
    /// it stay committed, and chunks after it are never sent. Callers that
    /// retry the whole call must account for the already-committed prefix.
    pub async fn batch_insert<R: Introspectable>(
        &self,
        table: &str,
        records: &[R],
    ) -> Result<(), Error> {
        ingest::batch_insert(self.driver.as_ref(), table, self.batch_size, records).await
    }

    /// Provision the ReplicatedMergeTree table described by `spec`,
    /// creating its database first. Idempotent at the DDL level.
    pub async fn create_clustered_table(&self, spec: &TableSpec) -> Result<(), Error> {
        let stmt = ddl::clustered_table_ddl(spec)?;
        self.exec(&ddl::database_ddl(spec)).await?;
        self.exec(&stmt).await?;
        tracing::info!(
            database = %spec.database,
            table = %spec.table,
            cluster = %spec.cluster,
            "provisioned clustered table"
        );
        Ok(())
    }

    /// Provision the Distributed variant of `spec`'s table, creating its
    /// database first. Idempotent at the DDL level.
    pub async fn create_distributed_table(&self, spec: &TableSpec) -> Result<(), Error> {
        let stmt = ddl::distributed_table_ddl(spec)?;
        self.exec(&ddl::database_ddl(spec)).await?;
        self.exec(&stmt).await?;
        tracing::info!(
            database = %spec.database,
            table = %spec.table,
            cluster = %spec.cluster,
            "provisioned distributed table"
        );
        Ok(())
    }

    /// Execute a raw DDL/DML statement through the driver.
    pub async fn exec(&self, statement: &str) -> Result<(), Error> {
        self.driver
            .exec(statement)
            .await
            .map_err(|cause| Error::Exec { cause })
    }

    /// Run `statement` and return its raw rows.
    pub async fn query(&self, statement: &str) -> Result<Box<dyn RowSet>, Error> {
        self.driver
            .query(statement)
            .await
            .map_err(|cause| Error::Exec { cause })
    }

    /// Run `statement` and bind every result row into `dest`.
    ///
    /// Partial results are visible: on a row failure, the records bound
    /// before it remain in `dest` alongside the returned error.
    pub async fn query_into<R>(&self, dest: &mut Vec<R>, statement: &str) -> Result<(), Error>
    where
        R: Introspectable + Default,
    {
        let mut rows = self.query(statement).await?;
        scan::scan_rows(dest, rows.as_mut()).await
    }

    /// Count rows in `table`, optionally filtered by `where_clause`.
    pub async fn count(&self, table: &str, where_clause: Option<&str>) -> Result<u64, Error> {
        let statement = match where_clause {
            Some(clause) => format!("SELECT COUNT(*) FROM {table} WHERE {clause}"),
            None => format!("SELECT COUNT(*) FROM {table}"),
        };
        let mut rows = self.query(&statement).await?;
        let row = rows
            .next_row()
            .await
            .map_err(|cause| Error::Scan { cause })?;
        let value = row
            .and_then(|mut values| {
                if values.is_empty() {
                    None
                } else {
                    Some(values.remove(0))
                }
            })
            .ok_or_else(|| Error::Scan {
                cause: "count query returned no rows".into(),
            })?;
        value.try_u64().map_err(|err| Error::Scan {
            cause: Box::new(err),
        })
    }
}

/// The most recently constructed [`Client`], last writer wins.
///
/// Convenience binding only: prefer threading the handle returned by
/// [`Client::new`] through call sites.
pub fn last_client() -> Option<Client> {
    LAST_CLIENT
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}
