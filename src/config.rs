//! Configuration constants for the ingestion layer
//!
//! This module centralizes the tunable parameters used throughout the crate.

/// Default number of records per batch send
///
/// Columnar stores amortize write overhead across a batch; 1000 rows keeps
/// individual sends small enough to fail fast while staying well above the
/// point of diminishing returns for insert throughput.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// ZooKeeper path prefix for ReplicatedMergeTree shard/replica coordination
///
/// The full path template is `<prefix>/<database>/{shard}/<table>`, which
/// the server expands per shard and replica.
pub const REPLICA_PATH_PREFIX: &str = "/clickhouse/tables";

/// Index granularity for MergeTree-family tables
pub const INDEX_GRANULARITY: u32 = 8192;
