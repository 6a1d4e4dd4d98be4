//! DDL text generation for replicated and distributed table variants.
//!
//! Builders are pure: they produce statement text and validate the spec, and
//! [`crate::client::Client`] issues the statements. Every statement uses
//! IF NOT EXISTS semantics, so provisioning is safe to rerun.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::config::{INDEX_GRANULARITY, REPLICA_PATH_PREFIX};
use crate::error::Error;
use crate::schema::Column;

/// Declaration of one sharded, replicated table and its distributed variant.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct TableSpec {
    pub database: String,
    pub table: String,
    /// Cluster name for ON CLUSTER and Distributed fan-out.
    pub cluster: String,
    /// Caller's ordering key expression; combined with a deterministic hash
    /// of the creation timestamp in ORDER BY.
    pub order_by: String,
    /// The creation-timestamp column used for partitioning and sampling.
    /// Must appear in `columns` for the clustered variant.
    #[builder(default = "String::from(\"created_at\")")]
    pub created_at_column: String,
    pub columns: Vec<Column>,
    #[builder(default)]
    pub description: String,
    /// Coordination path prefix for the ReplicatedMergeTree engine.
    #[builder(default = "String::from(REPLICA_PATH_PREFIX)")]
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

fn default_path_prefix() -> String {
    String::from(REPLICA_PATH_PREFIX)
}

/// CREATE DATABASE statement, cluster-wide, create-if-absent.
pub fn database_ddl(spec: &TableSpec) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} ON CLUSTER {}",
        spec.database, spec.cluster
    )
}

/// CREATE TABLE statement for the ReplicatedMergeTree variant.
///
/// Partitioned by month of the creation-timestamp column; ordered by the
/// caller's key plus `intHash64` of the creation timestamp, which also backs
/// SAMPLE BY for reproducible sampling.
pub fn clustered_table_ddl(spec: &TableSpec) -> Result<String, Error> {
    let created_at = &spec.created_at_column;
    if !spec.columns.iter().any(|col| &col.name == created_at) {
        return Err(Error::Schema(format!(
            "column {created_at} is required for table {}.{}",
            spec.database, spec.table
        )));
    }

    let mut stmt = format!(
        "CREATE TABLE IF NOT EXISTS {}.{} ON CLUSTER {} (\n",
        spec.database, spec.table, spec.cluster
    );
    push_column_list(&mut stmt, &spec.columns);
    stmt.push_str(&format!(
        "\n)\nENGINE = ReplicatedMergeTree('{}/{}/{{shard}}/{}', '{{replica}}')\n",
        spec.path_prefix, spec.database, spec.table
    ));
    stmt.push_str(&format!("PARTITION BY toYYYYMM({created_at})\n"));
    stmt.push_str(&format!(
        "ORDER BY ({}, intHash64({created_at}))\n",
        spec.order_by
    ));
    stmt.push_str(&format!("SAMPLE BY intHash64({created_at})\n"));
    stmt.push_str(&format!("SETTINGS index_granularity = {INDEX_GRANULARITY}\n"));
    stmt.push_str(&format!("COMMENT '{}';", spec.description));

    Ok(stmt)
}

/// CREATE TABLE statement for the Distributed variant, named
/// `<table>_distributed`, fanning out to the clustered table.
pub fn distributed_table_ddl(spec: &TableSpec) -> Result<String, Error> {
    if spec.columns.is_empty() {
        return Err(Error::Schema(format!(
            "columns must be provided for table {}.{}_distributed",
            spec.database, spec.table
        )));
    }

    let mut stmt = format!(
        "CREATE TABLE IF NOT EXISTS {}.{}_distributed ON CLUSTER {} (\n",
        spec.database, spec.table, spec.cluster
    );
    push_column_list(&mut stmt, &spec.columns);
    stmt.push_str(&format!(
        "\n)\nENGINE = Distributed('{}', '{}', '{}')\n",
        spec.cluster, spec.database, spec.table
    ));
    stmt.push_str(&format!("COMMENT '{}';", spec.description));

    Ok(stmt)
}

fn push_column_list(stmt: &mut String, columns: &[Column]) {
    for (i, col) in columns.iter().enumerate() {
        stmt.push_str(&format!("  {} {}", col.name, col.type_text));
        if i < columns.len() - 1 {
            stmt.push_str(",\n");
        }
    }
}
