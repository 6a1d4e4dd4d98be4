//! Chunked batch ingestion.

use crate::driver::Driver;
use crate::error::Error;
use crate::schema::{resolve_columns, Introspectable};
use crate::value::{wire_field, Value};

/// Write `records` to `table` in chunks of at most `batch_size` rows.
///
/// Chunks are committed strictly in order, one batch handle per chunk. The
/// first append or send failure aborts the call with the failing chunk's
/// `[start, end)` record range; earlier chunks stay committed and later ones
/// are never attempted.
pub(crate) async fn batch_insert<R: Introspectable>(
    driver: &dyn Driver,
    table: &str,
    batch_size: usize,
    records: &[R],
) -> Result<(), Error> {
    if records.is_empty() {
        return Ok(());
    }

    let columns = resolve_columns::<R>();
    if columns.is_empty() {
        return Err(Error::Schema(format!(
            "record type resolves to no columns for table {table}"
        )));
    }
    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

    for (chunk_index, chunk) in records.chunks(batch_size).enumerate() {
        let start = chunk_index * batch_size;
        let end = start + chunk.len();

        let mut batch = driver
            .prepare_batch(table, &names)
            .await
            .map_err(|cause| Error::Ingest { start, end, cause })?;

        for record in chunk {
            let row: Vec<Value> = columns
                .iter()
                .map(|col| wire_field(record.get(col.field_index)))
                .collect();
            batch
                .append(row)
                .await
                .map_err(|cause| Error::Ingest { start, end, cause })?;
        }

        batch
            .send()
            .await
            .map_err(|cause| Error::Ingest { start, end, cause })?;

        tracing::debug!(table, start, end, "committed chunk");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;
    use crate::test_support::{metric, Metric};

    #[tokio::test]
    async fn empty_input_is_a_successful_noop() {
        let driver = MockDriver::new();
        batch_insert::<Metric>(&driver, "metrics", 10, &[])
            .await
            .unwrap();
        assert!(driver.sent_batches().is_empty());
    }

    #[tokio::test]
    async fn chunk_count_and_sizes_follow_batch_size() {
        let driver = MockDriver::new();
        let records: Vec<Metric> = (0..7).map(metric).collect();
        batch_insert(&driver, "metrics", 3, &records).await.unwrap();

        let sent = driver.sent_batches();
        let sizes: Vec<usize> = sent.iter().map(|b| b.rows.len()).collect();
        assert_eq!(sizes, [3, 3, 1]);
    }

    #[tokio::test]
    async fn exact_multiple_fills_every_chunk() {
        let driver = MockDriver::new();
        let records: Vec<Metric> = (0..6).map(metric).collect();
        batch_insert(&driver, "metrics", 3, &records).await.unwrap();

        let sizes: Vec<usize> = driver.sent_batches().iter().map(|b| b.rows.len()).collect();
        assert_eq!(sizes, [3, 3]);
    }

    #[tokio::test]
    async fn tuples_align_with_column_list() {
        let driver = MockDriver::new();
        let records = vec![metric(5)];
        batch_insert(&driver, "metrics", 10, &records).await.unwrap();

        let sent = driver.sent_batches();
        let batch = &sent[0];
        assert_eq!(batch.table, "metrics");
        assert_eq!(batch.columns.len(), 8);
        assert_eq!(batch.columns[0], "id");
        for row in &batch.rows {
            assert_eq!(row.len(), batch.columns.len());
        }
        // Index alignment: column 0 is id, column 1 the tagged device name.
        assert_eq!(batch.rows[0][0], crate::value::Value::UInt64(5));
        assert_eq!(batch.columns[1], "device_id");
    }

    #[tokio::test]
    async fn append_failure_aborts_with_chunk_range() {
        let driver = MockDriver::new();
        driver.fail_append_of_row(4); // second row of the second chunk
        let records: Vec<Metric> = (0..9).map(metric).collect();

        let err = batch_insert(&driver, "metrics", 3, &records)
            .await
            .unwrap_err();
        assert_eq!(err.chunk_range(), Some((3, 6)));
        // Only the first chunk committed.
        assert_eq!(driver.sent_batches().len(), 1);
    }
}
