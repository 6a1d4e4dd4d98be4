//! Binding query result rows into typed records.

use crate::driver::RowSet;
use crate::error::Error;
use crate::schema::{resolve_columns, Introspectable};

/// Bind every row of `rows` into `dest`, in arrival order.
///
/// Result columns are matched against the destination type's resolved column
/// names; unmatched result columns are discarded and unmatched destination
/// fields keep their default value. Each record is pushed as soon as its row
/// binds, so on a bind failure the records bound before it remain in `dest`
/// and the error is returned without touching later rows.
pub(crate) async fn scan_rows<R>(dest: &mut Vec<R>, rows: &mut dyn RowSet) -> Result<(), Error>
where
    R: Introspectable + Default,
{
    let columns = resolve_columns::<R>();
    // Per result column: the destination field index, or None to discard.
    let targets: Vec<Option<usize>> = rows
        .columns()
        .iter()
        .map(|name| {
            columns
                .iter()
                .find(|col| &col.name == name)
                .map(|col| col.field_index)
        })
        .collect();

    loop {
        let row = rows
            .next_row()
            .await
            .map_err(|cause| Error::Scan { cause })?;
        let Some(values) = row else {
            break;
        };

        let mut record = R::default();
        for (value, target) in values.into_iter().zip(&targets) {
            if let Some(field_index) = *target {
                record
                    .set(field_index, value)
                    .map_err(|err| Error::Scan {
                        cause: Box::new(err),
                    })?;
            }
        }
        dest.push(record);
    }

    Ok(())
}
