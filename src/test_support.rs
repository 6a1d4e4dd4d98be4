//! Shared record fixtures for unit and integration tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::schema::{FieldDef, Introspectable};
use crate::value::{BindError, Value};

/// Nested row type carried inside a [`Metric`] record array.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sample {
    pub offset_ms: u64,
    pub reading: f64,
}

static SAMPLE_FIELDS: [FieldDef; 2] = [FieldDef::new("offset_ms"), FieldDef::new("reading")];

impl Introspectable for Sample {
    fn fields() -> &'static [FieldDef] {
        &SAMPLE_FIELDS
    }

    fn get(&self, index: usize) -> Value {
        match index {
            0 => self.offset_ms.into(),
            1 => self.reading.into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<(), BindError> {
        match index {
            0 => self.offset_ms = value.try_u64()?,
            1 => self.reading = value.try_f64()?,
            _ => {}
        }
        Ok(())
    }
}

/// Fixture exercising every name-resolution rule at once: a storage name, a
/// serialization name, lower-cased fallbacks, an optional, a scalar sequence,
/// a nested record array, and an excluded field.
#[derive(Debug, Clone, Default)]
pub(crate) struct Metric {
    pub id: u64,
    pub device: String,
    pub label: String,
    pub reading: f64,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub samples: Vec<Sample>,
    pub created_at: DateTime<Utc>,
    pub internal_seq: u64,
}

static METRIC_FIELDS: [FieldDef; 9] = [
    FieldDef::new("id"),
    FieldDef::new("device").stored_as("device_id"),
    FieldDef::new("label").serialized_as("metric_label"),
    FieldDef::new("reading"),
    FieldDef::new("note"),
    FieldDef::new("tags"),
    FieldDef::new("samples"),
    FieldDef::new("created_at"),
    FieldDef::new("internal_seq").excluded(),
];

impl Introspectable for Metric {
    fn fields() -> &'static [FieldDef] {
        &METRIC_FIELDS
    }

    fn get(&self, index: usize) -> Value {
        match index {
            0 => self.id.into(),
            1 => self.device.clone().into(),
            2 => self.label.clone().into(),
            3 => self.reading.into(),
            4 => self.note.clone().into(),
            5 => self.tags.clone().into(),
            6 => Value::nested(&self.samples),
            7 => self.created_at.into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<(), BindError> {
        match index {
            0 => self.id = value.try_u64()?,
            1 => self.device = value.try_text()?,
            2 => self.label = value.try_text()?,
            3 => self.reading = value.try_f64()?,
            4 => {
                self.note = match value {
                    Value::Null => None,
                    other => Some(other.try_text()?),
                }
            }
            // Array columns are ingest-only on this fixture; a scan that
            // routes one here is a wiring mistake and must not pass silently.
            5 | 6 => return Err(BindError::mismatch("scalar", &value)),
            7 => self.created_at = value.try_datetime()?,
            _ => {}
        }
        Ok(())
    }
}

/// Minimal scan destination: only `id` and `name` columns resolve.
#[derive(Debug, Clone, Default)]
pub(crate) struct User {
    pub id: u64,
    pub name: String,
}

static USER_FIELDS: [FieldDef; 2] = [FieldDef::new("id"), FieldDef::new("name")];

impl Introspectable for User {
    fn fields() -> &'static [FieldDef] {
        &USER_FIELDS
    }

    fn get(&self, index: usize) -> Value {
        match index {
            0 => self.id.into(),
            1 => self.name.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<(), BindError> {
        match index {
            0 => self.id = value.try_u64()?,
            1 => self.name = value.try_text()?,
            _ => {}
        }
        Ok(())
    }
}

/// Build a deterministic `Metric` for ingest tests.
pub(crate) fn metric(i: u64) -> Metric {
    Metric {
        id: i,
        device: format!("device_{i}"),
        label: format!("metric_{i}"),
        reading: i as f64 * 0.5,
        note: if i % 2 == 0 {
            Some(format!("note {i}"))
        } else {
            None
        },
        tags: vec!["env:test".to_string()],
        samples: vec![Sample {
            offset_ms: i * 10,
            reading: i as f64,
        }],
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        internal_seq: i + 1_000_000,
    }
}

mod tests {
    use super::*;

    #[test]
    fn metric_rejects_binding_into_array_fields() {
        let mut record = Metric::default();
        for index in [5, 6] {
            let err = record
                .set(index, Value::Seq(vec![Value::UInt64(1)]))
                .expect_err("array field accepted a bind");
            assert!(err.to_string().contains("cannot bind"));
        }
    }
}
