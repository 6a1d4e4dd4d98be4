//! Static record descriptors and column-name resolution.
//!
//! A record type declares its shape once, as an ordered list of
//! [`FieldDef`]s, instead of being inspected at every call. Ingestion and
//! result mapping both resolve columns from the same list, so the positional
//! alignment between a column list and a record's value tuple cannot drift.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::value::{BindError, Value};

/// One declared field of a record type.
///
/// Built in `const` position so descriptor lists can live in statics:
///
/// ```
/// use clickhouse_ingest::schema::FieldDef;
///
/// static FIELDS: [FieldDef; 2] = [
///     FieldDef::new("id"),
///     FieldDef::new("device").stored_as("device_id"),
/// ];
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Declared field name; its lower-cased form is the fallback column name.
    pub name: &'static str,
    /// Explicit storage column name; highest resolution precedence.
    pub store_name: Option<&'static str>,
    /// Serialization name; used when no storage name is declared.
    pub wire_name: Option<&'static str>,
    /// An excluded field is skipped entirely and consumes no column slot.
    pub skip: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            store_name: None,
            wire_name: None,
            skip: false,
        }
    }

    pub const fn stored_as(mut self, name: &'static str) -> Self {
        self.store_name = Some(name);
        self
    }

    pub const fn serialized_as(mut self, name: &'static str) -> Self {
        self.wire_name = Some(name);
        self
    }

    pub const fn excluded(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Resolved column name: storage name, else serialization name, else the
    /// lower-cased field name.
    pub fn column_name(&self) -> Cow<'static, str> {
        if let Some(name) = self.store_name {
            return Cow::Borrowed(name);
        }
        if let Some(name) = self.wire_name {
            return Cow::Borrowed(name);
        }
        if self.name.chars().all(|c| c.is_ascii_lowercase() || !c.is_ascii_alphabetic()) {
            Cow::Borrowed(self.name)
        } else {
            Cow::Owned(self.name.to_ascii_lowercase())
        }
    }
}

/// Capability for record types that can be ingested and scanned.
///
/// Implementations declare their fields once; `get` and `set` address fields
/// by position in [`Introspectable::fields`]. Excluded fields are never
/// addressed through either accessor.
pub trait Introspectable {
    /// Ordered field declarations for this record type.
    fn fields() -> &'static [FieldDef];

    /// The value of the field at `index` (position in [`Self::fields`]).
    fn get(&self, index: usize) -> Value;

    /// Bind a result value into the field at `index`.
    fn set(&mut self, index: usize, value: Value) -> Result<(), BindError>;
}

/// A resolved column: the field it came from and its store-side name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Index into [`Introspectable::fields`] of the originating field.
    pub field_index: usize,
    pub name: String,
}

/// A declared column for DDL: name plus an opaque store type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
        }
    }
}

/// Resolve the ordered column list for a record type.
///
/// Excluded fields are dropped without consuming a column slot. Resolution is
/// recomputed per call rather than cached per type; descriptor lists are
/// static, so this is a handful of small allocations.
pub fn resolve_columns<R: Introspectable>() -> Vec<ColumnRef> {
    R::fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.skip)
        .map(|(field_index, field)| ColumnRef {
            field_index,
            name: field.column_name().into_owned(),
        })
        .collect()
}
