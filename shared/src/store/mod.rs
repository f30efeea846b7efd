//! Key-value store abstraction over the two collections
//!
//! Handlers only see [`RecordStore`]. The DynamoDB backend is used in
//! production; the in-memory backend serves tests and local runs.

mod conversions;
mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// A raw stored record
pub type Record = serde_json::Map<String, Value>;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A table and the name of its partition key attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub table_name: String,
    pub key_attribute: String,
}

impl Collection {
    pub fn new(table_name: impl Into<String>, key_attribute: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_attribute: key_attribute.into(),
        }
    }
}

/// One `SET field = value` assignment of an update
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    pub field: String,
    pub value: Value,
}

impl FieldAssignment {
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Condition an update must satisfy at apply time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    None,
    /// Fail with [`StoreError::ConditionFailed`] instead of creating the record
    KeyExists,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by key; `None` when absent
    async fn get(&self, collection: &Collection, key: &str) -> Result<Option<Record>>;

    /// Unconditional upsert. The key is read from the record itself.
    async fn put(&self, collection: &Collection, record: Record) -> Result<()>;

    /// Apply `assignments` atomically and return the record as stored afterwards
    async fn update(
        &self,
        collection: &Collection,
        key: &str,
        assignments: &[FieldAssignment],
        precondition: Precondition,
    ) -> Result<Record>;

    /// Unconditional delete; deleting an absent key succeeds
    async fn delete(&self, collection: &Collection, key: &str) -> Result<()>;

    /// Every record in the collection, in one result
    async fn scan_all(&self, collection: &Collection) -> Result<Vec<Record>>;
}

/// Extract the key string a record is stored under
pub(crate) fn record_key(collection: &Collection, record: &Record) -> Result<String> {
    match record.get(&collection.key_attribute) {
        Some(Value::String(key)) if !key.is_empty() => Ok(key.clone()),
        _ => Err(StoreError::Backend(format!(
            "record is missing key attribute {}",
            collection.key_attribute
        ))),
    }
}
