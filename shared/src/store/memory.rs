use super::{record_key, Collection, FieldAssignment, Precondition, Record, RecordStore, Result};
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde_json::Value;
use std::sync::Arc;

/// An in-memory store for testing and local runs
///
/// Records are keyed by `(table, key)`. Updates run under the entry's shard
/// lock, so they are atomic per key just like a DynamoDB `UpdateItem`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<(String, String), Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all tables
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn slot(collection: &Collection, key: &str) -> (String, String) {
    (collection.table_name.clone(), key.to_string())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &Collection, key: &str) -> Result<Option<Record>> {
        Ok(self
            .records
            .get(&slot(collection, key))
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, collection: &Collection, record: Record) -> Result<()> {
        let key = record_key(collection, &record)?;
        self.records.insert(slot(collection, &key), record);
        Ok(())
    }

    async fn update(
        &self,
        collection: &Collection,
        key: &str,
        assignments: &[FieldAssignment],
        precondition: Precondition,
    ) -> Result<Record> {
        let mut record = match self.records.entry(slot(collection, key)) {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(_) if precondition == Precondition::KeyExists => {
                return Err(StoreError::ConditionFailed)
            }
            Entry::Vacant(entry) => {
                let mut fresh = Record::new();
                fresh.insert(
                    collection.key_attribute.clone(),
                    Value::String(key.to_string()),
                );
                entry.insert(fresh)
            }
        };

        for assignment in assignments {
            record.insert(assignment.field.clone(), assignment.value.clone());
        }
        Ok(record.value().clone())
    }

    async fn delete(&self, collection: &Collection, key: &str) -> Result<()> {
        self.records.remove(&slot(collection, key));
        Ok(())
    }

    async fn scan_all(&self, collection: &Collection) -> Result<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.key().0 == collection.table_name)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Collection {
        Collection::new("items", "itemId")
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryStore::new();
        store
            .put(&items(), record(json!({"itemId": "a", "name": "Lamp"})))
            .await
            .unwrap();

        let found = store.get(&items(), "a").await.unwrap().unwrap();
        assert_eq!(found.get("name"), Some(&json!("Lamp")));

        store.delete(&items(), "a").await.unwrap();
        assert!(store.get(&items(), "a").await.unwrap().is_none());
        // absent key
        store.delete(&items(), "a").await.unwrap();
    }

    #[tokio::test]
    async fn put_requires_key_attribute() {
        let store = MemoryStore::new();
        let err = store
            .put(&items(), record(json!({"name": "Lamp"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn conditional_update_on_missing_key_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(
                &items(),
                "ghost",
                &[FieldAssignment::new("name", json!("x"))],
                Precondition::KeyExists,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ConditionFailed));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unconditional_update_creates_record() {
        let store = MemoryStore::new();
        let updated = store
            .update(
                &items(),
                "new",
                &[FieldAssignment::new("price", json!(4))],
                Precondition::None,
            )
            .await
            .unwrap();

        assert_eq!(updated, record(json!({"itemId": "new", "price": 4})));
    }

    #[tokio::test]
    async fn scan_is_scoped_to_table() {
        let store = MemoryStore::new();
        let users = Collection::new("users", "userId");
        store
            .put(&users, record(json!({"userId": "u1"})))
            .await
            .unwrap();
        store
            .put(&items(), record(json!({"itemId": "i1"})))
            .await
            .unwrap();

        let scanned = store.scan_all(&users).await.unwrap();
        assert_eq!(scanned, vec![record(json!({"userId": "u1"}))]);
        assert_eq!(store.len(), 2);
    }
}
