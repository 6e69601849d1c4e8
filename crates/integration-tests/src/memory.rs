//! In-memory fakes for the document store and image bucket.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};

use kicks_api::storage::{ObjectStorage, StorageError};
use kicks_api::store::{DocumentStore, StoreError};

/// In-memory document store.
///
/// Counts every trait call so tests can assert that rejected requests never
/// touch the data layer.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    /// Seed a document directly, bypassing the call counter.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a JSON object.
    pub fn insert(&self, collection: &str, id: &str, value: Value) {
        let Value::Object(fields) = value else {
            panic!("seeded document must be a JSON object");
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Read a document directly, bypassing the call counter.
    #[must_use]
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Value::Object(fields.clone()))
    }

    /// Document ids in a collection, in key order.
    #[must_use]
    pub fn ids(&self, collection: &str) -> Vec<String> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of store operations the routes have performed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.record_call();
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.record_call();
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.record_call();
        if let Some(docs) = self.collections.lock().unwrap().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.record_call();
        self.document(collection, id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.record_call();
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.values().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn query_prefix(
        &self,
        collection: &str,
        field: &str,
        prefix: &str,
    ) -> Result<Vec<Value>, StoreError> {
        self.record_call();
        let upper = format!("{prefix}z");
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|fields| {
                        fields
                            .get(field)
                            .and_then(Value::as_str)
                            .is_some_and(|s| s >= prefix && s <= upper.as_str())
                    })
                    .cloned()
                    .map(Value::Object)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// One object held by [`MemoryStorage`].
#[derive(Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Bytes,
}

/// In-memory object storage with production-shaped URLs.
pub struct MemoryStorage {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// Names of all stored objects, in name order.
    #[must_use]
    pub fn object_names(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Fetch a stored object by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(
            name.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(name);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o/{name}?alt=media",
            self.bucket
        )
    }

    async fn signed_url(&self, name: &str, _ttl: Duration) -> Result<String, StorageError> {
        Ok(format!("{}&X-Goog-Signature=test", self.public_url(name)))
    }
}
