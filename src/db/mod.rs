use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{
    Direction, Document, DocumentStore, FieldValue, Filter, Query, UpdatePatch, WriteBatch,
    WriteOp,
};

/// Cheap, cloneable handle to the document store shared by every service.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Handle backed by the in-process store. The binary and the test suite
    /// run against this; a managed-cloud backend plugs in through
    /// [`Database::new`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn new_document_id(&self) -> String {
        self.store.new_document_id()
    }

    /// Serialize a model into its document shape.
    pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::InvalidDocument),
        }
    }

    /// Create or overwrite a typed document.
    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let doc = Self::to_document(value)?;
        self.store.set(collection, id, doc).await
    }

    /// Typed point lookup.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.store.get(collection, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(Value::Object(doc))?)),
            None => Ok(None),
        }
    }

    /// Typed query.
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<T>, StoreError> {
        self.store
            .query(collection, query)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(StoreError::from))
            .collect()
    }

    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: UpdatePatch,
    ) -> Result<(), StoreError> {
        self.store.update(collection, id, patch).await
    }

    pub async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.store.commit(batch).await
    }
}
