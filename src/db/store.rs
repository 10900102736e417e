use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::StoreError;

/// A stored document: a flat JSON object keyed by field name. Documents carry
/// their own `id` field in addition to being addressable by id.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A single equality filter against a top-level field.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Composable query: equality filters, multi-key ordering, optional limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<F: Into<String>, V: Into<Value>>(mut self, field: F, value: V) -> Self {
        self.filters.push(Filter::eq(field, value));
        self
    }

    pub fn order_by<F: Into<String>>(mut self, field: F, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    pub fn ascending<F: Into<String>>(self, field: F) -> Self {
        self.order_by(field, Direction::Ascending)
    }

    pub fn descending<F: Into<String>>(self, field: F) -> Self {
        self.order_by(field, Direction::Descending)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Field-level write primitive applied by [`DocumentStore::update`].
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Replace the field with the given value.
    Set(Value),
    /// Add the delta to the current numeric value (missing fields count as 0).
    Increment(i64),
    /// Append the values not already present, by element equality.
    ArrayUnion(Vec<Value>),
    /// Sentinel resolved to the store's clock when the write applies.
    ServerTimestamp,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePatch {
    pub fields: Vec<(String, FieldValue)>,
}

impl UpdatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<F: Into<String>, V: Into<Value>>(mut self, field: F, value: V) -> Self {
        self.fields.push((field.into(), FieldValue::Set(value.into())));
        self
    }

    pub fn increment<F: Into<String>>(mut self, field: F, delta: i64) -> Self {
        self.fields.push((field.into(), FieldValue::Increment(delta)));
        self
    }

    pub fn array_union<F: Into<String>>(mut self, field: F, values: Vec<Value>) -> Self {
        self.fields.push((field.into(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn server_timestamp<F: Into<String>>(mut self, field: F) -> Self {
        self.fields.push((field.into(), FieldValue::ServerTimestamp));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum WriteOp {
    Set {
        collection: String,
        id: String,
        doc: Document,
    },
    Update {
        collection: String,
        id: String,
        patch: UpdatePatch,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// An ordered set of writes committed atomically: either every operation
/// applies or none do.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<C: Into<String>, I: Into<String>>(&mut self, collection: C, id: I, doc: Document) {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            doc,
        });
    }

    pub fn update<C: Into<String>, I: Into<String>>(
        &mut self,
        collection: C,
        id: I,
        patch: UpdatePatch,
    ) {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            patch,
        });
    }

    pub fn delete<C: Into<String>, I: Into<String>>(&mut self, collection: C, id: I) {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Capability surface of the managed document database. The application
/// treats the store as opaque; backends only have to honor the operation
/// contracts below.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Generate a fresh document id. Ids are minted client-side so callers
    /// can embed them in the document body before the first write.
    fn new_document_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Create or overwrite the document with the given id.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Point lookup by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Run an equality/order/limit query against one collection.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError>;

    /// Apply a field-level patch. Fails with [`StoreError::NotFound`] when the
    /// document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: UpdatePatch)
        -> Result<(), StoreError>;

    /// Physically remove a document. The application soft-deletes; this exists
    /// for tooling and tests.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Atomically commit a multi-document batch.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
