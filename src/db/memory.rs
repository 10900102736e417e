use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::StoreError;

use super::store::{
    Direction, Document, DocumentStore, FieldValue, Query, UpdatePatch, WriteBatch, WriteOp,
};

/// In-process document store backend.
///
/// Collections are `BTreeMap`s so iteration order is stable across runs.
/// All operations take the single interior lock; there is no cross-operation
/// transaction beyond `commit`.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array/object.
/// Numbers compare numerically, strings lexicographically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn matches(doc: &Document, query: &Query) -> bool {
    query.filters.iter().all(|filter| {
        let current = doc.get(&filter.field).unwrap_or(&Value::Null);
        *current == filter.value
    })
}

fn sort_documents(docs: &mut [Document], query: &Query) {
    if query.order_by.is_empty() {
        return;
    }
    docs.sort_by(|a, b| {
        for (field, direction) in &query.order_by {
            let left = a.get(field).unwrap_or(&Value::Null);
            let right = b.get(field).unwrap_or(&Value::Null);
            let ordering = match direction {
                Direction::Ascending => compare_values(left, right),
                Direction::Descending => compare_values(right, left),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn apply_patch(doc: &mut Document, patch: &UpdatePatch) -> Result<(), StoreError> {
    for (field, op) in &patch.fields {
        match op {
            FieldValue::Set(value) => {
                doc.insert(field.clone(), value.clone());
            }
            FieldValue::Increment(delta) => {
                let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                doc.insert(field.clone(), Value::from(current + delta));
            }
            FieldValue::ArrayUnion(values) => {
                let mut array = doc
                    .get(field)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                for value in values {
                    if !array.contains(value) {
                        array.push(value.clone());
                    }
                }
                doc.insert(field.clone(), Value::Array(array));
            }
            FieldValue::ServerTimestamp => {
                doc.insert(field.clone(), serde_json::to_value(Utc::now())?);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut results: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches(doc, &query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_documents(&mut results, &query);
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: UpdatePatch,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        apply_patch(doc, &patch)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;

        // Validate every operation before touching anything. Sets earlier in
        // the batch satisfy later updates/deletes of the same document.
        let mut staged: HashSet<(String, String)> = HashSet::new();
        for (index, op) in batch.ops.iter().enumerate() {
            match op {
                WriteOp::Set { collection, id, .. } => {
                    staged.insert((collection.clone(), id.clone()));
                }
                WriteOp::Update { collection, id, .. } | WriteOp::Delete { collection, id } => {
                    let exists = collections
                        .get(collection)
                        .map(|docs| docs.contains_key(id))
                        .unwrap_or(false)
                        || staged.contains(&(collection.clone(), id.clone()));
                    if !exists {
                        return Err(StoreError::BatchFailed {
                            index,
                            reason: format!(
                                "document '{}' not found in collection '{}'",
                                id, collection
                            ),
                        });
                    }
                }
            }
        }

        for (index, op) in batch.ops.into_iter().enumerate() {
            match op {
                WriteOp::Set {
                    collection: name,
                    id,
                    doc,
                } => {
                    collections.entry(name).or_default().insert(id, doc);
                }
                WriteOp::Update {
                    collection: name,
                    id,
                    patch,
                } => {
                    let doc = collections
                        .get_mut(&name)
                        .and_then(|docs| docs.get_mut(&id))
                        .ok_or_else(|| StoreError::BatchFailed {
                            index,
                            reason: format!(
                                "document '{}' disappeared from collection '{}'",
                                id, name
                            ),
                        })?;
                    apply_patch(doc, &patch)?;
                }
                WriteOp::Delete {
                    collection: name,
                    id,
                } => {
                    if let Some(docs) = collections.get_mut(&name) {
                        docs.remove(&id);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_order_numerically_and_lexicographically() {
        assert_eq!(
            compare_values(&json!(2), &json!(10)),
            Ordering::Less,
            "numbers must not compare as strings"
        );
        assert_eq!(compare_values(&json!("abc"), &json!("abd")), Ordering::Less);
        assert_eq!(compare_values(&Value::Null, &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(false), &json!(true)), Ordering::Less);
    }

    #[test]
    fn equality_filter_treats_missing_fields_as_null() {
        let mut doc = Document::new();
        doc.insert("a".into(), json!(1));
        let query = Query::new().filter("b", Value::Null);
        assert!(matches(&doc, &query));
        let query = Query::new().filter("b", json!(1));
        assert!(!matches(&doc, &query));
    }

    #[test]
    fn increment_starts_missing_fields_at_zero() {
        let mut doc = Document::new();
        let patch = UpdatePatch::new().increment("count", 3);
        apply_patch(&mut doc, &patch).unwrap();
        assert_eq!(doc.get("count"), Some(&json!(3)));
    }

    #[test]
    fn array_union_deduplicates_by_equality() {
        let mut doc = Document::new();
        doc.insert("tags".into(), json!(["a"]));
        let patch = UpdatePatch::new().array_union("tags", vec![json!("a"), json!("b")]);
        apply_patch(&mut doc, &patch).unwrap();
        assert_eq!(doc.get("tags"), Some(&json!(["a", "b"])));
    }
}
