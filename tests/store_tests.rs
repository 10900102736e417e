/*!
 * Document store behavior: queries, field-level updates, and the atomicity
 * guarantee of batch commits.
 */

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use clubhub::db::{Document, DocumentStore, MemoryStore, Query, UpdatePatch, WriteBatch};
use clubhub::errors::StoreError;

fn doc(value: Value) -> Document {
    value.as_object().expect("object literal").clone()
}

#[tokio::test]
async fn set_and_get_round_trip_and_overwrite() {
    let store = MemoryStore::new();
    store.set("things", "t1", doc(json!({"id": "t1", "name": "first"}))).await.unwrap();
    store.set("things", "t1", doc(json!({"id": "t1", "name": "second"}))).await.unwrap();

    let fetched = store.get("things", "t1").await.unwrap().unwrap();
    assert_eq!(fetched.get("name"), Some(&json!("second")));
    assert!(store.get("things", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn query_composes_filters_order_and_limit() {
    let store = MemoryStore::new();
    store.set("m", "a", doc(json!({"id": "a", "active": true, "points": 10}))).await.unwrap();
    store.set("m", "b", doc(json!({"id": "b", "active": true, "points": 30}))).await.unwrap();
    store.set("m", "c", doc(json!({"id": "c", "active": false, "points": 20}))).await.unwrap();

    let results = store
        .query("m", Query::new().filter("active", true).descending("points"))
        .await
        .unwrap();
    let ids: Vec<&Value> = results.iter().map(|d| d.get("id").unwrap()).collect();
    assert_eq!(ids, vec![&json!("b"), &json!("a")]);

    let top = store
        .query(
            "m",
            Query::new().filter("active", true).descending("points").limit(1),
        )
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].get("id"), Some(&json!("b")));
}

#[tokio::test]
async fn numbers_order_numerically_not_lexicographically() {
    let store = MemoryStore::new();
    store.set("m", "a", doc(json!({"id": "a", "points": 9}))).await.unwrap();
    store.set("m", "b", doc(json!({"id": "b", "points": 100}))).await.unwrap();

    let results = store.query("m", Query::new().descending("points")).await.unwrap();
    assert_eq!(results[0].get("id"), Some(&json!("b")));
}

#[tokio::test]
async fn update_applies_field_primitives() {
    let store = MemoryStore::new();
    store
        .set("m", "a", doc(json!({"id": "a", "count": 1, "tags": ["x"]})))
        .await
        .unwrap();

    let patch = UpdatePatch::new()
        .increment("count", 5)
        .array_union("tags", vec![json!("x"), json!("y")])
        .set("name", "renamed")
        .server_timestamp("updatedAt");
    store.update("m", "a", patch).await.unwrap();

    let fetched = store.get("m", "a").await.unwrap().unwrap();
    assert_eq!(fetched.get("count"), Some(&json!(6)));
    assert_eq!(fetched.get("tags"), Some(&json!(["x", "y"])));
    assert_eq!(fetched.get("name"), Some(&json!("renamed")));
    let stamped: DateTime<Utc> =
        serde_json::from_value(fetched.get("updatedAt").unwrap().clone()).unwrap();
    assert!(stamped <= Utc::now());
}

#[tokio::test]
async fn update_of_missing_document_fails_not_found() {
    let store = MemoryStore::new();
    let err = store
        .update("m", "ghost", UpdatePatch::new().set("x", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn batch_commit_applies_nothing_on_failure() {
    let store = MemoryStore::new();
    store.set("m", "a", doc(json!({"id": "a", "v": 1}))).await.unwrap();

    let mut batch = WriteBatch::new();
    batch.update("m", "a", UpdatePatch::new().set("v", 2));
    batch.update("m", "ghost", UpdatePatch::new().set("v", 2));
    let err = store.commit(batch).await.unwrap_err();
    assert!(matches!(err, StoreError::BatchFailed { index: 1, .. }));

    let fetched = store.get("m", "a").await.unwrap().unwrap();
    assert_eq!(fetched.get("v"), Some(&json!(1)), "no partial state after a failed batch");
}

#[tokio::test]
async fn batch_set_satisfies_a_later_update_of_the_same_document() {
    let store = MemoryStore::new();

    let mut batch = WriteBatch::new();
    batch.set("m", "b", doc(json!({"id": "b", "v": 1})));
    batch.update("m", "b", UpdatePatch::new().increment("v", 1));
    store.commit(batch).await.unwrap();

    let fetched = store.get("m", "b").await.unwrap().unwrap();
    assert_eq!(fetched.get("v"), Some(&json!(2)));
}

#[tokio::test]
async fn delete_removes_the_document() {
    let store = MemoryStore::new();
    store.set("m", "a", doc(json!({"id": "a"}))).await.unwrap();
    store.delete("m", "a").await.unwrap();
    assert!(store.get("m", "a").await.unwrap().is_none());

    let err = store.delete("m", "a").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}
