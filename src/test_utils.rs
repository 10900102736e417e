//! Shared fixtures for the integration tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::db::{
    Database, Document, DocumentStore, MemoryStore, Query, UpdatePatch, WriteBatch, WriteOp,
};
use crate::errors::StoreError;
use crate::models::{CreateDepartment, CreateMember, Department, Member};
use crate::services::{DepartmentService, MemberService};

/// A fresh in-memory database plus the constructed services, the way the
/// binary wires them at startup.
pub struct TestContext {
    pub db: Database,
    pub departments: DepartmentService,
    pub members: MemberService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let db = Database::new(store);
        let departments = DepartmentService::new(db.clone());
        let members = MemberService::new(db.clone(), departments.clone());
        Self {
            db,
            departments,
            members,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            club_name: "Test Club".to_string(),
            admin_email: "admin@club.test".to_string(),
            seed_sample_data: false,
        }
    }

    pub async fn create_department(&self, code: &str, name: &str) -> Department {
        self.departments
            .create_department(CreateDepartment {
                code: code.to_string(),
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .expect("create department")
    }

    pub async fn create_member(&self, name: &str, email: &str, department: &str) -> Member {
        self.members
            .create_member(CreateMember {
                full_name: name.to_string(),
                email: email.to_string(),
                department: (!department.is_empty()).then(|| department.to_string()),
                ..Default::default()
            })
            .await
            .expect("create member")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Store wrapper that rejects every write touching one collection. Reads pass
/// through, so failure-path tests can still inspect state.
pub struct FailingStore {
    inner: MemoryStore,
    fail_collection: String,
}

impl FailingStore {
    pub fn failing_writes_to<S: Into<String>>(collection: S) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_collection: collection.into(),
        }
    }

    fn reject(&self, collection: &str) -> Result<(), StoreError> {
        if collection == self.fail_collection {
            return Err(StoreError::Unavailable(format!(
                "writes to '{}' are disabled",
                collection
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        self.reject(collection)?;
        self.inner.set(collection, id, doc).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        self.inner.query(collection, query).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: UpdatePatch,
    ) -> Result<(), StoreError> {
        self.reject(collection)?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.reject(collection)?;
        self.inner.delete(collection, id).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        for op in &batch.ops {
            let collection = match op {
                WriteOp::Set { collection, .. }
                | WriteOp::Update { collection, .. }
                | WriteOp::Delete { collection, .. } => collection,
            };
            self.reject(collection)?;
        }
        self.inner.commit(batch).await
    }
}
