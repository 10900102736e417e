use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::collections;
use crate::db::{Database, Query, UpdatePatch};
use crate::errors::{DepartmentError, StoreError};
use crate::models::{
    CounterCorrection, CreateDepartment, Department, DepartmentLeadership, DepartmentMemberStats,
    DepartmentProjectStats, DepartmentStats, Member, MemberListOptions, MemberPage, Project,
    UpdateDepartment, ValidationReport,
};

/// CRUD and aggregate statistics over department records. Owns the
/// denormalized member-counter update path used by the member service.
#[derive(Clone)]
pub struct DepartmentService {
    db: Database,
    collection: &'static str,
}

impl DepartmentService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            collection: collections::DEPARTMENTS,
        }
    }

    /// Create a department with a generated id and zeroed counters. The code
    /// is stored uppercased. There is no uniqueness check on the code; two
    /// concurrent calls can create duplicates.
    pub async fn create_department(
        &self,
        data: CreateDepartment,
    ) -> Result<Department, DepartmentError> {
        let report = Self::validate(&data);
        if !report.is_valid {
            return Err(DepartmentError::ValidationFailed {
                errors: report.errors,
            });
        }

        let now = Utc::now();
        let department = Department {
            id: self.db.new_document_id(),
            code: data.code.to_uppercase(),
            name: data.name,
            description: data.description.unwrap_or_default(),
            color: data.color.unwrap_or_else(|| "#3B82F6".to_string()),
            icon: data.icon.unwrap_or_else(|| "fa-building".to_string()),
            head: data.head,
            vice_head: data.vice_head,
            advisors: data.advisors.unwrap_or_default(),
            total_members: 0,
            active_projects: 0,
            completed_projects: 0,
            max_members: data.max_members.unwrap_or(30),
            requirements: data.requirements.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            created_by: data.created_by.unwrap_or_else(|| "system".to_string()),
            is_active: true,
            order: data.order.unwrap_or(0),
            deleted_at: None,
        };

        self.db
            .put(self.collection, &department.id, &department)
            .await?;
        info!(code = %department.code, name = %department.name, "department created");
        Ok(department)
    }

    /// Point lookup; fails when the department is absent or inactive.
    pub async fn get_department(&self, id: &str) -> Result<Department, DepartmentError> {
        let department: Department = self
            .db
            .fetch(self.collection, id)
            .await?
            .ok_or_else(|| DepartmentError::not_found_by_id(id))?;
        if !department.is_active {
            return Err(DepartmentError::not_found_by_id(id));
        }
        Ok(department)
    }

    pub async fn get_department_by_code(&self, code: &str) -> Result<Department, DepartmentError> {
        let mut results: Vec<Department> = self
            .db
            .find(
                self.collection,
                Query::new()
                    .filter("code", code.to_uppercase())
                    .filter("isActive", true)
                    .limit(1),
            )
            .await?;
        results
            .pop()
            .ok_or_else(|| DepartmentError::not_found_by_code(code))
    }

    /// Lookup by code regardless of the active flag; counter adjustments must
    /// still reach soft-deleted departments.
    pub(crate) async fn find_by_code_unfiltered(
        &self,
        code: &str,
    ) -> Result<Option<Department>, DepartmentError> {
        let mut results: Vec<Department> = self
            .db
            .find(
                self.collection,
                Query::new().filter("code", code.to_uppercase()).limit(1),
            )
            .await?;
        Ok(results.pop())
    }

    pub async fn update_department(
        &self,
        id: &str,
        updates: UpdateDepartment,
    ) -> Result<(), DepartmentError> {
        let patch = updates.to_patch().server_timestamp("updatedAt");
        self.db
            .update(self.collection, id, patch)
            .await
            .map_err(|err| self.map_not_found(err, id))?;
        info!(department = %id, "department updated");
        Ok(())
    }

    /// Soft delete. Members keep their department code; nothing cascades.
    pub async fn delete_department(&self, id: &str) -> Result<(), DepartmentError> {
        let patch = UpdatePatch::new()
            .set("isActive", false)
            .server_timestamp("deletedAt")
            .server_timestamp("updatedAt");
        self.db
            .update(self.collection, id, patch)
            .await
            .map_err(|err| self.map_not_found(err, id))?;
        info!(department = %id, "department soft deleted");
        Ok(())
    }

    pub async fn get_all_departments(&self) -> Result<Vec<Department>, DepartmentError> {
        let departments = self
            .db
            .find(
                self.collection,
                Query::new()
                    .filter("isActive", true)
                    .ascending("order")
                    .ascending("code"),
            )
            .await?;
        Ok(departments)
    }

    pub async fn get_active_departments(&self) -> Result<Vec<Department>, DepartmentError> {
        let departments = self
            .db
            .find(
                self.collection,
                Query::new().filter("isActive", true).ascending("name"),
            )
            .await?;
        Ok(departments)
    }

    /// Filtered, paginated member listing for one department. Same paging
    /// envelope as the member service's listing.
    pub async fn get_department_members(
        &self,
        code: &str,
        options: MemberListOptions,
    ) -> Result<MemberPage, DepartmentError> {
        let mut query = Query::new()
            .filter("department", code)
            .filter("isDeleted", false);
        if let Some(status) = options.status {
            query = query.filter("status", status.to_string());
        }
        if let Some(role) = &options.role {
            query = query.filter("role", role.clone());
        }
        query = query.descending("joinDate");

        let members: Vec<Member> = self.db.find(collections::MEMBERS, query).await?;
        Ok(super::paginate(members, options.page, options.limit))
    }

    /// Compose member and project breakdowns for one department. Each
    /// sub-stat fails soft to zeroed defaults; only the department lookup
    /// itself is loud.
    pub async fn get_department_stats(
        &self,
        code: &str,
    ) -> Result<DepartmentStats, DepartmentError> {
        let department = self.get_department_by_code(code).await?;

        let members = match self.department_member_stats(&department.code).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(code = %department.code, error = %err, "member stats unavailable, reporting zeroes");
                DepartmentMemberStats::default()
            }
        };

        let projects = match self.department_project_stats(&department.code).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(code = %department.code, error = %err, "project stats unavailable, reporting zeroes");
                DepartmentProjectStats::default()
            }
        };

        Ok(DepartmentStats {
            department,
            members,
            projects,
        })
    }

    /// Sequential fan-out of [`get_department_stats`] over every active
    /// department.
    ///
    /// [`get_department_stats`]: DepartmentService::get_department_stats
    pub async fn get_all_departments_stats(&self) -> Result<Vec<DepartmentStats>, DepartmentError> {
        let departments = self.get_all_departments().await?;
        let mut stats = Vec::with_capacity(departments.len());
        for department in departments {
            stats.push(self.get_department_stats(&department.code).await?);
        }
        Ok(stats)
    }

    async fn department_member_stats(
        &self,
        code: &str,
    ) -> Result<DepartmentMemberStats, DepartmentError> {
        let members: Vec<Member> = self
            .db
            .find(
                collections::MEMBERS,
                Query::new()
                    .filter("department", code)
                    .filter("isDeleted", false),
            )
            .await?;

        let mut stats = DepartmentMemberStats {
            total_members: members.len(),
            ..Default::default()
        };
        for member in &members {
            *stats.by_status.entry(member.status.to_string()).or_insert(0) += 1;
            *stats.by_role.entry(member.role.clone()).or_insert(0) += 1;
            stats.total_points += member.total_points;
        }
        stats.average_points = if stats.total_members > 0 {
            stats.total_points as f64 / stats.total_members as f64
        } else {
            0.0
        };
        Ok(stats)
    }

    async fn department_project_stats(
        &self,
        code: &str,
    ) -> Result<DepartmentProjectStats, DepartmentError> {
        let projects: Vec<Project> = self
            .db
            .find(
                collections::PROJECTS,
                Query::new()
                    .filter("department", code)
                    .filter("isArchived", false),
            )
            .await?;

        let mut stats = DepartmentProjectStats {
            total_projects: projects.len(),
            ..Default::default()
        };
        for project in &projects {
            *stats.by_status.entry(project.status.to_string()).or_insert(0) += 1;
            stats.total_budget += project.budget.allocated;
            stats.used_budget += project.budget.used;
        }
        Ok(stats)
    }

    /// Partial update of leadership fields only.
    pub async fn update_department_leadership(
        &self,
        id: &str,
        leadership: DepartmentLeadership,
    ) -> Result<(), DepartmentError> {
        let patch = UpdatePatch::new()
            .set(
                "head",
                leadership.head.clone().map(Value::from).unwrap_or(Value::Null),
            )
            .set(
                "viceHead",
                leadership
                    .vice_head
                    .clone()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            )
            .set(
                "advisors",
                serde_json::to_value(&leadership.advisors).unwrap_or(Value::Null),
            )
            .server_timestamp("updatedAt");
        self.db
            .update(self.collection, id, patch)
            .await
            .map_err(|err| self.map_not_found(err, id))?;
        info!(department = %id, "department leadership updated");
        Ok(())
    }

    /// Adjust the denormalized member counter for a department by `delta`.
    ///
    /// Failures come back as [`DepartmentError::DependencyWriteFailed`] so the
    /// caller can decide whether to swallow, retry, or reconcile.
    pub async fn adjust_member_count(
        &self,
        code: &str,
        delta: i64,
    ) -> Result<(), DepartmentError> {
        let code = code.to_uppercase();
        let department = match self.find_by_code_unfiltered(&code).await {
            Ok(Some(department)) => department,
            _ => return Err(DepartmentError::dependency_write_failed(code.as_str(), delta)),
        };

        let patch = UpdatePatch::new()
            .increment("totalMembers", delta)
            .server_timestamp("updatedAt");
        self.db
            .update(self.collection, &department.id, patch)
            .await
            .map_err(|_| DepartmentError::dependency_write_failed(code.as_str(), delta))?;
        Ok(())
    }

    /// Recompute `totalMembers` for every active department from the member
    /// collection and rewrite counters that drifted. Returns the corrections
    /// made.
    pub async fn reconcile_member_counts(
        &self,
    ) -> Result<Vec<CounterCorrection>, DepartmentError> {
        let departments = self.get_all_departments().await?;
        let mut corrections = Vec::new();
        for department in departments {
            let members: Vec<Member> = self
                .db
                .find(
                    collections::MEMBERS,
                    Query::new()
                        .filter("department", department.code.clone())
                        .filter("isDeleted", false),
                )
                .await?;
            let actual = members.len() as i64;
            if actual != department.total_members {
                self.db
                    .update(
                        self.collection,
                        &department.id,
                        UpdatePatch::new()
                            .set("totalMembers", actual)
                            .server_timestamp("updatedAt"),
                    )
                    .await?;
                warn!(
                    code = %department.code,
                    recorded = department.total_members,
                    actual,
                    "repaired drifted member counter"
                );
                corrections.push(CounterCorrection {
                    code: department.code,
                    recorded: department.total_members,
                    actual,
                });
            }
        }
        Ok(corrections)
    }

    pub fn validate(data: &CreateDepartment) -> ValidationReport {
        let mut errors = Vec::new();
        if data.code.trim().is_empty() {
            errors.push("Department code is required".to_string());
        }
        if data.name.trim().is_empty() {
            errors.push("Department name is required".to_string());
        }
        ValidationReport::from_errors(errors)
    }

    fn map_not_found(&self, err: StoreError, id: &str) -> DepartmentError {
        if err.is_not_found() {
            DepartmentError::not_found_by_id(id)
        } else {
            DepartmentError::Store(err)
        }
    }
}
