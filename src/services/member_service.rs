use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use rand::Rng;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::collections;
use crate::db::{Database, Query, UpdatePatch, WriteBatch};
use crate::errors::{AppError, MemberError, StoreError};
use crate::models::{
    CreateMember, LeaderboardEntry, Member, MemberExportRow, MemberListOptions, MemberPage,
    MemberStats, MemberStatus, PointsEntry, SkillRef, UpdateMember, ValidationReport,
};

use super::DepartmentService;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,11}$").expect("phone regex"));

/// CRUD, statistics, points, and bulk operations over member records.
///
/// Counter maintenance for the owning department goes through
/// [`DepartmentService::adjust_member_count`]; failures there never fail the
/// primary member operation.
#[derive(Clone)]
pub struct MemberService {
    db: Database,
    departments: DepartmentService,
    collection: &'static str,
}

impl MemberService {
    pub fn new(db: Database, departments: DepartmentService) -> Self {
        Self {
            db,
            departments,
            collection: collections::MEMBERS,
        }
    }

    /// Create a member with a generated `MEM<year><rand>` code, defaulted
    /// optional fields, zeroed stats, and `pending` status, then best-effort
    /// increment the owning department's member counter.
    pub async fn create_member(&self, data: CreateMember) -> Result<Member, MemberError> {
        let report = Self::validate(&data);
        if !report.is_valid {
            return Err(MemberError::ValidationFailed {
                errors: report.errors,
            });
        }

        let now = Utc::now();
        let member = Member {
            id: self.db.new_document_id(),
            code: self.generate_member_code(),
            full_name: data.full_name,
            email: data.email,
            phone: data.phone.unwrap_or_default(),
            student_id: data.student_id.unwrap_or_default(),
            avatar: data.avatar.unwrap_or_default(),
            bio: data.bio.unwrap_or_default(),
            join_date: data.join_date.unwrap_or(now),
            status: MemberStatus::Pending,
            department: data.department.unwrap_or_default(),
            role: data.role.unwrap_or_else(|| "member".to_string()),
            level: data.level.unwrap_or_else(|| "regular".to_string()),
            skills: data.skills.unwrap_or_default(),
            interests: data.interests.unwrap_or_default(),
            social_links: data.social_links.unwrap_or_default(),
            emergency_contact: data.emergency_contact,
            total_points: 0,
            total_contributions: 0,
            attendance_rate: 0.0,
            completed_projects: 0,
            completed_trainings: 0,
            created_at: now,
            updated_at: now,
            created_by: data.created_by.unwrap_or_else(|| "system".to_string()),
            is_deleted: false,
            deleted_at: None,
        };

        self.db.put(self.collection, &member.id, &member).await?;

        if !member.department.is_empty() {
            if let Err(err) = self
                .departments
                .adjust_member_count(&member.department, 1)
                .await
            {
                warn!(
                    member = %member.code,
                    code = err.error_code(),
                    error = %err,
                    "department member count not updated"
                );
            }
        }

        info!(code = %member.code, name = %member.full_name, "member created");
        Ok(member)
    }

    /// Point lookup. Soft-deleted members report [`MemberError::AlreadyDeleted`].
    pub async fn get_member(&self, id: &str) -> Result<Member, MemberError> {
        let member: Member = self
            .db
            .fetch(self.collection, id)
            .await?
            .ok_or_else(|| MemberError::not_found_by_id(id))?;
        if member.is_deleted {
            return Err(MemberError::already_deleted(id));
        }
        Ok(member)
    }

    pub async fn get_member_by_code(&self, code: &str) -> Result<Member, MemberError> {
        let mut results: Vec<Member> = self
            .db
            .find(
                self.collection,
                Query::new()
                    .filter("code", code)
                    .filter("isDeleted", false)
                    .limit(1),
            )
            .await?;
        results
            .pop()
            .ok_or_else(|| MemberError::not_found_by_code(code))
    }

    /// Apply a partial update and stamp `updatedAt`. A department change
    /// adjusts both counters and the member document in one atomic batch.
    pub async fn update_member(&self, id: &str, updates: UpdateMember) -> Result<(), MemberError> {
        let current = self.get_member(id).await?;
        let patch = updates.to_patch().server_timestamp("updatedAt");

        let department_change = updates
            .department
            .clone()
            .filter(|dept| !dept.is_empty() && *dept != current.department);

        match department_change {
            Some(new_department) => {
                let mut batch = WriteBatch::new();
                if !current.department.is_empty() {
                    self.stage_counter_adjustment(&mut batch, &current.department, -1)
                        .await;
                }
                self.stage_counter_adjustment(&mut batch, &new_department, 1)
                    .await;
                batch.update(self.collection, id, patch);
                self.db.commit(batch).await?;
            }
            None => {
                self.db.update(self.collection, id, patch).await?;
            }
        }

        info!(member = %id, "member updated");
        Ok(())
    }

    /// Soft delete: the member becomes `inactive` with `isDeleted=true`, and
    /// the owning department's counter is decremented in the same batch.
    pub async fn delete_member(&self, id: &str) -> Result<(), MemberError> {
        let current = self.get_member(id).await?;

        let mut batch = WriteBatch::new();
        if !current.department.is_empty() {
            self.stage_counter_adjustment(&mut batch, &current.department, -1)
                .await;
        }
        batch.update(
            self.collection,
            id,
            UpdatePatch::new()
                .set("status", MemberStatus::Inactive.to_string())
                .set("isDeleted", true)
                .server_timestamp("deletedAt")
                .server_timestamp("updatedAt"),
        );
        self.db.commit(batch).await?;

        info!(member = %id, "member soft deleted");
        Ok(())
    }

    /// Filtered, searched, paginated member listing. The entire filtered set
    /// is fetched before paging; search is applied in memory across name,
    /// email, and code.
    pub async fn get_all_members(
        &self,
        options: MemberListOptions,
    ) -> Result<MemberPage, MemberError> {
        let mut query = Query::new().filter("isDeleted", false);
        if let Some(department) = &options.department {
            query = query.filter("department", department.clone());
        }
        if let Some(status) = options.status {
            query = query.filter("status", status.to_string());
        }
        if let Some(role) = &options.role {
            query = query.filter("role", role.clone());
        }
        query = query.descending("joinDate");

        let mut members: Vec<Member> = self.db.find(self.collection, query).await?;

        if let Some(search) = options
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let needle = search.to_lowercase();
            members.retain(|member| {
                member.full_name.to_lowercase().contains(&needle)
                    || member.email.to_lowercase().contains(&needle)
                    || member.code.to_lowercase().contains(&needle)
            });
        }

        Ok(super::paginate(members, options.page, options.limit))
    }

    /// Generic equality-filter composition over arbitrary field names. Empty
    /// field names and empty/null values are skipped.
    pub async fn search_members(
        &self,
        filters: BTreeMap<String, Value>,
    ) -> Result<Vec<Member>, MemberError> {
        let mut query = Query::new().filter("isDeleted", false);
        for (field, value) in filters {
            if field.trim().is_empty() {
                continue;
            }
            match &value {
                Value::Null => continue,
                Value::String(s) if s.is_empty() => continue,
                _ => {}
            }
            query = query.filter(field, value);
        }
        Ok(self.db.find(self.collection, query).await?)
    }

    /// Members holding the named skill, matched case-insensitively against
    /// the skill name.
    pub async fn get_members_by_skill(&self, skill: &str) -> Result<Vec<Member>, MemberError> {
        let members: Vec<Member> = self
            .db
            .find(self.collection, Query::new().filter("isDeleted", false))
            .await?;
        Ok(members
            .into_iter()
            .filter(|member| {
                member
                    .skills
                    .iter()
                    .any(|s| s.name.eq_ignore_ascii_case(skill))
            })
            .collect())
    }

    /// Single-pass aggregation over all non-deleted members.
    pub async fn get_member_stats(&self) -> Result<MemberStats, MemberError> {
        let members: Vec<Member> = self
            .db
            .find(self.collection, Query::new().filter("isDeleted", false))
            .await?;

        let now = Utc::now();
        let mut stats = MemberStats {
            total: members.len(),
            ..Default::default()
        };
        for member in &members {
            *stats.by_status.entry(member.status.to_string()).or_insert(0) += 1;
            if !member.department.is_empty() {
                *stats
                    .by_department
                    .entry(member.department.clone())
                    .or_insert(0) += 1;
            }
            *stats.by_role.entry(member.role.clone()).or_insert(0) += 1;
            if member.join_date.month() == now.month() && member.join_date.year() == now.year() {
                stats.new_this_month += 1;
            }
            stats.total_points += member.total_points;
        }
        stats.average_points = if stats.total > 0 {
            stats.total_points as f64 / stats.total as f64
        } else {
            0.0
        };
        Ok(stats)
    }

    /// Top-n active members by points, annotated with 1-based rank.
    pub async fn get_leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, MemberError> {
        let members: Vec<Member> = self
            .db
            .find(
                self.collection,
                Query::new()
                    .filter("isDeleted", false)
                    .filter("status", MemberStatus::Active.to_string())
                    .descending("totalPoints")
                    .limit(limit),
            )
            .await?;
        Ok(members
            .into_iter()
            .enumerate()
            .map(|(index, member)| LeaderboardEntry {
                rank: index + 1,
                member,
            })
            .collect())
    }

    /// Award points: increment the member's total and append one immutable
    /// ledger entry, committed as a single atomic batch.
    pub async fn add_points(
        &self,
        member_id: &str,
        points: i64,
        reason: &str,
        source_id: Option<&str>,
    ) -> Result<(), MemberError> {
        let member = self.get_member(member_id).await?;

        let entry = PointsEntry {
            id: self.db.new_document_id(),
            member_id: member_id.to_string(),
            points,
            reason: reason.to_string(),
            source_id: source_id.map(str::to_string),
            awarded_at: Utc::now(),
            awarded_by: "system".to_string(),
        };

        let mut batch = WriteBatch::new();
        batch.update(
            self.collection,
            member_id,
            UpdatePatch::new()
                .increment("totalPoints", points)
                .server_timestamp("updatedAt"),
        );
        batch.set(
            collections::POINTS,
            entry.id.clone(),
            Database::to_document(&entry)?,
        );
        self.db.commit(batch).await?;

        info!(member = %member.code, points, reason, "points awarded");
        Ok(())
    }

    /// Append a skill via array-union; duplicates are dropped by element
    /// equality only.
    pub async fn add_skill(&self, member_id: &str, skill: SkillRef) -> Result<(), MemberError> {
        self.get_member(member_id).await?;

        let value = serde_json::to_value(&skill).map_err(StoreError::from)?;
        self.db
            .update(
                self.collection,
                member_id,
                UpdatePatch::new()
                    .array_union("skills", vec![value])
                    .server_timestamp("updatedAt"),
            )
            .await?;

        info!(member = %member_id, skill = %skill.name, "skill added");
        Ok(())
    }

    /// Set the status of every listed member in one atomic commit: either all
    /// of them update or none do.
    pub async fn bulk_update_status(
        &self,
        member_ids: &[String],
        status: MemberStatus,
    ) -> Result<(), MemberError> {
        if member_ids.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::new();
        for member_id in member_ids {
            batch.update(
                self.collection,
                member_id.clone(),
                UpdatePatch::new()
                    .set("status", status.to_string())
                    .server_timestamp("updatedAt"),
            );
        }
        self.db.commit(batch).await?;
        info!(count = member_ids.len(), status = %status, "bulk status update");
        Ok(())
    }

    /// Project members into the flat export shape. With ids, fetches exactly
    /// those documents (missing ones are skipped); without, exports every
    /// non-deleted member.
    pub async fn export_members(
        &self,
        member_ids: &[String],
    ) -> Result<Vec<MemberExportRow>, MemberError> {
        let members: Vec<Member> = if member_ids.is_empty() {
            self.db
                .find(self.collection, Query::new().filter("isDeleted", false))
                .await?
        } else {
            let fetches = member_ids
                .iter()
                .map(|id| self.db.fetch::<Member>(self.collection, id));
            futures::future::try_join_all(fetches)
                .await?
                .into_iter()
                .flatten()
                .collect()
        };
        Ok(members.iter().map(MemberExportRow::from).collect())
    }

    /// Validate raw member input. Reports every violation at once.
    pub fn validate(data: &CreateMember) -> ValidationReport {
        let mut errors = Vec::new();

        if data.full_name.trim().is_empty() {
            errors.push("Full name is required".to_string());
        }

        let email = data.email.trim();
        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !EMAIL_RE.is_match(email) {
            errors.push("Invalid email format".to_string());
        }

        if let Some(phone) = data.phone.as_deref() {
            if !phone.is_empty() && !PHONE_RE.is_match(phone) {
                errors.push("Phone number must be 10-11 digits".to_string());
            }
        }

        ValidationReport::from_errors(errors)
    }

    /// `MEM` + year + 4 random digits. Not guaranteed unique; collisions are
    /// an acknowledged risk of the scheme.
    fn generate_member_code(&self) -> String {
        let year = Utc::now().year();
        let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
        format!("MEM{}{}", year, suffix)
    }

    /// Stage a department counter adjustment into `batch`, resolving the
    /// department document first. Resolution failure degrades to a warning;
    /// the batch proceeds without the counter write.
    async fn stage_counter_adjustment(&self, batch: &mut WriteBatch, code: &str, delta: i64) {
        match self.departments.find_by_code_unfiltered(code).await {
            Ok(Some(department)) => {
                batch.update(
                    collections::DEPARTMENTS,
                    department.id,
                    UpdatePatch::new()
                        .increment("totalMembers", delta)
                        .server_timestamp("updatedAt"),
                );
            }
            _ => {
                warn!(
                    department = %code,
                    delta,
                    "department not resolved; member count not adjusted"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, phone: Option<&str>) -> CreateMember {
        CreateMember {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn validate_reports_every_violation_at_once() {
        let report = MemberService::validate(&input("", "bad", None));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn validate_accepts_a_complete_record() {
        let report = MemberService::validate(&input("Jane Doe", "jane@example.com", Some("0912345678")));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn validate_checks_phone_digit_count() {
        let report = MemberService::validate(&input("Jane Doe", "jane@example.com", Some("12345")));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Phone number must be 10-11 digits"]);
    }

    #[test]
    fn validate_allows_missing_phone() {
        let report = MemberService::validate(&input("Jane Doe", "jane@example.com", None));
        assert!(report.is_valid);
    }
}
