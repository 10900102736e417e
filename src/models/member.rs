use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::UpdatePatch;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Inactive,
    #[serde(rename = "alumni")]
    Alumni,
    #[serde(rename = "suspended")]
    Suspended,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Pending => write!(f, "pending"),
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Inactive => write!(f, "inactive"),
            MemberStatus::Alumni => write!(f, "alumni"),
            MemberStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl TryFrom<String> for MemberStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(MemberStatus::Pending),
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            "alumni" => Ok(MemberStatus::Alumni),
            "suspended" => Ok(MemberStatus::Suspended),
            _ => Err(format!("Invalid member status: {}", value)),
        }
    }
}

/// A skill held by a member, referencing the skill catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillRef {
    pub skill_id: String,
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub code: String,

    // Basic info
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
    pub avatar: String,
    pub bio: String,

    // Club info
    pub join_date: DateTime<Utc>,
    pub status: MemberStatus,
    pub department: String,
    pub role: String,
    pub level: String,

    // Skills and interests
    pub skills: Vec<SkillRef>,
    pub interests: Vec<String>,

    // Social links
    pub social_links: BTreeMap<String, String>,
    pub emergency_contact: Option<EmergencyContact>,

    // Stats
    pub total_points: i64,
    pub total_contributions: i64,
    pub attendance_rate: f64,
    pub completed_projects: i64,
    pub completed_trainings: i64,

    // Metadata
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub level: Option<String>,
    pub skills: Option<Vec<SkillRef>>,
    pub interests: Option<Vec<String>>,
    pub social_links: Option<BTreeMap<String, String>>,
    pub emergency_contact: Option<EmergencyContact>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub status: Option<MemberStatus>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub level: Option<String>,
    pub interests: Option<Vec<String>>,
    pub social_links: Option<BTreeMap<String, String>>,
    pub emergency_contact: Option<EmergencyContact>,
}

impl UpdateMember {
    /// Field-level patch for the set fields; the caller stamps `updatedAt`.
    pub fn to_patch(&self) -> UpdatePatch {
        let mut patch = UpdatePatch::new();
        if let Some(full_name) = &self.full_name {
            patch = patch.set("fullName", full_name.clone());
        }
        if let Some(email) = &self.email {
            patch = patch.set("email", email.clone());
        }
        if let Some(phone) = &self.phone {
            patch = patch.set("phone", phone.clone());
        }
        if let Some(student_id) = &self.student_id {
            patch = patch.set("studentId", student_id.clone());
        }
        if let Some(avatar) = &self.avatar {
            patch = patch.set("avatar", avatar.clone());
        }
        if let Some(bio) = &self.bio {
            patch = patch.set("bio", bio.clone());
        }
        if let Some(status) = &self.status {
            patch = patch.set("status", status.to_string());
        }
        if let Some(department) = &self.department {
            patch = patch.set("department", department.clone());
        }
        if let Some(role) = &self.role {
            patch = patch.set("role", role.clone());
        }
        if let Some(level) = &self.level {
            patch = patch.set("level", level.clone());
        }
        if let Some(interests) = &self.interests {
            patch = patch.set(
                "interests",
                serde_json::to_value(interests).unwrap_or(Value::Null),
            );
        }
        if let Some(social_links) = &self.social_links {
            patch = patch.set(
                "socialLinks",
                serde_json::to_value(social_links).unwrap_or(Value::Null),
            );
        }
        if let Some(contact) = &self.emergency_contact {
            patch = patch.set(
                "emergencyContact",
                serde_json::to_value(contact).unwrap_or(Value::Null),
            );
        }
        patch
    }
}

/// Listing options for paginated member queries.
#[derive(Debug, Clone)]
pub struct MemberListOptions {
    pub page: usize,
    pub limit: usize,
    pub department: Option<String>,
    pub status: Option<MemberStatus>,
    pub role: Option<String>,
    pub search: Option<String>,
}

impl Default for MemberListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            department: None,
            status: None,
            role: None,
            search: None,
        }
    }
}

/// One page of members plus the paging envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub members: Vec<Member>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_department: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub new_this_month: usize,
    pub total_points: i64,
    pub average_points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub member: Member,
}

/// Flat tabular member projection for export. Column names are part of the
/// external contract.
#[derive(Debug, Clone, Serialize)]
pub struct MemberExportRow {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Status")]
    pub status: MemberStatus,
    #[serde(rename = "Join Date")]
    pub join_date: DateTime<Utc>,
    #[serde(rename = "Total Points")]
    pub total_points: i64,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Social Links")]
    pub social_links: String,
}

impl From<&Member> for MemberExportRow {
    fn from(member: &Member) -> Self {
        Self {
            code: member.code.clone(),
            full_name: member.full_name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            department: member.department.clone(),
            role: member.role.clone(),
            status: member.status,
            join_date: member.join_date,
            total_points: member.total_points,
            skills: member
                .skills
                .iter()
                .map(|skill| skill.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            social_links: serde_json::to_string(&member.social_links).unwrap_or_default(),
        }
    }
}
