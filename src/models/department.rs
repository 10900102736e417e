use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::UpdatePatch;

/// Entry requirements a department may impose on applicants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,

    // Leadership
    pub head: Option<String>,
    pub vice_head: Option<String>,
    pub advisors: Vec<String>,

    // Denormalized counters; eventually consistent with the member and
    // project collections.
    pub total_members: i64,
    pub active_projects: i64,
    pub completed_projects: i64,

    // Settings
    pub max_members: i64,
    pub requirements: DepartmentRequirements,

    // Metadata
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub is_active: bool,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub head: Option<String>,
    pub vice_head: Option<String>,
    pub advisors: Option<Vec<String>>,
    pub max_members: Option<i64>,
    pub requirements: Option<DepartmentRequirements>,
    pub order: Option<i64>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub max_members: Option<i64>,
    pub requirements: Option<DepartmentRequirements>,
    pub order: Option<i64>,
}

impl UpdateDepartment {
    pub fn to_patch(&self) -> UpdatePatch {
        let mut patch = UpdatePatch::new();
        if let Some(name) = &self.name {
            patch = patch.set("name", name.clone());
        }
        if let Some(description) = &self.description {
            patch = patch.set("description", description.clone());
        }
        if let Some(color) = &self.color {
            patch = patch.set("color", color.clone());
        }
        if let Some(icon) = &self.icon {
            patch = patch.set("icon", icon.clone());
        }
        if let Some(max_members) = self.max_members {
            patch = patch.set("maxMembers", max_members);
        }
        if let Some(requirements) = &self.requirements {
            patch = patch.set(
                "requirements",
                serde_json::to_value(requirements).unwrap_or(Value::Null),
            );
        }
        if let Some(order) = self.order {
            patch = patch.set("order", order);
        }
        patch
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLeadership {
    pub head: Option<String>,
    pub vice_head: Option<String>,
    #[serde(default)]
    pub advisors: Vec<String>,
}

/// Member breakdown for one department. Zeroed when the underlying query
/// fails, so aggregate views degrade instead of erroring.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMemberStats {
    pub total_members: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub total_points: i64,
    pub average_points: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentProjectStats {
    pub total_projects: usize,
    pub by_status: BTreeMap<String, usize>,
    pub total_budget: i64,
    pub used_budget: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department: Department,
    pub members: DepartmentMemberStats,
    pub projects: DepartmentProjectStats,
}

/// One counter fixed by [`reconcile_member_counts`].
///
/// [`reconcile_member_counts`]: crate::services::DepartmentService::reconcile_member_counts
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CounterCorrection {
    pub code: String,
    pub recorded: i64,
    pub actual: i64,
}
