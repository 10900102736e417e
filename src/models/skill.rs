use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expected proficiency per level of a catalog skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevels {
    pub beginner: String,
    pub intermediate: String,
    pub advanced: String,
}

/// Skill catalog entry. Seeded by the initializer; members reference entries
/// through [`SkillRef`](crate::models::SkillRef).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub levels: SkillLevels,
    pub learning_paths: Vec<String>,
    pub total_members: i64,
    pub average_score: f64,
    pub is_active: bool,
    pub popularity: i64,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}
