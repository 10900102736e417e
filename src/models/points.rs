use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable ledger entry written for every point award. Entries are only
/// ever appended; nothing in the application mutates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsEntry {
    pub id: String,
    pub member_id: String,
    pub points: i64,
    pub reason: String,
    pub source_id: Option<String>,
    pub awarded_at: DateTime<Utc>,
    pub awarded_by: String,
}
