use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubInfo {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub website: String,
    pub social_links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub current: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Points granted per recognized action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsConfig {
    pub event_attendance: i64,
    pub project_completion: i64,
    pub skill_verification: i64,
    pub member_referral: i64,
    pub leadership_role: i64,
    pub training_completion: i64,
    pub code_contribution: i64,
}

/// Membership lifecycle thresholds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLifecycleSettings {
    pub min_attendance_rate: f64,
    pub probation_period: i64,
    pub max_inactive_days: i64,
    pub auto_promote_points: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_reminders: bool,
    pub push_notifications: bool,
    pub reminder_days: Vec<u32>,
    pub quiet_hours: QuietHours,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub dark_mode: bool,
    pub font_family: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub require_email_verification: bool,
    pub allow_self_registration: bool,
    pub max_login_attempts: u32,
    /// Hours until an idle session expires.
    pub session_timeout: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSettings {
    pub auto_backup: bool,
    pub backup_frequency: String,
    pub retain_days: u32,
}

/// The single club-wide settings document, keyed
/// [`SYSTEM_SETTINGS_ID`](crate::collections::SYSTEM_SETTINGS_ID) and upserted
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub id: String,
    pub club_info: ClubInfo,
    pub academic_year: AcademicYear,
    pub points_config: PointsConfig,
    pub member_settings: MemberLifecycleSettings,
    pub notification_settings: NotificationSettings,
    pub theme_settings: ThemeSettings,
    pub security_settings: SecuritySettings,
    pub backup_settings: BackupSettings,
    pub last_updated: DateTime<Utc>,
    pub version: String,
    pub initialized_at: DateTime<Utc>,
}
