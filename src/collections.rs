//! Registry of physical collection identifiers.
//!
//! Every logical entity the application touches maps to exactly one collection
//! name defined here. Services and the initializer must never spell a
//! collection name inline.

// Core collections
pub const MEMBERS: &str = "members";
pub const DEPARTMENTS: &str = "departments";
pub const SKILLS: &str = "skills";
pub const ROLES: &str = "roles";

// Project management
pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";
pub const MILESTONES: &str = "milestones";
pub const TEAMS: &str = "teams";

// Event management
pub const EVENTS: &str = "events";
pub const EVENT_REGISTRATIONS: &str = "event_registrations";
pub const EVENT_ATTENDANCE: &str = "event_attendance";

// Finance
pub const TRANSACTIONS: &str = "transactions";
pub const BUDGETS: &str = "budgets";
pub const SPONSORS: &str = "sponsors";
pub const INVOICES: &str = "invoices";

// Content and communication
pub const ANNOUNCEMENTS: &str = "announcements";
pub const POSTS: &str = "posts";
pub const MEDIA: &str = "media";
pub const NOTIFICATIONS: &str = "notifications";

// Learning and development
pub const TRAININGS: &str = "trainings";
pub const COURSES: &str = "courses";
pub const CERTIFICATIONS: &str = "certifications";

// Gamification
pub const ACHIEVEMENTS: &str = "achievements";
pub const POINTS: &str = "points";
pub const BADGES: &str = "badges";
pub const LEADERBOARDS: &str = "leaderboards";

// System
pub const SETTINGS: &str = "settings";
pub const LOGS: &str = "logs";
pub const AUDIT_TRAILS: &str = "audit_trails";
pub const BACKUPS: &str = "backups";

/// Well-known id of the single club-wide settings document.
pub const SYSTEM_SETTINGS_ID: &str = "system_settings";
