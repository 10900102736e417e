pub mod collections;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod seed;
pub mod services;

#[cfg(feature = "test-utils")]
pub mod test_utils;

use config::Config;
use db::Database;
use services::{DepartmentService, MemberService};

/// Shared application state: one database handle plus the service objects,
/// constructed once at startup and passed by reference.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub departments: DepartmentService,
    pub members: MemberService,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let departments = DepartmentService::new(db.clone());
        let members = MemberService::new(db.clone(), departments.clone());
        Self {
            db,
            config,
            departments,
            members,
        }
    }
}
