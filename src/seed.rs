use chrono::{Datelike, Duration, NaiveDate, Utc};
use tracing::{error, info, warn};

use crate::collections;
use crate::config::Config;
use crate::db::{Database, Query, UpdatePatch};
use crate::errors::SeedError;
use crate::models::{
    AcademicYear, BackupSettings, ClubInfo, Department, DepartmentRequirements, Event, EventStatus,
    Member, MemberLifecycleSettings, MemberStatus, NotificationSettings, PointsConfig, Project,
    ProjectBudget, ProjectStatus, QuietHours, SecuritySettings, Skill, SkillLevels, SkillRef,
    SystemSettings, ThemeSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Checking,
    Seeding,
    Initialized,
}

/// One-time database seeding. Idempotent: any existing department or settings
/// document is taken as proof of a prior run. The `Initialized` state is
/// cached in memory only; a new process re-runs the existence check.
pub struct DatabaseInitializer {
    db: Database,
    state: InitState,
    club_name: String,
    admin_email: String,
    seed_sample_data: bool,
}

impl DatabaseInitializer {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            state: InitState::Uninitialized,
            club_name: config.club_name.clone(),
            admin_email: config.admin_email.clone(),
            seed_sample_data: config.seed_sample_data,
        }
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// Run the fixed seeding sequence: departments, skills, settings, admin
    /// account, then optional sample data. Per-item failures are logged and
    /// skipped; a settings failure aborts the run.
    pub async fn initialize(&mut self) -> Result<(), SeedError> {
        if self.state == InitState::Initialized {
            info!("database already initialized");
            return Ok(());
        }

        info!("starting database initialization");
        self.state = InitState::Checking;
        if self.check_if_initialized().await {
            info!("database already seeded, skipping");
            self.state = InitState::Initialized;
            return Ok(());
        }

        self.state = InitState::Seeding;
        self.create_default_departments().await;
        self.create_default_skills().await;
        self.create_system_settings().await?;
        self.create_admin_account().await;
        if self.seed_sample_data {
            self.create_sample_data().await;
        } else {
            info!("sample data disabled, skipping");
        }

        self.state = InitState::Initialized;
        info!("database initialization completed");
        Ok(())
    }

    /// Any existing department or settings document counts as prior seeding.
    /// Check errors count as "not initialized".
    async fn check_if_initialized(&self) -> bool {
        let departments = self
            .db
            .store()
            .query(collections::DEPARTMENTS, Query::new().limit(1))
            .await;
        let settings = self
            .db
            .store()
            .query(collections::SETTINGS, Query::new().limit(1))
            .await;
        departments.map(|docs| !docs.is_empty()).unwrap_or(false)
            || settings.map(|docs| !docs.is_empty()).unwrap_or(false)
    }

    async fn create_default_departments(&self) {
        info!("creating default departments");
        for department in self.default_departments() {
            match self
                .db
                .put(collections::DEPARTMENTS, &department.id, &department)
                .await
            {
                Ok(()) => info!(code = %department.code, name = %department.name, "created department"),
                Err(err) => error!(code = %department.code, error = %err, "failed to create department"),
            }
        }
    }

    async fn create_default_skills(&self) {
        info!("creating default skills");
        for skill in self.default_skills() {
            match self.db.put(collections::SKILLS, &skill.id, &skill).await {
                Ok(()) => info!(code = %skill.code, name = %skill.name, "created skill"),
                Err(err) => error!(code = %skill.code, error = %err, "failed to create skill"),
            }
        }
    }

    /// Settings are the one seed step the rest of the application cannot run
    /// without, so a failure here is fatal to the run.
    async fn create_system_settings(&self) -> Result<(), SeedError> {
        info!("creating system settings");
        let settings = self.system_settings();
        self.db
            .put(collections::SETTINGS, collections::SYSTEM_SETTINGS_ID, &settings)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to create system settings");
                SeedError::SettingsSeedFailed(err)
            })?;
        info!("created system settings");
        Ok(())
    }

    /// The admin account is optional; creation failure is logged and ignored.
    async fn create_admin_account(&self) {
        info!("creating admin account");
        let admin = self.admin_member();
        match self.db.put(collections::MEMBERS, &admin.id, &admin).await {
            Ok(()) => info!(code = %admin.code, "created admin account"),
            Err(err) => error!(error = %err, "failed to create admin account"),
        }
    }

    async fn create_sample_data(&self) {
        info!("creating sample data");
        self.create_sample_projects().await;
        self.create_sample_events().await;
        self.create_sample_members().await;
        info!("sample data created");
    }

    async fn create_sample_projects(&self) {
        for project in self.sample_projects() {
            match self.db.put(collections::PROJECTS, &project.id, &project).await {
                Ok(()) => info!(name = %project.name, "created sample project"),
                Err(err) => error!(name = %project.name, error = %err, "failed to create sample project"),
            }
        }
    }

    async fn create_sample_events(&self) {
        for event in self.sample_events() {
            match self.db.put(collections::EVENTS, &event.id, &event).await {
                Ok(()) => info!(title = %event.title, "created sample event"),
                Err(err) => error!(title = %event.title, error = %err, "failed to create sample event"),
            }
        }
    }

    async fn create_sample_members(&self) {
        for member in self.sample_members() {
            match self.db.put(collections::MEMBERS, &member.id, &member).await {
                Ok(()) => {
                    info!(name = %member.full_name, "created sample member");
                    if !member.department.is_empty() {
                        self.bump_department_members(&member.department, 1).await;
                    }
                }
                Err(err) => {
                    error!(name = %member.full_name, error = %err, "failed to create sample member")
                }
            }
        }
    }

    async fn bump_department_members(&self, code: &str, delta: i64) {
        let found = self
            .db
            .find::<Department>(
                collections::DEPARTMENTS,
                Query::new().filter("code", code).limit(1),
            )
            .await;
        match found {
            Ok(mut departments) => match departments.pop() {
                Some(department) => {
                    let patch = UpdatePatch::new()
                        .increment("totalMembers", delta)
                        .server_timestamp("updatedAt");
                    if let Err(err) = self
                        .db
                        .update(collections::DEPARTMENTS, &department.id, patch)
                        .await
                    {
                        warn!(department = %code, error = %err, "seed member count not updated");
                    }
                }
                None => warn!(department = %code, "seed member count not updated; department missing"),
            },
            Err(err) => warn!(department = %code, error = %err, "seed member count not updated"),
        }
    }

    /// Destructive reset stub. Refuses to run without explicit confirmation;
    /// the actual wipe is left to the backing store's own tooling.
    pub async fn reset_database(&self, confirm: bool) -> Result<(), SeedError> {
        if !confirm {
            return Err(SeedError::ResetNotConfirmed);
        }
        warn!("database reset requested");
        warn!("reset is not implemented; delete collections through the store's console");
        Ok(())
    }

    fn default_departments(&self) -> Vec<Department> {
        vec![
            self.department(
                "dept_md",
                "MD",
                "Media & Communications",
                "Public image and club communications",
                "#3B82F6",
                "fa-bullhorn",
                30,
                1,
                DepartmentRequirements::default(),
            ),
            self.department(
                "dept_hr",
                "HR",
                "Human Resources",
                "Member management and people development",
                "#10B981",
                "fa-users",
                25,
                2,
                DepartmentRequirements::default(),
            ),
            self.department(
                "dept_pd",
                "PD",
                "Project Development",
                "Development and delivery of social projects",
                "#F59E0B",
                "fa-project-diagram",
                35,
                3,
                DepartmentRequirements::default(),
            ),
            self.department(
                "dept_er",
                "ER",
                "External Relations",
                "Partnerships and sponsorship",
                "#8B5CF6",
                "fa-handshake",
                20,
                4,
                DepartmentRequirements::default(),
            ),
            self.department(
                "dept_dev",
                "DEV",
                "Technology",
                "Builds and maintains the club's technical systems",
                "#EC4899",
                "fa-code",
                15,
                5,
                DepartmentRequirements {
                    min_points: Some(100),
                    required_skills: vec![
                        "programming".to_string(),
                        "problem_solving".to_string(),
                    ],
                },
            ),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn department(
        &self,
        id: &str,
        code: &str,
        name: &str,
        description: &str,
        color: &str,
        icon: &str,
        max_members: i64,
        order: i64,
        requirements: DepartmentRequirements,
    ) -> Department {
        let now = Utc::now();
        Department {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            head: None,
            vice_head: None,
            advisors: Vec::new(),
            total_members: 0,
            active_projects: 0,
            completed_projects: 0,
            max_members,
            requirements,
            created_at: now,
            updated_at: now,
            created_by: "system".to_string(),
            is_active: true,
            order,
            deleted_at: None,
        }
    }

    fn default_skills(&self) -> Vec<Skill> {
        vec![
            self.skill(
                "skill_react",
                "SK001",
                "ReactJS",
                "technical",
                "JavaScript library for building user interfaces",
                SkillLevels {
                    beginner: "Can build simple components".to_string(),
                    intermediate: "Can build complex applications".to_string(),
                    advanced: "Expert level with performance optimization".to_string(),
                },
                85,
            ),
            self.skill(
                "skill_design",
                "SK002",
                "UI/UX Design",
                "creative",
                "User interface and experience design",
                SkillLevels {
                    beginner: "Basic understanding of design principles".to_string(),
                    intermediate: "Can create wireframes and mockups".to_string(),
                    advanced: "Expert in design systems and user research".to_string(),
                },
                75,
            ),
            self.skill(
                "skill_leadership",
                "SK003",
                "Leadership",
                "soft",
                "Team management and leadership skills",
                SkillLevels {
                    beginner: "Can lead small tasks".to_string(),
                    intermediate: "Can manage project teams".to_string(),
                    advanced: "Strategic leadership and decision making".to_string(),
                },
                90,
            ),
            self.skill(
                "skill_communication",
                "SK004",
                "Communication",
                "soft",
                "Effective communication and presentation skills",
                SkillLevels {
                    beginner: "Basic communication in team settings".to_string(),
                    intermediate: "Can present to small groups".to_string(),
                    advanced: "Public speaking and stakeholder communication".to_string(),
                },
                95,
            ),
            self.skill(
                "skill_project_management",
                "SK005",
                "Project Management",
                "management",
                "Planning, executing, and closing projects",
                SkillLevels {
                    beginner: "Can manage small tasks".to_string(),
                    intermediate: "Can manage small projects".to_string(),
                    advanced: "Expert in agile methodologies and resource management".to_string(),
                },
                80,
            ),
        ]
    }

    fn skill(
        &self,
        id: &str,
        code: &str,
        name: &str,
        category: &str,
        description: &str,
        levels: SkillLevels,
        popularity: i64,
    ) -> Skill {
        Skill {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            levels,
            learning_paths: Vec::new(),
            total_members: 0,
            average_score: 0.0,
            is_active: true,
            popularity,
            created_at: Utc::now(),
            created_by: "system".to_string(),
        }
    }

    fn system_settings(&self) -> SystemSettings {
        let now = Utc::now();
        let year = now.year();
        SystemSettings {
            id: collections::SYSTEM_SETTINGS_ID.to_string(),
            club_info: ClubInfo {
                name: self.club_name.clone(),
                description: "Social entrepreneurship student club".to_string(),
                contact_email: "contact@enactusftu.com".to_string(),
                website: "https://enactusftu.com".to_string(),
                social_links: [
                    (
                        "facebook".to_string(),
                        "https://facebook.com/enactusftu".to_string(),
                    ),
                    (
                        "instagram".to_string(),
                        "https://instagram.com/enactusftu".to_string(),
                    ),
                    (
                        "linkedin".to_string(),
                        "https://linkedin.com/company/enactusftu".to_string(),
                    ),
                ]
                .into_iter()
                .collect(),
            },
            academic_year: AcademicYear {
                current: format!("{}-{}", year, year + 1),
                start_date: NaiveDate::from_ymd_opt(year, 9, 1).unwrap_or_default(),
                end_date: NaiveDate::from_ymd_opt(year + 1, 8, 31).unwrap_or_default(),
            },
            points_config: PointsConfig {
                event_attendance: 10,
                project_completion: 50,
                skill_verification: 25,
                member_referral: 30,
                leadership_role: 100,
                training_completion: 20,
                code_contribution: 15,
            },
            member_settings: MemberLifecycleSettings {
                min_attendance_rate: 0.6,
                probation_period: 30,
                max_inactive_days: 90,
                auto_promote_points: 500,
            },
            notification_settings: NotificationSettings {
                email_reminders: true,
                push_notifications: true,
                reminder_days: vec![1, 3, 7],
                quiet_hours: QuietHours {
                    start: "22:00".to_string(),
                    end: "07:00".to_string(),
                },
            },
            theme_settings: ThemeSettings {
                primary_color: "#FFD54F".to_string(),
                secondary_color: "#3B82F6".to_string(),
                accent_color: "#10B981".to_string(),
                dark_mode: false,
                font_family: "'Plus Jakarta Sans', sans-serif".to_string(),
            },
            security_settings: SecuritySettings {
                require_email_verification: true,
                allow_self_registration: true,
                max_login_attempts: 5,
                session_timeout: 24,
            },
            backup_settings: BackupSettings {
                auto_backup: true,
                backup_frequency: "daily".to_string(),
                retain_days: 30,
            },
            last_updated: now,
            version: "1.0.0".to_string(),
            initialized_at: now,
        }
    }

    fn admin_member(&self) -> Member {
        let now = Utc::now();
        Member {
            id: "admin_001".to_string(),
            // Sequential seed code; the runtime generator uses random
            // suffixes instead. Known inconsistency, kept as-is.
            code: "MEM2024000".to_string(),
            full_name: "System Administrator".to_string(),
            email: self.admin_email.clone(),
            phone: String::new(),
            student_id: "ADMIN001".to_string(),
            avatar: String::new(),
            bio: "System administrator account".to_string(),
            join_date: now,
            status: MemberStatus::Active,
            department: "HR".to_string(),
            role: "admin".to_string(),
            level: "lead".to_string(),
            skills: Vec::new(),
            interests: vec![
                "system_administration".to_string(),
                "development".to_string(),
            ],
            social_links: Default::default(),
            emergency_contact: None,
            total_points: 1000,
            total_contributions: 0,
            attendance_rate: 1.0,
            completed_projects: 0,
            completed_trainings: 0,
            created_at: now,
            updated_at: now,
            created_by: "system".to_string(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    fn sample_projects(&self) -> Vec<Project> {
        let now = Utc::now();
        let today = now.date_naive();
        vec![
            Project {
                id: "proj_001".to_string(),
                code: "PRJ0001".to_string(),
                name: "Website Redesign".to_string(),
                description: "Redesign the club website with modern UI and better UX".to_string(),
                kind: "internal".to_string(),
                priority: "high".to_string(),
                status: ProjectStatus::InProgress,
                visibility: "public".to_string(),
                department: "DEV".to_string(),
                progress: 0.35,
                budget: ProjectBudget {
                    allocated: 2000,
                    used: 750,
                    currency: "VND".to_string(),
                },
                start_date: today - Duration::days(30),
                deadline: today + Duration::days(60),
                created_at: now,
                updated_at: now,
                is_archived: false,
            },
            Project {
                id: "proj_002".to_string(),
                code: "PRJ0002".to_string(),
                name: "Mobile App Development".to_string(),
                description: "Build a mobile app for event management and member communication"
                    .to_string(),
                kind: "internal".to_string(),
                priority: "medium".to_string(),
                status: ProjectStatus::Planning,
                visibility: "public".to_string(),
                department: "DEV".to_string(),
                progress: 0.10,
                budget: ProjectBudget {
                    allocated: 5000,
                    used: 0,
                    currency: "VND".to_string(),
                },
                start_date: today + Duration::days(14),
                deadline: today + Duration::days(150),
                created_at: now,
                updated_at: now,
                is_archived: false,
            },
        ]
    }

    fn sample_events(&self) -> Vec<Event> {
        let now = Utc::now();
        let start = now - Duration::days(7);
        vec![Event {
            id: "evt_001".to_string(),
            code: "EVT0001".to_string(),
            title: "ReactJS Workshop".to_string(),
            description: "Learn React fundamentals and build your first app".to_string(),
            kind: "workshop".to_string(),
            category: "technical".to_string(),
            format: "offline".to_string(),
            start_date_time: start,
            end_date_time: start + Duration::hours(3),
            venue: "Room A101".to_string(),
            organizer: "admin_001".to_string(),
            department: "DEV".to_string(),
            max_participants: 50,
            registered_count: 42,
            attended_count: 38,
            status: EventStatus::Completed,
            is_public: true,
            created_at: now,
            updated_at: now,
        }]
    }

    fn sample_members(&self) -> Vec<Member> {
        let now = Utc::now();
        vec![
            self.sample_member(
                "mem_001",
                "MEM2024001",
                "Nguyen Van An",
                "nguyenvanan@example.com",
                "0912345678",
                "FTU202412345",
                "DEV",
                SkillRef {
                    skill_id: "skill_react".to_string(),
                    name: "ReactJS".to_string(),
                    level: "intermediate".to_string(),
                },
                350,
                12,
                0.85,
                now - Duration::days(60),
            ),
            self.sample_member(
                "mem_002",
                "MEM2024002",
                "Tran Thi Binh",
                "tranthibinh@example.com",
                "0987654321",
                "FTU202412346",
                "MD",
                SkillRef {
                    skill_id: "skill_design".to_string(),
                    name: "UI/UX Design".to_string(),
                    level: "advanced".to_string(),
                },
                280,
                8,
                0.90,
                now - Duration::days(40),
            ),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn sample_member(
        &self,
        id: &str,
        code: &str,
        full_name: &str,
        email: &str,
        phone: &str,
        student_id: &str,
        department: &str,
        skill: SkillRef,
        total_points: i64,
        total_contributions: i64,
        attendance_rate: f64,
        join_date: chrono::DateTime<Utc>,
    ) -> Member {
        let now = Utc::now();
        Member {
            id: id.to_string(),
            code: code.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            student_id: student_id.to_string(),
            avatar: String::new(),
            bio: String::new(),
            join_date,
            status: MemberStatus::Active,
            department: department.to_string(),
            role: "member".to_string(),
            level: "regular".to_string(),
            skills: vec![skill],
            interests: Vec::new(),
            social_links: Default::default(),
            emergency_contact: None,
            total_points,
            total_contributions,
            attendance_rate,
            completed_projects: 0,
            completed_trainings: 0,
            created_at: now,
            updated_at: now,
            created_by: "system".to_string(),
            is_deleted: false,
            deleted_at: None,
        }
    }
}
