use anyhow::Result;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub club_name: String,
    pub admin_email: String,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            club_name: env::var("CLUB_NAME")
                .unwrap_or_else(|_| "Enactus FTU Hanoi".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@enactusftu.com".to_string()),
            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
        })
    }
}
