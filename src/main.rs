use clap::Parser;
use tracing::info;

use clubhub::config::Config;
use clubhub::db::Database;
use clubhub::seed::DatabaseInitializer;
use clubhub::AppState;

/// Seed the club database and print a short summary of what it holds.
#[derive(Parser, Debug)]
#[command(name = "clubhub", version, about = "Club database seeding and inspection")]
struct Args {
    /// Also create sample projects, events, and members
    #[arg(long)]
    with_sample_data: bool,

    /// Wipe the database instead of seeding (destructive)
    #[arg(long)]
    reset: bool,

    /// Confirm a destructive --reset
    #[arg(long)]
    confirm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if args.with_sample_data {
        config.seed_sample_data = true;
    }

    let db = Database::in_memory();
    let state = AppState::new(db.clone(), config.clone());

    let mut initializer = DatabaseInitializer::new(db, &config);
    if args.reset {
        initializer.reset_database(args.confirm).await?;
        return Ok(());
    }

    initializer.initialize().await?;

    let departments = state.departments.get_all_departments().await?;
    for department in &departments {
        info!(
            code = %department.code,
            name = %department.name,
            members = department.total_members,
            "department"
        );
    }

    let stats = state.members.get_member_stats().await?;
    info!(
        total = stats.total,
        new_this_month = stats.new_this_month,
        total_points = stats.total_points,
        "member stats"
    );

    Ok(())
}
