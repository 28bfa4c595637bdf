//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! pc-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PLANTSCO_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`)

use plantsco_api::config::Config;
use plantsco_api::db;

/// Run the embedded database migrations.
///
/// # Errors
///
/// Returns an error if the configuration is missing, the database cannot be
/// reached, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
