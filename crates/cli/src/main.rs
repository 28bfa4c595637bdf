//! Plants & Co CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pc-cli migrate
//!
//! # Seed the catalog and promo codes
//! pc-cli seed
//!
//! # Create an admin user
//! pc-cli admin create -e admin@example.com -p <password> -f Admin -l User
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with plants and promo codes
//! - `admin create` - Create admin users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(author, version, about = "Plants & Co CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with plants and promo codes
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password (min 8 characters)
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(short, long, default_value = "Admin")]
        first_name: String,

        /// Last name
        #[arg(short, long, default_value = "User")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                commands::admin::create_user(&email, &password, &first_name, &last_name).await?;
            }
        },
    }
    Ok(())
}
