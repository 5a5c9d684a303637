//! Zeltic CLI - database migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! zeltic-cli migrate
//!
//! # Create an admin profile
//! zeltic-cli admin create -e admin@zelticjeans.com -n "Admin Name" -p '<password>'
//!
//! # Load products and stock from YAML
//! zeltic-cli seed catalog crates/cli/seed/catalog.yaml
//! ```
//!
//! All commands read `STOREFRONT_DATABASE_URL` (falling back to
//! `DATABASE_URL`), from the environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zeltic-cli")]
#[command(author, version, about = "Zeltic storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage admin profiles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a profile holding the admin role
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Initial password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products and their stock from a YAML file
    Catalog {
        /// Path to the YAML file
        path: String,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { path } => commands::seed::catalog(&path).await?,
        },
    }
    Ok(())
}
