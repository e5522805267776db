//! Shop Ve Sinh CLI - database setup and admin account tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the database file and tables
//! shop-cli db init --path db/database.db
//!
//! # Create an admin account (password from -p or ADMIN_PASSWORD)
//! shop-cli admin create -u owner -p 'a-strong-password'
//! ```
//!
//! # Commands
//!
//! - `db init` - Create the SQLite file and any missing tables
//! - `admin create` - Create an admin account

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use shop_ve_sinh_api::config::DEFAULT_DATABASE_PATH;

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shop Ve Sinh CLI tools")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SHOP_DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the database file
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Create the database file and any missing tables
    Init,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Db { action } => match action {
            DbAction::Init => commands::db::init(&cli.path).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                let id =
                    commands::admin::create_user(&cli.path, &username, &SecretString::from(password))
                        .await?;
                tracing::info!(admin_id = %id, "admin account created");
            }
        },
    }
    Ok(())
}
