//! GlassSpire CLI - Database migrations and operational tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! glassspire migrate
//!
//! # Mark a user as verified
//! glassspire users verify 42
//!
//! # Persist expiry for lapsed retailer subscriptions
//! glassspire subscriptions expire
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server (`GLASSSPIRE_DATABASE_URL`,
//! falling back to `DATABASE_URL`), including a `.env` file if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "glassspire")]
#[command(author, version, about = "GlassSpire CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage retailer subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Mark a user as verified
    Verify {
        /// User id from the identity provider
        id: i32,
    },
    /// Mark a user as unverified
    Unverify {
        /// User id from the identity provider
        id: i32,
    },
}

#[derive(Subcommand)]
enum SubscriptionAction {
    /// Mark active subscriptions past their end date as expired
    Expire,
}

#[tokio::main]
async fn main() {
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
        Commands::Users { action } => match action {
            UserAction::Verify { id } => commands::users::set_verified(id, true).await?,
            UserAction::Unverify { id } => commands::users::set_verified(id, false).await?,
        },
        Commands::Subscriptions { action } => match action {
            SubscriptionAction::Expire => {
                commands::subscriptions::expire().await?;
            }
        },
    }
    Ok(())
}
