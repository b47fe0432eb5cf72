//! # matchday
//!
//! Command-line client for the Matchday community API.
//!
//! ## Commands
//!
//! - `profile`: Show a member and the friendship actions on offer
//! - `requests`: List friend requests waiting for you
//! - `send` / `cancel` / `accept` / `reject` / `unfriend`: Act on a friendship
//!
//! ## Example
//!
//! ```bash
//! # Look someone up
//! matchday --config matchday.toml profile alice
//!
//! # Answer a request
//! matchday accept carol
//!
//! # Try it without a server
//! matchday --mock requests
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matchday_client::{ClientConfig, FriendshipApi, HttpApi};
use matchday_core::FriendAction;
use matchday_types::UserId;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod mock;

use commands::{friendship, profile, requests, Session};

/// Command-line client for the Matchday community API.
#[derive(Parser, Debug)]
#[command(name = "matchday")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, global = true, default_value = "matchday.toml")]
    config: PathBuf,

    /// Use an in-memory demo API instead of the real server
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a member's profile and the friendship actions on offer
    Profile {
        /// Member username
        username: String,
    },

    /// List pending friend requests sent to you
    Requests,

    /// Send a friend request
    Send {
        /// Member username
        username: String,
    },

    /// Withdraw a friend request you sent
    Cancel {
        /// Member username
        username: String,
    },

    /// Accept a friend request sent to you
    Accept {
        /// Member username
        username: String,
    },

    /// Reject a friend request sent to you
    Reject {
        /// Member username
        username: String,
    },

    /// End a friendship
    Unfriend {
        /// Member username
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.mock {
        let api = Arc::new(mock::demo_api());
        let session = Session::new(api, UserId::new(mock::VIEWER_ID), Default::default());
        run(&session, cli.command).await
    } else {
        let config = ClientConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?;
        let api = Arc::new(HttpApi::new(&config).context("Failed to create API client")?);
        let session = Session::new(api, config.viewer_id(), config.cache_settings());
        run(&session, cli.command).await
    }
}

async fn run<A: FriendshipApi + 'static>(session: &Session<A>, command: Commands) -> Result<()> {
    match command {
        Commands::Profile { username } => profile::run(session, &username).await,
        Commands::Requests => requests::run(session).await,
        Commands::Send { username } => {
            friendship::run(session, &username, FriendAction::SendRequest).await
        }
        Commands::Cancel { username } => {
            friendship::run(session, &username, FriendAction::CancelRequest).await
        }
        Commands::Accept { username } => {
            friendship::run(session, &username, FriendAction::AcceptRequest).await
        }
        Commands::Reject { username } => {
            friendship::run(session, &username, FriendAction::RejectRequest).await
        }
        Commands::Unfriend { username } => {
            friendship::run(session, &username, FriendAction::Unfriend).await
        }
    }
}
