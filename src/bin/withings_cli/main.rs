// ABOUTME: Withings CLI - command-line access to the Withings OAuth flow and data API
// ABOUTME: Generates authorization URLs, exchanges and refreshes tokens, and fetches resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Print the URL a user visits to grant access
//! withings-cli --client-id ID --client-secret SECRET --redirect-url https://app/cb auth url
//!
//! # Exchange the code from the redirect for a token
//! withings-cli auth exchange --code CODE > token.json
//!
//! # Fetch measures changed since a Unix timestamp
//! withings-cli data measures --token-file token.json --since 1700000000
//!
//! # Obtain a token for the demo account
//! withings-cli --demo-mode auth demo
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand, ValueEnum};
use pierre_withings::{
    config::withings::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_REDIRECT_URI},
    errors::{AppError, AppResult},
    logging::LoggingConfig,
    WithingsClient, WithingsConfig,
};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "withings-cli",
    about = "Withings API command-line client",
    long_about = "Drive the Withings OAuth flow and fetch health data with automatic token refresh."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OAuth client ID
    #[arg(long, global = true, env = ENV_CLIENT_ID)]
    client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, global = true, env = ENV_CLIENT_SECRET, hide_env_values = true)]
    client_secret: Option<String>,

    /// Callback URL registered with the application
    #[arg(long, global = true, env = ENV_REDIRECT_URI)]
    redirect_url: Option<String>,

    /// Use the Withings demo account
    #[arg(long, global = true)]
    demo_mode: bool,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    skip_certificate_verification: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// OAuth authorization and token commands
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },

    /// Fetch a Withings resource with a stored token
    Data {
        /// Resource to fetch
        #[arg(value_enum)]
        resource: Resource,

        /// JSON file holding the access token
        #[arg(long)]
        token_file: PathBuf,

        /// Only return data changed after this Unix timestamp
        #[arg(long)]
        since: Option<i64>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum AuthCommand {
    /// Print the authorization URL and its state
    Url {
        /// Comma-separated scopes
        #[arg(long, default_value = "user.activity,user.metrics")]
        scopes: String,

        /// State value (random when omitted)
        #[arg(long, default_value = "")]
        state: String,
    },

    /// Exchange an authorization code for a token
    Exchange {
        /// Code received on the callback URL
        #[arg(long)]
        code: String,
    },

    /// Refresh the token stored in a file and print the new one
    Refresh {
        /// JSON file holding the access token
        #[arg(long)]
        token_file: PathBuf,
    },

    /// Obtain a token for the demo account
    Demo,
}

/// Resources reachable from `data`
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Resource {
    /// Body measures
    Measures,
    /// Daily activity
    Activity,
    /// Workouts
    Workouts,
    /// Sleep summaries
    SleepSummary,
    /// Linked devices
    Devices,
}

impl Cli {
    fn client(&self) -> Result<WithingsClient> {
        let client_id = self
            .client_id
            .clone()
            .ok_or_else(|| AppError::config_missing(ENV_CLIENT_ID))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or_else(|| AppError::config_missing(ENV_CLIENT_SECRET))?;
        let redirect_url = self
            .redirect_url
            .as_deref()
            .ok_or_else(|| AppError::config_missing(ENV_REDIRECT_URI))?;
        let redirect_url = Url::parse(redirect_url)
            .map_err(|e| AppError::config_invalid(ENV_REDIRECT_URI, e))?;

        let config = WithingsConfig::new(client_id, client_secret, redirect_url)
            .with_demo_mode(self.demo_mode)
            .with_skip_tls_verify(self.skip_certificate_verification);
        debug!(
            "Using client {} (secret fingerprint {})",
            config.client_id,
            config.secret_fingerprint()
        );
        WithingsClient::new(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    let client = cli.client()?;

    match cli.command {
        Command::Auth { action } => match action {
            AuthCommand::Url { scopes, state } => commands::auth::url(&client, &scopes, &state)?,
            AuthCommand::Exchange { code } => commands::auth::exchange(&client, &code).await?,
            AuthCommand::Refresh { token_file } => {
                commands::auth::refresh(&client, &token_file).await?;
            }
            AuthCommand::Demo => commands::auth::demo(&client).await?,
        },
        Command::Data {
            resource,
            token_file,
            since,
        } => commands::data::fetch(client, resource, &token_file, since).await?,
    }

    Ok(())
}
