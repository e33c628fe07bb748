pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::{ApiClient, EnvSession};

/// Environment variable holding the current session token. Commands read
/// it through `EnvSession` on every call rather than caching it.
pub const TOKEN_ENV: &str = "TRACKER_TOKEN";

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Tracker CLI - command-line client for the project/task tracking API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "TRACKER_SERVER",
        default_value = "http://localhost:3000",
        help = "Base URL of the tracker API server"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Project operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Task operations")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "Show a project's tasks with counts by status")]
    Board {
        #[arg(help = "Project ID")]
        project_id: uuid::Uuid,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Build the API client every command shares: explicit session accessor,
/// no ambient token anywhere else in the CLI.
pub fn api_client(server: &str) -> ApiClient {
    ApiClient::new(server, Arc::new(EnvSession::new(TOKEN_ENV)))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.clone();

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, &server, output_format).await,
        Commands::Task { cmd } => commands::task::handle(cmd, &server, output_format).await,
        Commands::Board { project_id } => {
            commands::task::handle_board(project_id, &server, output_format).await
        }
    }
}
