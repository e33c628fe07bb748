use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{map_client_err, output_collection, output_success, require_session};
use crate::cli::{api_client, OutputFormat};
use crate::client::{ProjectApi, ProjectDraft, ProjectList};
use crate::database::models::{Project, ProjectStatus};

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List your projects")]
    List,

    #[command(about = "Show one project")]
    Get {
        #[arg(help = "Project ID")]
        id: Uuid,
    },

    #[command(about = "Create a project")]
    Create {
        #[arg(help = "Project title")]
        title: String,
        #[arg(long, help = "Project description")]
        description: Option<String>,
        #[arg(long, help = "Initial status (active|completed), defaults to active")]
        status: Option<String>,
    },

    #[command(about = "Update a project's title, description, or status")]
    Update {
        #[arg(help = "Project ID")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Status (active|completed)")]
        status: Option<String>,
    },
}

fn parse_status(raw: &str) -> anyhow::Result<ProjectStatus> {
    ProjectStatus::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("invalid status '{}' (expected active|completed)", raw))
}

fn project_line(project: &Project) -> String {
    format!(
        "{}  [{}]  {}{}",
        project.id,
        project.status,
        project.title,
        project
            .description
            .as_deref()
            .map(|d| format!(" - {}", d))
            .unwrap_or_default()
    )
}

pub async fn handle(
    cmd: ProjectCommands,
    server: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = api_client(server);

    match cmd {
        ProjectCommands::List => {
            let mut view = ProjectList::new(client);
            require_session(view.refresh().await)?;

            if let crate::client::LoadState::Error(msg) = view.state() {
                anyhow::bail!("failed to load projects: {}", msg);
            }

            let lines = view.projects().iter().map(project_line).collect();
            output_collection(&output_format, "projects", json!(view.projects()), lines)
        }
        ProjectCommands::Get { id } => {
            let project = client.get_project(id).await.map_err(map_client_err)?;
            output_collection(
                &output_format,
                "project",
                json!(project),
                vec![project_line(&project)],
            )
        }
        ProjectCommands::Create {
            title,
            description,
            status,
        } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let draft = ProjectDraft {
                title: Some(title),
                description,
                status,
            };

            let mut view = ProjectList::new(client);
            require_session(view.create(draft).await)?;
            if let Some(msg) = view.last_error() {
                anyhow::bail!("{}", msg);
            }

            output_success(
                &output_format,
                &format!("Project created ({} total)", view.projects().len()),
                Some(json!({ "projects": view.projects() })),
            )
        }
        ProjectCommands::Update {
            id,
            title,
            description,
            status,
        } => {
            if title.is_none() && description.is_none() && status.is_none() {
                anyhow::bail!("nothing to update: pass --title, --description, or --status");
            }
            let status = status.as_deref().map(parse_status).transpose()?;
            let draft = ProjectDraft {
                title,
                description,
                status,
            };

            let project = client.update_project(id, draft).await.map_err(map_client_err)?;
            output_success(
                &output_format,
                "Project updated",
                Some(json!({ "project": project })),
            )
        }
    }
}
