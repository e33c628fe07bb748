use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_collection, output_success, require_session};
use crate::cli::{api_client, OutputFormat};
use crate::client::{LoadState, TaskBoard};
use crate::database::models::{Task, TaskStatus};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List a project's tasks")]
    List {
        #[arg(help = "Project ID")]
        project_id: Uuid,
    },

    #[command(about = "Add a task to a project (starts in backlog)")]
    Add {
        #[arg(help = "Project ID")]
        project_id: Uuid,
        #[arg(help = "Task title")]
        title: String,
    },

    #[command(about = "Move a task to a new status")]
    SetStatus {
        #[arg(help = "Project ID")]
        project_id: Uuid,
        #[arg(help = "Task ID")]
        id: Uuid,
        #[arg(help = "New status (backlog|in_progress|review|done)")]
        status: String,
    },

    #[command(about = "Rename a task")]
    Rename {
        #[arg(help = "Project ID")]
        project_id: Uuid,
        #[arg(help = "Task ID")]
        id: Uuid,
        #[arg(help = "New title")]
        title: String,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Project ID")]
        project_id: Uuid,
        #[arg(help = "Task ID")]
        id: Uuid,
    },
}

fn parse_status(raw: &str) -> anyhow::Result<TaskStatus> {
    TaskStatus::parse(raw).ok_or_else(|| {
        anyhow::anyhow!(
            "invalid status '{}' (expected backlog|in_progress|review|done)",
            raw
        )
    })
}

fn task_line(task: &Task) -> String {
    format!("{}  [{}]  {}", task.id, task.status, task.title)
}

fn check_board(board: &TaskBoard<impl crate::client::TaskApi>) -> anyhow::Result<()> {
    if let LoadState::Error(msg) = board.state() {
        anyhow::bail!("failed to load tasks: {}", msg);
    }
    if let Some(msg) = board.last_error() {
        anyhow::bail!("{}", msg);
    }
    Ok(())
}

pub async fn handle(
    cmd: TaskCommands,
    server: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = api_client(server);

    match cmd {
        TaskCommands::List { project_id } => {
            let mut board = TaskBoard::new(client, project_id);
            require_session(board.refresh().await)?;
            check_board(&board)?;

            let lines = board.tasks().iter().map(task_line).collect();
            output_collection(&output_format, "tasks", json!(board.tasks()), lines)
        }
        TaskCommands::Add { project_id, title } => {
            let mut board = TaskBoard::new(client, project_id);
            require_session(board.refresh().await)?;
            require_session(board.add(&title).await)?;
            check_board(&board)?;

            output_success(
                &output_format,
                &format!("Task added ({} in project)", board.tasks().len()),
                Some(json!({ "tasks": board.tasks() })),
            )
        }
        TaskCommands::SetStatus {
            project_id,
            id,
            status,
        } => {
            let status = parse_status(&status)?;

            let mut board = TaskBoard::new(client, project_id);
            require_session(board.refresh().await)?;
            require_session(board.set_status(id, status).await)?;
            check_board(&board)?;

            output_success(
                &output_format,
                &format!("Task moved to {}", status),
                Some(json!({ "tasks": board.tasks() })),
            )
        }
        TaskCommands::Rename { project_id, id, title } => {
            let mut board = TaskBoard::new(client, project_id);
            require_session(board.refresh().await)?;
            require_session(board.rename(id, &title).await)?;
            check_board(&board)?;

            output_success(&output_format, "Task renamed", None)
        }
        TaskCommands::Delete { project_id, id } => {
            let mut board = TaskBoard::new(client, project_id);
            require_session(board.refresh().await)?;
            require_session(board.remove(id).await)?;
            check_board(&board)?;

            output_success(&output_format, "Task deleted", None)
        }
    }
}

/// `tracker board <project-id>` - task list grouped with on-demand counts.
pub async fn handle_board(
    project_id: Uuid,
    server: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = api_client(server);

    let mut board = TaskBoard::new(client, project_id);
    require_session(board.refresh().await)?;
    check_board(&board)?;

    let counts = board.status_counts();
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "tasks": board.tasks(),
                    "counts": {
                        "backlog": counts.backlog,
                        "in_progress": counts.in_progress,
                        "review": counts.review,
                        "done": counts.done,
                    }
                }))?
            );
        }
        OutputFormat::Text => {
            println!(
                "backlog: {}  in_progress: {}  review: {}  done: {}",
                counts.backlog, counts.in_progress, counts.review, counts.done
            );
            for task in board.tasks() {
                println!("{}", task_line(task));
            }
        }
    }
    Ok(())
}
