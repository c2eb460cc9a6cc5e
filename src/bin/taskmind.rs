//! Command line front end for the task state engine.
//!
//! Usage:
//!
//! ```text
//! taskmind [--config <path>] list [--type <type>] [--status <status>]
//! taskmind [--config <path>] today
//! taskmind [--config <path>] apply '<envelope json>'
//! taskmind [--config <path>] rollover
//! ```
//!
//! Every command loads the task set from the configured sheet first, which
//! also rolls stale recurring tasks over. Any change, a rollover included, is
//! written back before exiting. Logs go to stderr and honour `RUST_LOG`.

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use taskmind::config::{ConfigError, TaskmindConfig};
use taskmind::task::{
    adapters::SheetStore,
    commands::{Action, ActionEnvelope, CommandError},
    domain::{Task, TaskDomainError, TaskFilter, TaskStatus, TaskType},
    ports::RemoteStoreError,
    services::{EngineError, TaskEngine},
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Task state engine driven from the shell.
#[derive(Debug, Parser)]
#[command(name = "taskmind", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the task list in display order.
    List {
        /// Only tasks of this type (daily, weekly, monthly, onetime).
        #[arg(long = "type")]
        task_type: Option<String>,
        /// Only tasks with this status (pending, done).
        #[arg(long)]
        status: Option<String>,
    },
    /// Show pending tasks due today.
    Today,
    /// Apply one action envelope and write the result back.
    Apply {
        /// Envelope JSON, e.g. `{"db_action":"delete","task_id":"t1"}`.
        envelope: String,
    },
    /// Roll stale recurring tasks over and write the result back.
    Rollover,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no sheet URL configured; set TASKMIND_SHEET_URL or sheet_url in the config file")]
    MissingSheetUrl,

    #[error(transparent)]
    Store(#[from] RemoteStoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Payload(#[from] TaskDomainError),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

type Engine = TaskEngine<SheetStore, DefaultClock>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskmind=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = TaskmindConfig::load(cli.config.as_deref())?;
    let url = config.sheet_url.clone().ok_or(CliError::MissingSheetUrl)?;
    let store = SheetStore::new(url, config.request_timeout)?;
    let mut engine = Engine::new(Arc::new(store), Arc::new(DefaultClock), config.sync);

    let rolled_over = engine.load().await?;
    let mut out = io::stdout().lock();

    let summary = match cli.command {
        Command::List { task_type, status } => {
            engine.dispatch(Action::Query(parse_filter(
                task_type.as_deref(),
                status.as_deref(),
            )?))?;
            write_tasks(&mut out, &engine.visible_tasks(), &engine)?;
            None
        }
        Command::Today => {
            write_tasks(&mut out, &engine.due_today(), &engine)?;
            None
        }
        Command::Apply { envelope } => {
            let parsed = ActionEnvelope::from_json(&envelope)?;
            engine.dispatch_envelope(parsed)?;
            Some(format!("applied; {} pending", engine.pending_count()))
        }
        Command::Rollover => Some(format!("rolled over {rolled_over} task(s)")),
    };

    // Loading may have rolled tasks over, so every command writes back.
    let written = engine.shutdown().await?;
    if let Some(line) = summary {
        writeln!(out, "{line}, saved: {written}")?;
    }
    Ok(())
}

fn parse_filter(
    task_type: Option<&str>,
    status: Option<&str>,
) -> Result<Option<TaskFilter>, TaskDomainError> {
    let filter = TaskFilter {
        task_type: task_type.map(TaskType::try_from).transpose()?,
        status: status.map(TaskStatus::try_from).transpose()?,
    };
    Ok((filter != TaskFilter::default()).then_some(filter))
}

fn write_tasks(out: &mut impl Write, tasks: &[&Task], engine: &Engine) -> io::Result<()> {
    let today = engine.today();
    if tasks.is_empty() {
        return writeln!(out, "no tasks");
    }
    for task in tasks {
        let marker = if task.is_overdue(today) { "!" } else { " " };
        writeln!(
            out,
            "{marker} {due}  {status:<7} {priority:<6} {kind:<7} {title}  [{id}]",
            due = task.due_date(),
            status = task.status(),
            priority = task.priority(),
            kind = task.task_type(),
            title = task.title(),
            id = task.id(),
        )?;
        for subtask in task.subtasks() {
            let check = if subtask.is_completed() { "x" } else { " " };
            writeln!(out, "      [{check}] {}", subtask.title())?;
        }
    }
    Ok(())
}
