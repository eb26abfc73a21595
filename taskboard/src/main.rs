//! `taskboard` — command-line task manager.
//!
//! Talks to a running `taskboard-server`. Logs go to a file so stdout only
//! carries command output.
//!
//! ```bash
//! cargo run --bin taskboard -- add --title "Pay rent" --due 2024-03-01 --tags bills,home
//! cargo run --bin taskboard -- list --tag bills
//! cargo run --bin taskboard -- edit <id> --set status=Completed
//! cargo run --bin taskboard -- delete <id>
//!
//! # Point at another server
//! TASKBOARD_URL=http://tasks.internal:3000 cargo run --bin taskboard -- list
//! ```

use std::path::Path;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use taskboard::board::TaskBoard;
use taskboard::cache::{EditFormCache, FormField, TaskDraft};
use taskboard::client::TaskClient;
use taskboard::config::{ClientArgs, ClientConfig};
use taskboard::view::{self, TaskView};
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};
use tracing_appender::non_blocking::WorkerGuard;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(version, about = "Taskboard command-line client")]
struct Cli {
    #[command(flatten)]
    args: ClientArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks, newest first.
    List {
        /// Title substring.
        #[arg(long)]
        title: Option<String>,
        /// Exact status ("Not Started", "In Progress", "Completed").
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Exact priority (Low, Medium, High).
        #[arg(long)]
        priority: Option<Priority>,
        /// Earliest due date, inclusive.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest due date, inclusive.
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Whole-word tag.
        #[arg(long)]
        tag: Option<String>,
        /// Local search over title and description.
        #[arg(long)]
        search: Option<String>,
        /// Print raw JSON records.
        #[arg(long)]
        json: bool,
    },
    /// Show one task.
    Show { id: String },
    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date, `YYYY-MM-DD`.
        #[arg(long, default_value = "")]
        due: String,
        #[arg(long, default_value_t = Priority::Low)]
        priority: Priority,
        /// Comma-delimited tags.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = TaskStatus::NotStarted)]
        status: TaskStatus,
    },
    /// Edit fields of a task, e.g. `--set status=Completed --set dueDate=2024-04-01`.
    Edit {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },
    /// Delete one or more tasks.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(&cli.args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log_level, config.log_file.as_deref());
    tracing::debug!(server = %config.server_url, "taskboard starting");

    let board = TaskBoard::new(TaskClient::new(config.server_url));
    match run(board, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(mut board: TaskBoard, command: Command) -> CliResult {
    match command {
        Command::List {
            title,
            status,
            priority,
            from,
            to,
            tag,
            search,
            json,
        } => {
            let query = TaskQuery {
                title,
                status,
                priority,
                from_date: from,
                to_date: to,
                tag,
                ..TaskQuery::all()
            };
            let tasks = board.load(query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
                return Ok(());
            }
            let today = chrono::Local::now().date_naive();
            let views: Vec<TaskView> = tasks.iter().map(|t| TaskView::from_task(t, today)).collect();
            let shown = view::search_views(&views, search.as_deref().unwrap_or_default());
            if shown.is_empty() {
                println!("No tasks found.");
            }
            for row in shown {
                println!("{}", render_row(row));
            }
        }
        Command::Show { id } => {
            let task = board.fetch(&parse_id(&id)?).await?;
            print_task(&task);
        }
        Command::Add {
            title,
            description,
            due,
            priority,
            tags,
            status,
        } => {
            let draft = TaskDraft {
                title,
                description,
                due_date: due,
                priority,
                tags,
                status,
            };
            let task = board.submit_new(&draft).await?;
            println!("Created {}", task.id);
        }
        Command::Edit { id, assignments } => {
            let id = parse_id(&id)?;
            let mut form = EditFormCache::new();
            form.set_task(&board.fetch(&id).await?);
            for assignment in &assignments {
                let (name, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| format!("expected FIELD=VALUE, got {assignment:?}"))?;
                form.set_field_by_name(name.trim(), value)?;
            }
            let task = board.submit_edit(&id, form.draft()).await?;
            print_task(&task);
        }
        Command::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|raw| parse_id(raw))
                .collect::<Result<Vec<_>, _>>()?;
            if let [id] = ids.as_slice() {
                board.remove(id).await?;
                println!("Deleted {id}");
            } else {
                let deleted = board.remove_many(&ids).await?;
                println!("Deleted {deleted} of {} tasks", ids.len());
            }
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    raw.parse().map_err(|_| format!("not a task id: {raw:?}"))
}

fn render_row(row: &TaskView) -> String {
    let mut line = format!(
        "{}  [{}] [{}] {}",
        row.id, row.status, row.priority, row.title
    );
    if !row.due.is_empty() {
        let marker = if row.expired { " (expired)" } else { "" };
        line.push_str(&format!("  due {}{marker}", row.due));
    }
    if !row.tags.is_empty() {
        line.push_str(&format!("  #{}", row.tags.join(" #")));
    }
    line
}

fn print_task(task: &Task) {
    let row = TaskView::from_task(task, chrono::Local::now().date_naive());
    println!("{}", render_row(&row));
    for field in FormField::ALL {
        let value = match field {
            FormField::Description => row.description.clone(),
            FormField::DueDate => row.due.clone(),
            FormField::Tags => row.tags.join(", "),
            FormField::Title | FormField::Priority | FormField::Status => continue,
        };
        if !value.is_empty() {
            println!("  {field}: {value}");
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
