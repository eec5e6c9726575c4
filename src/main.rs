mod age;
mod clock;
mod domain;
mod persistence;
mod store;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clock::{Clock, SystemClock};
use domain::{counter_text, format_due, Filter, FilterState, Priority, Task};
use persistence::{FileStorage, StorageBackend};
use store::TaskStore;

#[derive(Parser)]
#[command(name = "tend")]
#[command(about = "A small local to-do list manager with an age calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        title: String,
        /// Due date in YYYY-MM-DD format
        #[arg(short, long)]
        due: Option<String>,
        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// List tasks
    List {
        /// Show all, active or completed tasks
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// Keep only tasks whose title contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Toggle a task between completed and active
    Toggle {
        /// Task id (a unique prefix is enough)
        id: String,
    },
    /// Rename a task
    Edit {
        id: String,
        title: String,
    },
    /// Delete a task
    Rm {
        id: String,
    },
    /// Move a task so it sits immediately before another task
    Move {
        id: String,
        /// Id of the task to insert before
        #[arg(short, long)]
        before: String,
    },
    /// Remove all completed tasks
    ClearCompleted,
    /// Calculate age from a date of birth
    Age {
        day: u32,
        month: u32,
        year: i32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let clock = SystemClock;

    if let Commands::Age { day, month, year } = cli.command {
        return run_age(day, month, year, clock);
    }

    let storage = FileStorage::open_default()?;
    let mut store = TaskStore::load(storage, clock);

    match cli.command {
        Commands::Add { title, due, priority } => {
            let due_date = due.map(|d| parse_due(&d)).transpose()?;
            let priority = Priority::from_tag(&priority)
                .ok_or_else(|| anyhow!("Invalid priority (expected low, medium or high)"))?;
            let task = store.add(&title, due_date, priority)?;
            println!("Added \"{}\" ({})", task.title, short_id(&task));
        }
        Commands::List { filter, search } => {
            let filter = Filter::from_tag(&filter)
                .ok_or_else(|| anyhow!("Invalid filter (expected all, active or completed)"))?;
            let state = FilterState::new(filter, search);
            print_list(&store, &state, clock.today());
        }
        Commands::Toggle { id } => {
            let id = resolve_id(&store, &id)?;
            let task = store.toggle_complete(id)?;
            let verb = if task.completed { "Completed" } else { "Reactivated" };
            println!("{} \"{}\"", verb, task.title);
        }
        Commands::Edit { id, title } => {
            let id = resolve_id(&store, &id)?;
            let task = store.edit_title(id, &title)?;
            println!("Renamed to \"{}\"", task.title);
        }
        Commands::Rm { id } => {
            let id = resolve_id(&store, &id)?;
            store.delete(id)?;
            println!("Deleted");
        }
        Commands::Move { id, before } => {
            let moved = resolve_id(&store, &id)?;
            let target = resolve_id(&store, &before)?;
            store.reorder(moved, target)?;
            println!("Moved");
        }
        Commands::ClearCompleted => {
            let removed = store.clear_completed();
            let plural = if removed == 1 { "" } else { "s" };
            println!("Cleared {removed} completed task{plural}");
        }
        // Handled before the store is opened
        Commands::Age { .. } => {}
    }

    Ok(())
}

fn run_age(day: u32, month: u32, year: i32, clock: impl Clock) -> Result<()> {
    let today = clock.today();
    let birth = age::validate_date(day, month, year, today)?;
    let result = age::diff(birth, today);

    println!(
        "{} years, {} months, {} days",
        result.years, result.months, result.days
    );
    println!("{} days in total", result.total_days);
    Ok(())
}

fn parse_due(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid due date (expected YYYY-MM-DD): {e}"))
}

/// First eight characters of the task id, enough to address it on the CLI
fn short_id(task: &Task) -> String {
    task.id.to_string().chars().take(8).collect()
}

/// Resolve a full id or unique id prefix to a task id
fn resolve_id<S: StorageBackend, C: Clock>(
    store: &TaskStore<S, C>,
    prefix: &str,
) -> Result<uuid::Uuid> {
    let matches: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [task] => Ok(task.id),
        [] => Err(anyhow!("No task matches id \"{prefix}\"")),
        _ => Err(anyhow!("Id \"{prefix}\" is ambiguous")),
    }
}

fn print_list<S: StorageBackend, C: Clock>(
    store: &TaskStore<S, C>,
    state: &FilterState,
    today: NaiveDate,
) {
    for task in store.view(state) {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let mut line = format!("{} {}  {}", checkbox, short_id(task), task.title);

        if let Some(due) = task.due_date {
            let marker = if task.is_overdue(today) { "!" } else { "" };
            line.push_str(&format!("  due {}{}", format_due(due, today), marker));
        }
        line.push_str(&format!("  ({})", task.priority.to_tag()));

        println!("{line}");
    }

    let stats = store.stats();
    println!();
    println!("{}", counter_text(&stats));
    if stats.overdue > 0 {
        println!("{} overdue", stats.overdue);
    }
}
