//! `jarvis` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from the environment plus flag overrides.
//! - Open the SQLite store and dispatch one use-case per invocation.
//!
//! # Invariants
//! - Every failure is printed to stderr and exits with status 1.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use jarvis_core::config::{DATA_DIR_ENV, DB_PATH_ENV, LOG_LEVEL_ENV, THINK_DELAY_ENV};
use jarvis_core::db::open_db;
use jarvis_core::{
    core_version, init_logging, Assistant, CoreConfig, Layout, NewEvent, NoteEdit, Priority,
    Settings, SqliteKeyValueStore, Theme, TodoFilter,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const RECENT_HISTORY_LIMIT: usize = 5;

/// Personal assistant for todos, calendar events and notes
#[derive(Parser, Debug)]
#[command(name = "jarvis")]
#[command(about = "Keep todos, events and notes from free-text commands")]
struct Cli {
    /// Data directory (overrides JARVIS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// SQLite database file (overrides JARVIS_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides JARVIS_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Delay before a command executes, in milliseconds
    #[arg(long, global = true)]
    think_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify free text and store whatever it describes
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    #[command(subcommand)]
    Todo(TodoCommand),
    #[command(subcommand)]
    Event(EventCommand),
    #[command(subcommand)]
    Note(NoteCommand),
    /// Show recent command history
    History {
        #[arg(long, default_value_t = RECENT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Write a backup document (stdout when no path is given)
    Export { path: Option<PathBuf> },
    /// Apply a backup document
    Import { path: PathBuf },
    /// Show or change settings
    Settings(SettingsArgs),
    /// Delete every stored collection, history and settings
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print the core version
    Version,
}

#[derive(Subcommand, Debug)]
enum TodoCommand {
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    Toggle { id: String },
    Priority {
        id: String,
        #[arg(value_enum)]
        priority: PriorityArg,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    Add {
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        /// Only events on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum NoteCommand {
    New,
    Edit {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    List,
    Search { query: String },
    Delete { id: String },
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
    #[arg(long)]
    auto_save: Option<bool>,
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    All,
    Active,
    Completed,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Dark,
    Light,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Side,
    Top,
}

impl From<FilterArg> for TodoFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::Active => Self::Active,
            FilterArg::Completed => Self::Completed,
        }
    }
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Light => Self::Light,
        }
    }
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Side => Self::Side,
            LayoutArg::Top => Self::Top,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Command::Version = cli.command {
        println!("jarvis_core version={}", core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_logging(config.log_level, config.log_dir())?;
    let conn = open_db(&config.db_path)?;
    let assistant = Assistant::new(SqliteKeyValueStore::new(&conn));
    info!("event=cli_start module=cli status=ok");

    match cli.command {
        Command::Ask { text } => ask(&assistant, &text.join(" "), config.think_delay),
        Command::Todo(command) => todo(&assistant, command),
        Command::Event(command) => event(&assistant, command),
        Command::Note(command) => note(&assistant, command),
        Command::History { limit } => {
            let session = assistant.session(config.think_delay);
            for entry in session.recent_history(limit) {
                println!(
                    "{}  [{}/{}] {} -> {}",
                    entry.executed_at.format("%Y-%m-%d %H:%M"),
                    entry.intent_type.as_str(),
                    entry.action.as_str(),
                    entry.raw_text,
                    entry.result_message
                );
            }
            Ok(())
        }
        Command::Export { path } => {
            let backup = assistant.backup();
            let json = backup.export_json()?;
            match path {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(backup.suggested_file_name())
                    } else {
                        path
                    };
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let report = assistant.backup().import_json(&json)?;
            println!(
                "imported todos={} notes={} events={} settings={}",
                report.todos, report.notes, report.events, report.settings
            );
            Ok(())
        }
        Command::Settings(args) => settings(&assistant, args),
        Command::Clear { yes } => {
            if !yes {
                return Err("refusing to clear without --yes".into());
            }
            assistant.backup().clear_all()?;
            println!("all data cleared");
            Ok(())
        }
        Command::Version => Ok(()),
    }
}

/// Flag values take precedence over the matching environment variables.
fn resolve_config(cli: &Cli) -> CliResult<CoreConfig> {
    let path_flag = |path: &Option<PathBuf>| path.as_ref().map(|p| p.to_string_lossy().into_owned());
    let config = CoreConfig::from_lookup(|key| {
        let flag = match key {
            DATA_DIR_ENV => path_flag(&cli.data_dir),
            DB_PATH_ENV => path_flag(&cli.db),
            LOG_LEVEL_ENV => cli.log_level.clone(),
            THINK_DELAY_ENV => cli.think_delay_ms.map(|ms| ms.to_string()),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })?;
    Ok(config)
}

fn ask(
    assistant: &Assistant<SqliteKeyValueStore<'_>>,
    text: &str,
    think_delay: Duration,
) -> CliResult<()> {
    let mut session = assistant.session(think_delay);
    let ticket = session.submit(text)?;
    println!("{}", session.complete(ticket)?);
    Ok(())
}

fn todo(assistant: &Assistant<SqliteKeyValueStore<'_>>, command: TodoCommand) -> CliResult<()> {
    let todos = assistant.todos();
    match command {
        TodoCommand::Add { text } => {
            let todo = todos.add(&text.join(" "))?;
            println!("{}", todo.id);
        }
        TodoCommand::List { filter } => {
            for todo in todos.list(filter.into()) {
                let mark = if todo.completed { "x" } else { " " };
                println!(
                    "[{mark}] {} ({}) {}",
                    todo.id,
                    todo.priority.as_str(),
                    todo.text
                );
            }
            let counts = todos.counts();
            println!(
                "total={} active={} completed={}",
                counts.total, counts.active, counts.completed
            );
        }
        TodoCommand::Toggle { id } => {
            let todo = todos.toggle(&id)?;
            println!("{} completed={}", todo.id, todo.completed);
        }
        TodoCommand::Priority { id, priority } => {
            let todo = todos.set_priority(&id, priority.into())?;
            println!("{} priority={}", todo.id, todo.priority.as_str());
        }
        TodoCommand::Delete { id } => todos.delete(&id)?,
    }
    Ok(())
}

fn event(assistant: &Assistant<SqliteKeyValueStore<'_>>, command: EventCommand) -> CliResult<()> {
    let calendar = assistant.calendar();
    match command {
        EventCommand::Add {
            title,
            date,
            time,
            description,
        } => {
            let event = calendar.add(NewEvent {
                title,
                description,
                date: Some(date),
                time,
            })?;
            println!("{}", event.id);
        }
        EventCommand::List { date } => {
            let events = match date {
                Some(date) => calendar.on_date(date),
                None => calendar.all_sorted(),
            };
            for event in events {
                println!(
                    "{} {} {} {}",
                    event.id,
                    event.date,
                    event.time.as_deref().unwrap_or("--:--"),
                    event.title
                );
            }
        }
        EventCommand::Delete { id } => calendar.delete(&id)?,
    }
    Ok(())
}

fn note(assistant: &Assistant<SqliteKeyValueStore<'_>>, command: NoteCommand) -> CliResult<()> {
    let notes = assistant.notes();
    match command {
        NoteCommand::New => {
            let note = notes.create_blank()?;
            println!("{}", note.id);
        }
        NoteCommand::Edit {
            id,
            title,
            content,
            tags,
        } => {
            let note = notes.update(
                &id,
                NoteEdit {
                    title,
                    content,
                    tags,
                },
            )?;
            println!("{} updated_at={}", note.id, note.updated_at.to_rfc3339());
        }
        NoteCommand::List => print_notes(notes.list()),
        NoteCommand::Search { query } => print_notes(notes.search(&query)),
        NoteCommand::Delete { id } => notes.delete(&id)?,
    }
    Ok(())
}

fn print_notes(notes: Vec<jarvis_core::Note>) {
    for note in notes {
        let tags = if note.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", note.tags.join(" #"))
        };
        println!("{} {}{tags}", note.id, note.title);
    }
}

fn settings(assistant: &Assistant<SqliteKeyValueStore<'_>>, args: SettingsArgs) -> CliResult<()> {
    let storage = assistant.storage();
    let mut current: Settings = storage.settings();
    let changed = args.theme.is_some() || args.auto_save.is_some() || args.layout.is_some();
    if let Some(theme) = args.theme {
        current.theme = theme.into();
    }
    if let Some(auto_save) = args.auto_save {
        current.auto_save = auto_save;
    }
    if let Some(layout) = args.layout {
        current.layout = layout.into();
    }
    if changed {
        storage.save_settings(&current)?;
    }
    println!(
        "theme={} auto_save={} layout={}",
        current.theme.as_str(),
        current.auto_save,
        current.layout.as_str()
    );

    let summary = assistant.backup().summary();
    println!(
        "todos={} notes={} events={}",
        summary.todos, summary.notes, summary.events
    );
    Ok(())
}
