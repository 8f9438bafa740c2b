//! habitkit - personal habit tracker.

mod commands;
mod config;
mod demo;
mod reminder;
mod render;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use habitkit_core::SystemClock;
use habitkit_storage::JsonStorage;
use habitkit_tracker::{HabitFilter, Tracker};
use tokio::io::BufReader;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ShellConfig;
use crate::reminder::ReminderTask;
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "habitkit")]
#[command(about = "Track habits against a weekly target", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the tracker data
    #[arg(short, long, default_value = ".habitkit")]
    storage: std::path::PathBuf,

    /// Your name, used when creating a new profile
    #[arg(short, long)]
    user: Option<String>,

    /// Seconds between reminders in the shell (0 disables)
    #[arg(long, default_value = "60")]
    remind_every: u64,

    /// Log more detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,
    /// Add a new habit
    Add {
        /// Habit name
        name: String,
        /// Completions per week
        #[arg(short, long, default_value = "1")]
        target: u32,
        /// Category label
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List habits
    List {
        /// all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: HabitFilter,
    },
    /// Mark a habit complete for today
    Complete {
        /// Habit number as shown by `list`
        number: String,
    },
    /// Delete a habit
    Delete {
        /// Habit number as shown by `list`
        number: String,
    },
    /// Show summary statistics
    Stats,
    /// Show the user profile
    Profile,
    /// Add sample habits with history
    Demo,
    /// Delete every habit and restart the profile
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    // Logs go to stderr so they never mix with menu output.
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ShellConfig::new(cli.storage, cli.user, cli.remind_every);
    let storage = JsonStorage::new(config.document_path());
    let mut tracker = Tracker::open(storage, SystemClock, config.user_name.clone()).await;
    info!(path = %config.document_path().display(), "Tracker ready");

    let mut out = std::io::stdout();
    let ok = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            run_shell(tracker, &config).await?;
            true
        }
        Commands::Add { name, target, category } => {
            commands::add(&mut tracker, &mut out, &name, target, category).await?
        }
        Commands::List { filter } => commands::list(&tracker, &mut out, filter)?,
        Commands::Complete { number } => match commands::parse_position(&number) {
            Some(habit) => commands::complete(&mut tracker, &mut out, &habit).await?,
            None => {
                eprintln!("Invalid habit number: {number}");
                false
            }
        },
        Commands::Delete { number } => match commands::parse_position(&number) {
            Some(habit) => commands::delete(&mut tracker, &mut out, &habit).await?,
            None => {
                eprintln!("Invalid habit number: {number}");
                false
            }
        },
        Commands::Stats => commands::stats(&tracker, &mut out)?,
        Commands::Profile => commands::profile(&tracker, &mut out)?,
        Commands::Demo => commands::demo(&mut tracker, &mut out).await?,
        Commands::Reset { yes } => {
            if yes {
                commands::reset(&mut tracker, &mut out).await?
            } else {
                eprintln!("Refusing to clear data without --yes");
                false
            }
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run_shell(tracker: Tracker<JsonStorage, SystemClock>, config: &ShellConfig) -> Result<()> {
    let tracker = Arc::new(RwLock::new(tracker));

    let reminders = config.remind_every.map(|every| {
        ReminderTask::start(Arc::clone(&tracker), every, |line| println!("\n{line}"))
    });

    let input = BufReader::new(tokio::io::stdin());
    let result = Shell::new(Arc::clone(&tracker), input, std::io::stdout())
        .run()
        .await
        .context("interactive shell failed");

    if let Some(task) = reminders {
        task.stop().await;
    }
    result
}
