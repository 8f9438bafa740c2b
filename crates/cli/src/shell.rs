//! Interactive menu shell.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use habitkit_core::Clock;
use habitkit_storage::Storage;
use habitkit_tracker::{HabitFilter, Tracker};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::RwLock;
use tracing::debug;

use crate::commands;

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Profile,
    ListAll,
    ListActive,
    ListCompleted,
    Add,
    Complete,
    Delete,
    Stats,
    Demo,
    Reset,
    Exit,
}

const MENU: &[(&str, MenuChoice)] = &[
    ("View profile", MenuChoice::Profile),
    ("List all habits", MenuChoice::ListAll),
    ("List active habits", MenuChoice::ListActive),
    ("List completed habits", MenuChoice::ListCompleted),
    ("Add habit", MenuChoice::Add),
    ("Complete habit", MenuChoice::Complete),
    ("Delete habit", MenuChoice::Delete),
    ("Show stats", MenuChoice::Stats),
    ("Demo mode", MenuChoice::Demo),
    ("Clear all data", MenuChoice::Reset),
];

/// Parse a menu selection. `0` exits; `1..` index [`MENU`].
pub fn parse_choice(input: &str) -> std::result::Result<MenuChoice, String> {
    let input = input.trim();
    let n: usize = input
        .parse()
        .map_err(|_| format!("\"{input}\" is not a number. Choose 0-{}.", MENU.len()))?;
    if n == 0 {
        return Ok(MenuChoice::Exit);
    }
    MENU.get(n - 1)
        .map(|(_, choice)| *choice)
        .ok_or_else(|| format!("{n} is not on the menu. Choose 0-{}.", MENU.len()))
}

/// Reads one line per prompt from `input`, writes to `out`.
pub struct Shell<S: Storage, C: Clock, R, W> {
    tracker: Arc<RwLock<Tracker<S, C>>>,
    input: R,
    out: W,
}

impl<S, C, R, W> Shell<S, C, R, W>
where
    S: Storage,
    C: Clock,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Create a shell over a shared tracker.
    pub fn new(tracker: Arc<RwLock<Tracker<S, C>>>, input: R, out: W) -> Self {
        Self { tracker, input, out }
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        {
            let tracker = self.tracker.read().await;
            writeln!(self.out, "Welcome, {}!", tracker.user().name)?;
        }

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an option: ").await? else {
                break;
            };
            let choice = match parse_choice(&line) {
                Ok(choice) => choice,
                Err(msg) => {
                    writeln!(self.out, "{msg}")?;
                    continue;
                }
            };
            debug!(?choice, "Menu selection");

            if choice == MenuChoice::Exit {
                break;
            }
            self.dispatch(choice).await?;
            writeln!(self.out)?;
        }

        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Profile => {
                commands::profile(&*self.tracker.read().await, &mut self.out)?;
            }
            MenuChoice::ListAll => self.list(HabitFilter::All).await?,
            MenuChoice::ListActive => self.list(HabitFilter::Active).await?,
            MenuChoice::ListCompleted => self.list(HabitFilter::Completed).await?,
            MenuChoice::Add => self.add().await?,
            MenuChoice::Complete => self.complete().await?,
            MenuChoice::Delete => self.delete().await?,
            MenuChoice::Stats => {
                commands::stats(&*self.tracker.read().await, &mut self.out)?;
            }
            MenuChoice::Demo => {
                commands::demo(&mut *self.tracker.write().await, &mut self.out).await?;
            }
            MenuChoice::Reset => self.reset().await?,
            MenuChoice::Exit => {}
        }
        Ok(())
    }

    async fn list(&mut self, filter: HabitFilter) -> Result<()> {
        commands::list(&*self.tracker.read().await, &mut self.out, filter)?;
        Ok(())
    }

    async fn add(&mut self) -> Result<()> {
        let name = loop {
            let Some(name) = self.prompt("Habit name: ").await? else {
                return Ok(());
            };
            if name.is_empty() {
                writeln!(self.out, "Name cannot be empty.")?;
                continue;
            }
            break name;
        };

        let target = loop {
            let Some(raw) = self.prompt("Times per week [1]: ").await? else {
                return Ok(());
            };
            if raw.is_empty() {
                break 1;
            }
            match raw.parse::<u32>() {
                Ok(n) if n >= 1 => break n,
                _ => writeln!(self.out, "Please enter a positive whole number.")?,
            }
        };

        let Some(category) = self.prompt("Category [General]: ").await? else {
            return Ok(());
        };
        let category = Some(category).filter(|c| !c.is_empty());

        commands::add(&mut *self.tracker.write().await, &mut self.out, &name, target, category)
            .await?;
        Ok(())
    }

    async fn complete(&mut self) -> Result<()> {
        if !self.show_numbered().await? {
            return Ok(());
        }
        let Some(raw) = self.prompt("Habit number to complete: ").await? else {
            return Ok(());
        };
        let Some(habit) = commands::parse_position(&raw) else {
            writeln!(self.out, "Please enter a number from the list.")?;
            return Ok(());
        };
        commands::complete(&mut *self.tracker.write().await, &mut self.out, &habit).await?;
        Ok(())
    }

    async fn delete(&mut self) -> Result<()> {
        if !self.show_numbered().await? {
            return Ok(());
        }
        let Some(raw) = self.prompt("Habit number to delete: ").await? else {
            return Ok(());
        };
        let Some(habit) = commands::parse_position(&raw) else {
            writeln!(self.out, "Please enter a number from the list.")?;
            return Ok(());
        };

        let name = self.tracker.read().await.habit(&habit).map(|h| h.name.clone());
        if let Some(name) = name {
            if !self.confirm(&format!("Delete \"{name}\"? [y/N]: ")).await? {
                writeln!(self.out, "Kept \"{name}\".")?;
                return Ok(());
            }
        }
        commands::delete(&mut *self.tracker.write().await, &mut self.out, &habit).await?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        if !self.confirm("Delete every habit and restart your profile? [y/N]: ").await? {
            writeln!(self.out, "Nothing changed.")?;
            return Ok(());
        }
        commands::reset(&mut *self.tracker.write().await, &mut self.out).await?;
        Ok(())
    }

    /// List all habits with numbers; `false` when there is nothing to pick.
    async fn show_numbered(&mut self) -> Result<bool> {
        let tracker = self.tracker.read().await;
        if tracker.is_empty() {
            writeln!(self.out, "No habits yet. Add one first.")?;
            return Ok(false);
        }
        commands::list(&*tracker, &mut self.out, HabitFilter::All)?;
        Ok(true)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(question).await?.unwrap_or_default();
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "=== Habit Tracker ===")?;
        for (i, (label, _)) in MENU.iter().enumerate() {
            writeln!(self.out, "{:>2}. {label}", i + 1)?;
        }
        writeln!(self.out, " 0. Exit")?;
        Ok(())
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
