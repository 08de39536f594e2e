use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::clipboard::SystemClipboard;
use crate::dotenv::{parse_dotenv, write_env_file};
use crate::models::Entry;
use crate::store::{
    Database, KeyStore, NoBiometrics, SessionGate, get_active_profile, get_db_path,
    set_active_profile,
};
use crate::tui::{EditSession, Mode, Outcome, Screen, Services, Session, run_interactive};
use crate::utils::{ensure_keys_dir, format_path_with_tilde};

const NO_KEYS_MESSAGE: &str = "No keys stored. Use 'keys add <name> <value>' first.";

#[derive(Parser)]
#[command(name = "keys")]
#[command(version)]
#[command(about = "Manage API keys locally", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store an API key
    Add { name: String, value: String },
    /// Print the value of a stored key, or pick one interactively
    Get { name: Option<String> },
    /// Search and view stored keys, or add new ones
    See,
    /// View keys with masked values (press r to reveal)
    Peek,
    /// Edit a stored key
    Edit { name: String },
    /// Interactively select keys to write to a .env file
    Env,
    /// Delete a stored key
    Rm { name: String },
    /// Print export statements for all stored keys, or only the named ones
    Expose { names: Vec<String> },
    /// Import keys from a .env file
    Import { file: PathBuf },
    /// Delete all keys from the active profile
    Nuke,
    /// Manage key profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Print the version
    Version,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// List all profiles
    List,
    /// Switch to a profile
    Use { name: String },
}

impl Commands {
    /// Commands that never read keys skip the unlock prompt.
    fn requires_unlock(&self) -> bool {
        !matches!(
            self,
            Commands::Version | Commands::Profile { action: ProfileCommand::Use { .. } }
        )
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    if let Commands::Version = command {
        println!("keys {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let keys_dir = ensure_keys_dir()?;
    if command.requires_unlock() {
        SessionGate::new(&keys_dir).authenticate(&NoBiometrics)?;
    }

    if let Commands::Profile { action: ProfileCommand::Use { name } } = &command {
        set_active_profile(&keys_dir, name)?;
        println!("Switched to profile {:?}", name);
        return Ok(());
    }

    let mut ctx = CommandContext::open(&keys_dir)?;
    debug!(profile = %ctx.profile, "running command");

    match command {
        Commands::Add { name, value } => add(&mut ctx, &name, &value),
        Commands::Get { name } => get(&mut ctx, name.as_deref()),
        Commands::See => browse(&mut ctx, Mode::search()),
        Commands::Peek => browse(&mut ctx, Mode::peek()),
        Commands::Edit { name } => edit(&mut ctx, &name),
        Commands::Env => env(&mut ctx),
        Commands::Rm { name } => {
            ctx.db.delete(&ctx.profile, &name)?;
            println!("Deleted {}", name);
            Ok(())
        }
        Commands::Expose { names } => expose(&ctx, &names),
        Commands::Import { file } => import(&mut ctx, &file),
        Commands::Nuke => nuke(&mut ctx),
        Commands::Profile { action: ProfileCommand::List } => list_profiles(&ctx),
        Commands::Profile { action: ProfileCommand::Use { .. } } | Commands::Version => Ok(()),
    }
}

/// The open database and the profile every command works in.
struct CommandContext {
    db: Database,
    profile: String,
}

impl CommandContext {
    fn open(keys_dir: &Path) -> Result<Self> {
        let db_path = get_db_path(keys_dir);
        let db = Database::open(&db_path)
            .with_context(|| format!("Failed to open {}", format_path_with_tilde(&db_path)))?;
        Ok(Self { db, profile: get_active_profile(keys_dir) })
    }

    fn run_screen<S: Screen>(&mut self, screen: &mut S) -> Result<()> {
        let mut clipboard = SystemClipboard::new();
        let mut services = Services { store: &mut self.db, clipboard: &mut clipboard };
        run_interactive(screen, &mut services)
    }
}

/// Print `message`, then read one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn add(ctx: &mut CommandContext, name: &str, value: &str) -> Result<()> {
    if ctx.db.exists(&ctx.profile, name)? {
        let answer =
            prompt(&format!("Key {:?} already exists. [o]verwrite / [e]dit / [c]ancel: ", name))?;
        match answer.to_lowercase().as_str() {
            "o" => {}
            "e" => {
                println!("Run: keys edit {}", name);
                return Ok(());
            }
            _ => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    ctx.db.upsert(&ctx.profile, name, value)?;
    println!("Stored {}", name);
    Ok(())
}

fn get(ctx: &mut CommandContext, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        println!("{}", ctx.db.get(&ctx.profile, name)?.value);
        return Ok(());
    }

    let entries = ctx.db.list(&ctx.profile)?;
    if entries.is_empty() {
        println!("{}", NO_KEYS_MESSAGE);
        return Ok(());
    }

    let mut session = Session::new(entries, ctx.profile.clone(), Mode::picker());
    ctx.run_screen(&mut session)?;
    if let Some(Outcome::Picked(entry)) = session.into_outcome() {
        println!("{}", entry.value);
    }
    Ok(())
}

fn browse(ctx: &mut CommandContext, mode: Mode) -> Result<()> {
    let entries = ctx.db.list(&ctx.profile)?;
    let mut session = Session::new(entries, ctx.profile.clone(), mode);
    ctx.run_screen(&mut session)?;

    match session.into_outcome() {
        Some(Outcome::Saved(message)) => println!("{}", message),
        Some(Outcome::ExportRequested(entries)) => export_env_file(&entries)?,
        _ => {}
    }
    Ok(())
}

fn edit(ctx: &mut CommandContext, name: &str) -> Result<()> {
    let entry = ctx.db.get(&ctx.profile, name)?;
    let mut session = EditSession::new(&entry, ctx.profile.clone());
    ctx.run_screen(&mut session)?;

    match session.into_outcome() {
        Some(Outcome::Saved(message)) => println!("{}", message),
        Some(Outcome::Cancelled) => println!("Cancelled"),
        _ => {}
    }
    Ok(())
}

fn env(ctx: &mut CommandContext) -> Result<()> {
    let entries = ctx.db.list(&ctx.profile)?;
    if entries.is_empty() {
        println!("{}", NO_KEYS_MESSAGE);
        return Ok(());
    }

    let mut session = Session::new(entries, ctx.profile.clone(), Mode::selector());
    ctx.run_screen(&mut session)?;

    match session.into_outcome() {
        Some(Outcome::ExportRequested(selected)) if selected.is_empty() => {
            println!("No keys selected.");
        }
        Some(Outcome::ExportRequested(selected)) => export_env_file(&selected)?,
        _ => println!("Cancelled."),
    }
    Ok(())
}

/// Ask for a directory (default `.`) and write `entries` to its `.env`.
fn export_env_file(entries: &[Entry]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let answer = prompt("Directory for .env [.]: ")?;
    let dir = if answer.is_empty() { "." } else { answer.as_str() };
    let path = write_env_file(Path::new(dir), entries)?;
    println!("Wrote {} key(s) to {}", entries.len(), format_path_with_tilde(&path));
    Ok(())
}

fn expose(ctx: &CommandContext, names: &[String]) -> Result<()> {
    let entries = if names.is_empty() {
        ctx.db.list(&ctx.profile)?
    } else {
        ctx.db.get_many(&ctx.profile, names)?
    };

    for entry in &entries {
        println!("{}", entry.as_export());
    }
    Ok(())
}

fn import(ctx: &mut CommandContext, file: &Path) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut new_count = 0;
    let mut updated_count = 0;
    for (name, value) in parse_dotenv(&content) {
        let existed = ctx.db.exists(&ctx.profile, &name)?;
        ctx.db.upsert(&ctx.profile, &name, &value)?;
        if existed {
            updated_count += 1;
        } else {
            new_count += 1;
        }
    }

    println!(
        "Imported {} keys ({} new, {} updated)",
        new_count + updated_count,
        new_count,
        updated_count
    );
    Ok(())
}

fn nuke(ctx: &mut CommandContext) -> Result<()> {
    println!("This will delete ALL keys from profile {:?}.", ctx.profile);
    if prompt("Type 'nuke' to confirm: ")? != "nuke" {
        println!("Cancelled.");
        return Ok(());
    }

    let count = ctx.db.nuke(&ctx.profile)?;
    println!("Deleted {} key(s) from profile {:?}", count, ctx.profile);
    Ok(())
}

fn list_profiles(ctx: &CommandContext) -> Result<()> {
    let mut profiles = ctx.db.list_profiles()?;
    if !profiles.contains(&ctx.profile) {
        profiles.insert(0, ctx.profile.clone());
    }

    for profile in &profiles {
        let marker = if *profile == ctx.profile { "*" } else { " " };
        println!("{} {}", marker, profile);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unlock_skipped_for_version_and_profile_use() {
        assert!(!Commands::Version.requires_unlock());
        assert!(
            !Commands::Profile { action: ProfileCommand::Use { name: "work".into() } }
                .requires_unlock()
        );
        assert!(Commands::Profile { action: ProfileCommand::List }.requires_unlock());
        assert!(Commands::See.requires_unlock());
    }

    #[test]
    fn test_parse_expose_names() {
        let cli = Cli::try_parse_from(["keys", "expose", "A", "B"]).unwrap();
        match cli.command {
            Some(Commands::Expose { names }) => assert_eq!(names, vec!["A", "B"]),
            _ => panic!("expected expose"),
        }
    }
}
