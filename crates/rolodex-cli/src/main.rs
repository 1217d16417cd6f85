//! `rolodex` — a personal contact book kept in a CSV file.
//!
//! # Usage
//!
//! ```text
//! rolodex                      # interactive menu
//! rolodex add "Jon Smith" --phone 555-123-4567 --tags work
//! rolodex list --sort favorite
//! rolodex dedupe --threshold 0.85
//! rolodex --config ~/.config/rolodex.toml undo
//! ```
//!
//! Settings come from an optional TOML file, then `ROLODEX_*` environment
//! variables, then command-line flags.

mod app;
mod console;
mod error_log;
mod menu;
mod ui;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  process::ExitCode,
};

use anyhow::{Context as _, Result};
use app::{App, VcardTarget};
use clap::{Parser, Subcommand};
use console::Console;
use rolodex_core::{
  config::RolodexConfig,
  contact::{ContactPatch, NewContact},
  query::{ContactFilter, SortKey},
};
use rolodex_store_fs::Repository;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "A personal contact book")]
struct Args {
  /// Path to a TOML config file. Missing is fine.
  #[arg(short, long, value_name = "FILE", default_value = "rolodex.toml")]
  config: PathBuf,

  /// Contact CSV file (overrides the config file).
  #[arg(long, value_name = "FILE", env = "ROLODEX_CONTACTS")]
  contacts: Option<PathBuf>,

  /// Name similarity above which two contacts count as duplicates.
  #[arg(long)]
  threshold: Option<f64>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Add a contact.
  Add {
    name:     String,
    #[arg(long, default_value = "")]
    phone:    String,
    #[arg(long, default_value = "")]
    email:    String,
    /// Comma-separated.
    #[arg(long, default_value = "")]
    tags:     String,
    #[arg(long)]
    favorite: bool,
  },
  /// Show all contacts.
  List {
    /// name, phone, email or favorite.
    #[arg(long, default_value = "name")]
    sort: SortKey,
  },
  /// Search name, phone, email and tags. Wrap in slashes for a regex.
  Search { query: String },
  /// Change fields of a contact; with no flags, prompts for each.
  Update {
    name:     String,
    #[arg(long)]
    phone:    Option<String>,
    #[arg(long)]
    email:    Option<String>,
    #[arg(long)]
    tags:     Option<String>,
    #[arg(long)]
    favorite: Option<bool>,
  },
  /// Delete every contact with this name.
  Delete { name: String },
  /// Write contacts to a JSON file.
  ExportJson {
    /// Only contacts with this tag.
    #[arg(long, conflicts_with = "favorites")]
    tag:       Option<String>,
    /// Only favorites.
    #[arg(long)]
    favorites: bool,
    #[arg(long, value_name = "FILE")]
    out:       Option<PathBuf>,
  },
  /// Replace all contacts with those in a JSON file.
  ImportJson {
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Skip the confirmation.
    #[arg(long)]
    yes:  bool,
  },
  /// Append contacts from another CSV file.
  ImportCsv { file: PathBuf },
  /// Write vCard files.
  ExportVcard {
    #[arg(required_unless_present = "all")]
    name: Option<String>,
    #[arg(long, conflicts_with = "name")]
    all:  bool,
  },
  /// Copy the contact file into the backup directory.
  Backup,
  /// List backups, newest first.
  Backups,
  /// Restore a backup by its number in `backups` (prompts when omitted).
  Restore { number: Option<usize> },
  /// Revert the last write.
  Undo,
  /// Find and merge near-duplicate contacts.
  Dedupe {
    #[arg(long)]
    threshold: Option<f64>,
    /// Merge every candidate without asking.
    #[arg(long)]
    auto:      bool,
  },
  /// Interactive menu (the default).
  Menu,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  let config = load_config(&args)?;
  tracing::debug!(?config, "loaded configuration");

  let repo = Repository::new(&config);
  let console = Console::new(io::stdin().lock(), io::stdout().lock());
  let mut app = App::new(config, repo, console);

  let ok = run(&mut app, args.command.unwrap_or(Command::Menu))?;
  Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn load_config(args: &Args) -> Result<RolodexConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(args.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("ROLODEX"))
    .build()
    .context("failed to read config file")?;

  let mut config: RolodexConfig = settings
    .try_deserialize()
    .context("failed to deserialise RolodexConfig")?;

  if let Some(contacts) = &args.contacts {
    config.contacts_file = contacts.clone();
  }
  if let Some(threshold) = args.threshold {
    config.merge_threshold = threshold;
  }
  Ok(config)
}

/// Dispatch one subcommand. Returns whether it succeeded.
fn run<R: BufRead, W: Write>(
  app: &mut App<R, W>,
  command: Command,
) -> io::Result<bool> {
  let (operation, result) = match command {
    Command::Menu => {
      menu::run(app)?;
      return Ok(true);
    }
    Command::Add {
      name,
      phone,
      email,
      tags,
      favorite,
    } => (
      "add",
      app.add(NewContact {
        name,
        phone,
        email,
        tags,
        favorite,
      }),
    ),
    Command::List { sort } => ("list", app.list(sort)),
    Command::Search { query } => ("search", app.search(&query)),
    Command::Update {
      name,
      phone,
      email,
      tags,
      favorite,
    } => (
      "update",
      app.update(&name, ContactPatch {
        phone,
        email,
        tags,
        favorite,
      }),
    ),
    Command::Delete { name } => ("delete", app.delete(&name)),
    Command::ExportJson {
      tag,
      favorites,
      out,
    } => {
      let filter = match (tag, favorites) {
        (Some(tag), _) => ContactFilter::Tag(tag),
        (None, true) => ContactFilter::Favorites,
        (None, false) => ContactFilter::All,
      };
      ("export_json", app.export_json(&filter, out.as_deref()))
    }
    Command::ImportJson { file, yes } => {
      ("import_json", app.import_json(file.as_deref(), yes))
    }
    Command::ImportCsv { file } => ("import_csv", app.import_csv(&file)),
    Command::ExportVcard { name, all } => {
      let target = match name {
        Some(name) if !all => VcardTarget::One(name),
        _ => VcardTarget::All,
      };
      ("export_vcard", app.export_vcard(&target))
    }
    Command::Backup => ("backup", app.backup()),
    Command::Backups => ("backups", app.list_backups()),
    Command::Restore { number } => ("restore", app.restore(number)),
    Command::Undo => ("undo", app.undo()),
    Command::Dedupe { threshold, auto } => ("dedupe", app.dedupe(threshold, auto)),
  };
  app.finish(operation, result)
}
