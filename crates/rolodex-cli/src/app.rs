//! Contact-book operations behind both the subcommands and the menu.
//!
//! Every operation loads the collection fresh, works on it in memory and, if
//! the user went through with it, persists it with one
//! [`Repository::commit`]. Cancelling before that point leaves the contact
//! file, the snapshot and the backups as they were.

use std::{
  io::{self, BufRead, Write},
  path::Path,
};

use anyhow::{Context as _, Result};
use rolodex_core::{
  config::RolodexConfig,
  contact::{Contact, ContactPatch, NewContact},
  dedupe::{DuplicateResolver, MergeDecision, MergePolicy},
  query::{ContactFilter, SearchQuery, SortKey},
  store::ContactStore,
  validate::ValidationWarning,
};
use rolodex_store_fs::{CsvStore, Repository};

use crate::{
  console::{Console, PromptPolicy},
  error_log::{self, ErrorLog},
  ui,
};

/// Which contacts `export-vcard` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcardTarget {
  One(String),
  All,
}

pub struct App<R, W> {
  config:  RolodexConfig,
  repo:    Repository,
  console: Console<R, W>,
  log:     ErrorLog,
}

impl<R: BufRead, W: Write> App<R, W> {
  pub fn new(config: RolodexConfig, repo: Repository, console: Console<R, W>) -> Self {
    let log = ErrorLog::new(&config.error_log);
    Self {
      config,
      repo,
      console,
      log,
    }
  }

  pub fn console(&mut self) -> &mut Console<R, W> { &mut self.console }

  /// Report the outcome of `operation` to the user. Unexpected failures are
  /// also appended to the error log. Returns whether it succeeded.
  pub fn finish(&mut self, operation: &str, result: Result<()>) -> io::Result<bool> {
    let Err(err) = result else {
      return Ok(true);
    };
    if error_log::is_expected(&err) {
      self.console.say(format!("{err:#}"))?;
      return Ok(false);
    }
    tracing::debug!(operation, error = %format!("{err:#}"), "operation failed");
    if let Err(e) = self.log.record(operation, &err) {
      tracing::warn!(error = %e, "could not write to error log");
    }
    self.console.say(format!(
      "{operation} failed. See {} for details.",
      self.log.path().display()
    ))?;
    Ok(false)
  }

  fn load(&self) -> Result<ContactStore> {
    let contacts = self.repo.load().context("reading contacts")?;
    Ok(ContactStore::new(contacts))
  }

  fn commit(&self, store: &ContactStore) -> Result<()> {
    self
      .repo
      .commit(store.contacts())
      .context("saving contacts")?;
    Ok(())
  }

  fn warn_all(&mut self, warnings: &[ValidationWarning]) -> io::Result<()> {
    for line in ui::contact_detail::warnings(warnings) {
      self.console.say(line)?;
    }
    Ok(())
  }

  // ── Editing ───────────────────────────────────────────────────────────

  /// Add a contact. When similar names already exist the user may merge
  /// into the closest one, add anyway (the default) or cancel.
  pub fn add(&mut self, input: NewContact) -> Result<()> {
    let mut store = self.load()?;
    let close: Vec<String> = store
      .close_matches(
        input.name.trim(),
        self.config.suggest_limit,
        self.config.suggest_cutoff,
      )
      .into_iter()
      .map(|(name, _)| name.to_string())
      .collect();

    let mut merge_into = None;
    if let Some(closest) = close.first() {
      self
        .console
        .say(format!("Similar existing names found: {}", close.join(", ")))?;
      let choice = self
        .console
        .ask("Type M to merge, A to add as new, or C to cancel [A]: ")?
        .map(|s| s.to_uppercase());
      match choice.as_deref() {
        Some("M") => merge_into = Some(closest.clone()),
        Some("C") | None => {
          self.console.say("Add cancelled.")?;
          return Ok(());
        }
        Some(_) => {}
      }
    }

    let warnings = match &merge_into {
      Some(existing) => store.absorb_into(existing, input)?,
      None => store.add(input)?,
    };
    self.warn_all(&warnings)?;
    self.commit(&store)?;
    self.console.say(match merge_into {
      Some(_) => "Merged into existing contact.",
      None => "Contact added successfully.",
    })?;
    Ok(())
  }

  /// Update the contact named `name`. An empty `patch` asks for each field,
  /// where a blank answer keeps the current value.
  pub fn update(&mut self, name: &str, patch: ContactPatch) -> Result<()> {
    let mut store = self.load()?;
    let current = store
      .find(name)
      .cloned()
      .ok_or_else(|| rolodex_core::Error::ContactNotFound(name.to_string()))?;

    let patch = if patch.is_empty() {
      self.prompt_patch(&current)?
    } else {
      patch
    };
    if patch.is_empty() {
      self.console.say("Nothing to update.")?;
      return Ok(());
    }

    let warnings = store.update(name, &patch)?;
    self.warn_all(&warnings)?;
    self.commit(&store)?;
    self.console.say("Contact updated.")?;
    Ok(())
  }

  fn prompt_patch(&mut self, current: &Contact) -> io::Result<ContactPatch> {
    self.console.say("Current:")?;
    self.console.say(ui::contact_detail::detail(current))?;
    Ok(ContactPatch {
      phone:    self.console.ask_optional(&format!(
        "New phone (leave empty to keep '{}'): ",
        current.phone
      ))?,
      email:    self.console.ask_optional(&format!(
        "New email (leave empty to keep '{}'): ",
        current.email
      ))?,
      tags:     self.console.ask_optional(&format!(
        "New tags (leave empty to keep '{}'): ",
        current.tags
      ))?,
      favorite: self.console.ask_flag(&format!(
        "Mark favorite? (y/n, leave empty to keep '{}'): ",
        if current.favorite { "yes" } else { "no" }
      ))?,
    })
  }

  /// Remove every contact named `name`.
  pub fn delete(&mut self, name: &str) -> Result<()> {
    let mut store = self.load()?;
    let removed = store.remove(name)?;
    self.commit(&store)?;
    self.console.say(match removed {
      1 => format!("Deleted contact '{name}'."),
      n => format!("Deleted {n} contacts named '{name}'."),
    })?;
    Ok(())
  }

  // ── Viewing ───────────────────────────────────────────────────────────

  pub fn list(&mut self, sort: SortKey) -> Result<()> {
    let store = self.load()?;
    let table = ui::contact_list::table(&store.sorted(sort));
    self.console.say(table)?;
    Ok(())
  }

  /// Plain text matches as a substring; `/pattern/` as a regex.
  pub fn search(&mut self, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
      self.console.say("Empty query.")?;
      return Ok(());
    }
    let query = SearchQuery::parse(raw)?;
    let store = self.load()?;
    let table = ui::contact_list::table(&store.search(&query));
    self.console.say(table)?;
    Ok(())
  }

  // ── Import / export ───────────────────────────────────────────────────

  /// Export the contacts selected by `filter` to `out`, or to the configured
  /// JSON file.
  pub fn export_json(&mut self, filter: &ContactFilter, out: Option<&Path>) -> Result<()> {
    let store = self.load()?;
    let selected = store.filter(filter);
    if selected.is_empty() && *filter != ContactFilter::All {
      self.console.say("No contacts match filter.")?;
      return Ok(());
    }
    let path = out.unwrap_or(&self.config.json_file);
    let count = rolodex_store_fs::export_json(path, selected)
      .with_context(|| format!("exporting to {}", path.display()))?;
    self
      .console
      .say(format!("Exported {count} contacts to {}.", path.display()))?;
    Ok(())
  }

  /// Replace the whole collection with the contacts in a JSON file. Unless
  /// `assume_yes`, the user must type `YES`.
  pub fn import_json(&mut self, file: Option<&Path>, assume_yes: bool) -> Result<()> {
    let path = file.unwrap_or(&self.config.json_file).to_path_buf();
    let incoming = rolodex_store_fs::import_json(&path)?;
    if incoming.is_empty() {
      self.console.say("JSON contains no valid contacts.")?;
      return Ok(());
    }
    if !assume_yes {
      let answer = self
        .console
        .ask("This will overwrite current CSV contacts. Type YES to proceed: ")?;
      if answer.as_deref() != Some("YES") {
        self.console.say("Import cancelled.")?;
        return Ok(());
      }
    }
    let count = incoming.len();
    self.commit(&ContactStore::new(incoming))?;
    self
      .console
      .say(format!("Imported {count} contacts from {}.", path.display()))?;
    Ok(())
  }

  /// Append the valid rows of another CSV file.
  pub fn import_csv(&mut self, file: &Path) -> Result<()> {
    let incoming = CsvStore::read_import(file)?;
    if incoming.is_empty() {
      self.console.say("No valid contacts in file.")?;
      return Ok(());
    }
    let count = incoming.len();
    let mut store = self.load()?;
    store.extend(incoming);
    self.commit(&store)?;
    self.console.say(format!("Imported {count} contacts."))?;
    Ok(())
  }

  pub fn export_vcard(&mut self, target: &VcardTarget) -> Result<()> {
    let store = self.load()?;
    let selected: Vec<&Contact> = match target {
      VcardTarget::One(name) => vec![
        store
          .find(name)
          .ok_or_else(|| rolodex_core::Error::ContactNotFound(name.clone()))?,
      ],
      VcardTarget::All => store.contacts().iter().collect(),
    };
    if selected.is_empty() {
      self.console.say("No contacts to export.")?;
      return Ok(());
    }
    for contact in selected {
      let path = rolodex_vcard::export(contact, &self.config.vcard_dir)?;
      self
        .console
        .say(format!("Exported vCard to {}.", path.display()))?;
    }
    Ok(())
  }

  // ── Backups and undo ──────────────────────────────────────────────────

  pub fn backup(&mut self) -> Result<()> {
    let handle = self.repo.create_backup()?;
    self
      .console
      .say(format!("Backup created: {}", handle.path.display()))?;
    Ok(())
  }

  pub fn list_backups(&mut self) -> Result<()> {
    let backups = self.repo.list_backups()?;
    self.console.say(ui::backup_list(&backups))?;
    Ok(())
  }

  /// Restore backup number `choice` (1 = newest). Without a choice the list
  /// is shown and the user picks one.
  pub fn restore(&mut self, choice: Option<usize>) -> Result<()> {
    let backups = self.repo.list_backups()?;
    if backups.is_empty() {
      self.console.say(ui::backup_list(&backups))?;
      return Ok(());
    }

    let choice = match choice {
      Some(n) => Some(n),
      None => {
        self.console.say(ui::backup_list(&backups))?;
        match self
          .console
          .ask("Choose number to restore or C to cancel: ")?
          .as_deref()
        {
          None => None,
          Some(answer) if answer.eq_ignore_ascii_case("c") => None,
          Some(answer) => Some(answer.parse().unwrap_or(0)),
        }
      }
    };
    let Some(n) = choice else {
      self.console.say("Restore cancelled.")?;
      return Ok(());
    };
    let Some(handle) = n.checked_sub(1).and_then(|i| backups.get(i)) else {
      self.console.say("Invalid choice.")?;
      return Ok(());
    };

    self.repo.restore_backup(handle)?;
    self
      .console
      .say(format!("Restored backup from {}", handle.path.display()))?;
    Ok(())
  }

  pub fn undo(&mut self) -> Result<()> {
    self.repo.undo()?;
    self
      .console
      .say("Undo successful: previous contacts restored.")?;
    Ok(())
  }

  // ── Duplicates ────────────────────────────────────────────────────────

  /// Scan for near-duplicate names. With `auto` every qualifying pair is
  /// merged; otherwise each one is put to the user.
  pub fn dedupe(&mut self, threshold: Option<f64>, auto: bool) -> Result<()> {
    let store = self.load()?;
    if store.len() < 2 {
      self
        .console
        .say("Not enough contacts to check duplicates.")?;
      return Ok(());
    }

    let resolver = DuplicateResolver::new(threshold.unwrap_or(self.config.merge_threshold));
    let mut merge_all = |_: &Contact, _: &Contact, _: f64| MergeDecision::MergeAll;
    let mut prompt;
    let policy: &mut dyn MergePolicy = if auto {
      &mut merge_all
    } else {
      prompt = PromptPolicy::new(&mut self.console);
      &mut prompt
    };
    let outcome = resolver.find_and_merge(store.into_contacts(), policy);

    if outcome.aborted {
      self
        .console
        .say("Duplicate merge cancelled; nothing was saved.")?;
      return Ok(());
    }
    if outcome.merged == 0 {
      self.console.say("No merges performed.")?;
      return Ok(());
    }
    self.commit(&ContactStore::new(outcome.contacts))?;
    self.console.say(format!(
      "Merged {} duplicate(s) and saved.",
      outcome.merged
    ))?;
    Ok(())
  }

  /// Create the contact file with its header if it does not exist yet.
  pub fn ensure_contacts_file(&self) -> Result<()> {
    self
      .repo
      .store()
      .ensure_exists()
      .context("creating contacts file")?;
    Ok(())
  }
}
