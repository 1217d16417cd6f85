//! The interactive numbered menu.

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use rolodex_core::{
  contact::{ContactPatch, NewContact},
  query::{ContactFilter, SortKey},
};

use crate::app::{App, VcardTarget};

const MENU: &str = "
Rolodex
-------
1. Add contact
2. View all contacts
3. Search contacts
4. Update contact
5. Delete contact
6. Export contacts to JSON
7. Import contacts from JSON
8. Bulk import CSV
9. Export a contact to vCard
10. Create manual backup
11. Restore from backup
12. Undo last write
13. Merge duplicates
14. Export selected contacts to JSON by tag/favorites
15. Exit
";

/// Run the menu until the user picks Exit or input ends.
pub fn run<R: BufRead, W: Write>(app: &mut App<R, W>) -> io::Result<()> {
  let result = app.ensure_contacts_file();
  app.finish("startup", result)?;
  app
    .console()
    .say("Welcome to Rolodex: validation, dedupe, backups, undo, tags and vCard.")?;

  loop {
    app.console().say(MENU)?;
    let Some(choice) = app.console().ask("Choose an option (1-15): ")? else {
      break;
    };
    let (operation, result) = match choice.as_str() {
      "1" => ("add", add(app)),
      "2" => ("list", list(app)),
      "3" => ("search", search(app)),
      "4" => ("update", update(app)),
      "5" => ("delete", delete(app)),
      "6" => ("export_json", app.export_json(&ContactFilter::All, None)),
      "7" => ("import_json", app.import_json(None, false)),
      "8" => ("import_csv", import_csv(app)),
      "9" => ("export_vcard", export_vcard(app)),
      "10" => ("backup", app.backup()),
      "11" => ("restore", app.restore(None)),
      "12" => ("undo", app.undo()),
      "13" => ("dedupe", app.dedupe(None, false)),
      "14" => ("export_filtered_json", export_filtered(app)),
      "15" => break,
      _ => {
        app.console().say("Invalid choice.")?;
        continue;
      }
    };
    app.finish(operation, result)?;
  }

  app.console().say("Goodbye!")
}

// ─── Prompts ──────────────────────────────────────────────────────────────────

fn add<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let console = app.console();
  let Some(name) = console.ask_optional("Enter name: ")? else {
    console.say("Name cannot be empty.")?;
    return Ok(());
  };
  let input = NewContact {
    name,
    phone: console.ask("Enter phone number: ")?.unwrap_or_default(),
    email: console.ask("Enter email address: ")?.unwrap_or_default(),
    tags: console
      .ask("Tags (comma-separated, optional): ")?
      .unwrap_or_default(),
    favorite: console.confirm("Mark favorite? (y/N): ")?,
  };
  app.add(input)
}

fn list<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let raw = app
    .console()
    .ask("Sort by name/phone/email/favorite (default name): ")?
    .unwrap_or_default();
  match raw.parse::<SortKey>() {
    Ok(sort) => app.list(sort),
    Err(msg) => Ok(app.console().say(msg)?),
  }
}

fn search<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let query = app
    .console()
    .ask("Enter search term (or regex: /pattern/): ")?
    .unwrap_or_default();
  app.search(&query)
}

fn update<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let Some(name) = app
    .console()
    .ask_optional("Enter exact name of contact to update: ")?
  else {
    return Ok(());
  };
  app.update(&name, ContactPatch::default())
}

fn delete<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let Some(name) = app.console().ask_optional("Enter exact name to delete: ")? else {
    return Ok(());
  };
  app.delete(&name)
}

fn import_csv<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let Some(path) = app
    .console()
    .ask_optional("Path to CSV to import (will append): ")?
  else {
    return Ok(());
  };
  app.import_csv(&PathBuf::from(path))
}

fn export_vcard<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let Some(name) = app
    .console()
    .ask_optional("Enter exact name to export to vCard: ")?
  else {
    return Ok(());
  };
  app.export_vcard(&VcardTarget::One(name))
}

fn export_filtered<R: BufRead, W: Write>(app: &mut App<R, W>) -> anyhow::Result<()> {
  let raw = app
    .console()
    .ask("Filter by tag name (t:tag) or favorite (f) or ALL: ")?
    .unwrap_or_default();
  let Some(filter) = parse_filter(&raw) else {
    app.console().say("Unknown filter.")?;
    return Ok(());
  };
  let out = app
    .console()
    .ask_optional("Filename to save (default filtered_contacts.json): ")?
    .unwrap_or_else(|| "filtered_contacts.json".to_string());
  app.export_json(&filter, Some(&PathBuf::from(out)))
}

/// `ALL` (or blank), `f`, or `t:<tag>`.
fn parse_filter(raw: &str) -> Option<ContactFilter> {
  let raw = raw.trim();
  if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
    return Some(ContactFilter::All);
  }
  if raw.eq_ignore_ascii_case("f") {
    return Some(ContactFilter::Favorites);
  }
  let tag = raw
    .strip_prefix("t:")
    .or_else(|| raw.strip_prefix("T:"))?
    .trim();
  (!tag.is_empty()).then(|| ContactFilter::Tag(tag.to_string()))
}
