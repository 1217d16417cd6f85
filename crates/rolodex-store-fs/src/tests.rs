//! Integration tests for the filesystem backend against temp directories.

use std::{cell::Cell, fs, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime};
use rolodex_core::{
  config::RolodexConfig,
  contact::{Contact, NewContact},
  store::PersistenceGateway,
};
use tempfile::TempDir;

use crate::{CsvStore, Error, Repository, SnapshotManager, export_json, import_json};

fn contact(name: &str, phone: &str, tags: &str, favorite: bool) -> Contact {
  NewContact {
    name: name.into(),
    phone: phone.into(),
    tags: tags.into(),
    favorite,
    ..NewContact::default()
  }
  .normalize()
  .unwrap()
  .0
}

fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2026, 10, day)
    .unwrap()
    .and_hms_opt(h, m, s)
    .unwrap()
}

struct Fixture {
  dir:    TempDir,
  config: RolodexConfig,
  now:    Rc<Cell<NaiveDateTime>>,
}

impl Fixture {
  fn new() -> Self {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = RolodexConfig::rooted_at(dir.path());
    Self {
      dir,
      config,
      now: Rc::new(Cell::new(at(19, 9, 0, 0))),
    }
  }

  fn repo(&self) -> Repository {
    let now = Rc::clone(&self.now);
    Repository::new(&self.config).with_clock(move || now.get())
  }

  fn backup_count(&self) -> usize {
    fs::read_dir(&self.config.backup_dir)
      .map(|entries| entries.count())
      .unwrap_or(0)
  }
}

// ─── CSV gateway ─────────────────────────────────────────────────────────────

#[test]
fn missing_file_loads_as_empty() {
  let fx = Fixture::new();
  let store = CsvStore::new(&fx.config.contacts_file);
  assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips() {
  let fx = Fixture::new();
  let store = CsvStore::new(&fx.config.contacts_file);
  let contacts = vec![
    contact("Jo March", "555-123-4567", "writer, family", true),
    contact("Laurie, Theodore", "", "", false),
    contact("Amy \"the artist\" March", "5559876543", "art", false),
  ];

  store.save(&contacts).unwrap();
  assert_eq!(store.load().unwrap(), contacts);
}

#[test]
fn saved_file_has_fixed_header_and_numeric_favorite() {
  let fx = Fixture::new();
  let store = CsvStore::new(&fx.config.contacts_file);
  store.save(&[contact("Jo", "5551234567", "b,a", true)]).unwrap();

  let text = fs::read_to_string(&fx.config.contacts_file).unwrap();
  let mut lines = text.lines();
  assert_eq!(lines.next(), Some("name,phone,email,tags,favorite"));
  assert_eq!(lines.next(), Some("Jo,5551234567,,\"a,b\",1"));
}

#[test]
fn load_accepts_loose_favorite_values_and_skips_blank_names() {
  let fx = Fixture::new();
  fs::write(
    &fx.config.contacts_file,
    "name,phone,email,tags,favorite\n\
     A,555-000-1111,,,TRUE\n\
     ,5550002222,,,1\n\
     B,,,,y\n\
     C,,,,nope\n",
  )
  .unwrap();

  let contacts = CsvStore::new(&fx.config.contacts_file).load().unwrap();
  let flags: Vec<_> = contacts.iter().map(|c| (c.name.as_str(), c.favorite)).collect();
  assert_eq!(flags, [("A", true), ("B", true), ("C", false)]);
  assert_eq!(contacts[0].phone, "5550001111");
}

#[test]
fn save_leaves_no_temp_files_behind() {
  let fx = Fixture::new();
  let store = CsvStore::new(&fx.config.contacts_file);
  store.save(&[contact("Jo", "", "", false)]).unwrap();
  store.save(&[contact("Meg", "", "", false)]).unwrap();

  let names: Vec<_> = fs::read_dir(fx.dir.path())
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  assert_eq!(names, ["contacts.csv"]);
}

#[test]
fn bulk_import_of_missing_file_is_not_found() {
  let fx = Fixture::new();
  let err = CsvStore::read_import(&fx.dir.path().join("nope.csv")).unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

// ─── Snapshot / undo ─────────────────────────────────────────────────────────

#[test]
fn undo_restores_only_the_state_before_the_last_write() {
  let fx = Fixture::new();
  let repo = fx.repo();
  let w1 = vec![contact("Jo", "", "", false)];
  let w2 = vec![contact("Jo", "", "", false), contact("Meg", "", "", false)];
  let w3 = vec![contact("Beth", "", "", false)];

  repo.commit(&w1).unwrap();
  repo.commit(&w2).unwrap();
  repo.commit(&w3).unwrap();

  let restored = repo.undo().unwrap();
  assert_eq!(restored, w2);
  assert_eq!(repo.load().unwrap(), w2);

  assert!(matches!(repo.undo(), Err(Error::NoSnapshot)));
  assert_eq!(repo.load().unwrap(), w2);
}

#[test]
fn undo_after_first_write_restores_empty_collection() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();

  assert!(repo.undo().unwrap().is_empty());
  assert!(repo.load().unwrap().is_empty());
}

#[test]
fn undo_without_snapshot_fails() {
  let fx = Fixture::new();
  assert!(matches!(fx.repo().undo(), Err(Error::NoSnapshot)));
}

#[test]
fn snapshot_failure_does_not_block_the_write() {
  let mut fx = Fixture::new();
  // A directory where the snapshot file should be makes capture fail.
  let blocked = fx.dir.path().join("snapshot-is-a-dir");
  fs::create_dir_all(blocked.join("inner")).unwrap();
  fx.config.snapshot_file = blocked;

  let repo = fx.repo();
  let contacts = vec![contact("Jo", "", "", false)];
  repo.commit(&contacts).unwrap();
  assert_eq!(repo.load().unwrap(), contacts);
}

#[test]
fn snapshot_file_is_a_json_array_with_boolean_favorite() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "5551234567", "x", true)]).unwrap();
  repo.commit(&[]).unwrap();

  let raw = fs::read_to_string(&fx.config.snapshot_file).unwrap();
  let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(doc[0]["name"], "Jo");
  assert_eq!(doc[0]["tags"], "x");
  assert_eq!(doc[0]["favorite"], true);
}

// ─── Backups ─────────────────────────────────────────────────────────────────

#[test]
fn first_write_without_live_file_makes_no_backup() {
  let fx = Fixture::new();
  let report = fx.repo().commit(&[contact("Jo", "", "", false)]).unwrap();
  assert!(report.backup.is_none());
  assert_eq!(fx.backup_count(), 0);
}

#[test]
fn automatic_backup_happens_once_per_day() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();

  let first = repo.commit(&[contact("Meg", "", "", false)]).unwrap();
  fx.now.set(at(19, 17, 30, 0));
  let second = repo.commit(&[contact("Beth", "", "", false)]).unwrap();

  let handle = first.backup.expect("first write of the day backs up");
  assert_eq!(handle.file_name, "contacts_backup_20261019_090000.csv");
  assert!(second.backup.is_none());
  assert_eq!(fx.backup_count(), 1);

  fx.now.set(at(20, 8, 0, 0));
  let next_day = repo.commit(&[contact("Amy", "", "", false)]).unwrap();
  assert!(next_day.backup.is_some());
  assert_eq!(fx.backup_count(), 2);
}

#[test]
fn dated_backup_copies_pre_write_content() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();
  let before = fs::read(&fx.config.contacts_file).unwrap();

  let report = repo.commit(&[contact("Meg", "", "", false)]).unwrap();
  let backup = report.backup.unwrap();
  assert_eq!(fs::read(&backup.path).unwrap(), before);
}

#[test]
fn manual_backup_always_adds_one() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();
  repo.commit(&[contact("Meg", "", "", false)]).unwrap();
  assert_eq!(fx.backup_count(), 1);

  let a = repo.create_backup().unwrap();
  let b = repo.create_backup().unwrap();
  assert_ne!(a.path, b.path);
  assert_eq!(fx.backup_count(), 3);
}

#[test]
fn manual_backup_without_live_file_is_not_found() {
  let fx = Fixture::new();
  assert!(matches!(fx.repo().create_backup(), Err(Error::NotFound(_))));
}

#[test]
fn backups_are_listed_newest_first() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();

  for (day, hour) in [(3, 10), (12, 8), (7, 23)] {
    fx.now.set(at(day, hour, 0, 0));
    repo.create_backup().unwrap();
  }

  let listed: Vec<_> = repo
    .list_backups()
    .unwrap()
    .into_iter()
    .map(|b| b.created_at.unwrap())
    .collect();
  assert_eq!(listed, [at(12, 8, 0, 0), at(7, 23, 0, 0), at(3, 10, 0, 0)]);
}

#[test]
fn same_second_backups_list_by_numeric_suffix() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();

  let made: Vec<_> = (0..12).map(|_| repo.create_backup().unwrap()).collect();
  assert_eq!(made[11].file_name, "contacts_backup_20261019_090000_11.csv");

  let listed = repo.list_backups().unwrap();
  assert_eq!(listed.len(), 12);
  assert_eq!(listed[0].path, made[11].path);
  assert_eq!(listed[1].path, made[10].path);
  assert_eq!(listed[2].path, made[9].path);
  assert_eq!(listed[11].path, made[0].path);
}

#[test]
fn failed_save_keeps_previous_file() {
  let fx = Fixture::new();
  let store = CsvStore::new(&fx.config.contacts_file);
  store.save(&[contact("Jo", "", "", false)]).unwrap();
  let before = fs::read(&fx.config.contacts_file).unwrap();

  // A directory where the temp file goes makes the write fail.
  let tmp = fx
    .dir
    .path()
    .join(format!(".contacts.csv.tmp.{}", std::process::id()));
  fs::create_dir_all(tmp.join("inner")).unwrap();

  assert!(matches!(
    store.save(&[contact("Meg", "", "", false)]),
    Err(Error::Persistence { .. })
  ));
  assert_eq!(fs::read(&fx.config.contacts_file).unwrap(), before);
  assert_eq!(store.load().unwrap()[0].name, "Jo");
}

#[test]
fn backup_failure_does_not_block_the_write() {
  let mut fx = Fixture::new();
  let blocked = fx.dir.path().join("backups-is-a-file");
  fs::write(&blocked, "not a directory").unwrap();
  fx.config.backup_dir = blocked;

  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();
  let report = repo.commit(&[contact("Meg", "", "", false)]).unwrap();

  assert!(report.backup.is_none());
  assert_eq!(repo.load().unwrap(), [contact("Meg", "", "", false)]);
}

#[test]
fn list_ignores_foreign_files_and_missing_dir() {
  let fx = Fixture::new();
  let snapshots = SnapshotManager::new(
    &fx.config.snapshot_file,
    &fx.config.backup_dir,
    &fx.config.contacts_file,
  );
  assert!(snapshots.list_backups().unwrap().is_empty());

  fs::create_dir_all(&fx.config.backup_dir).unwrap();
  fs::write(fx.config.backup_dir.join("notes.txt"), "hi").unwrap();
  assert!(snapshots.list_backups().unwrap().is_empty());
}

#[test]
fn restore_overwrites_live_file_and_can_be_undone() {
  let fx = Fixture::new();
  let repo = fx.repo();
  let original = vec![contact("Jo", "", "", false)];
  repo.commit(&original).unwrap();
  let backup = repo.create_backup().unwrap();

  let edited = vec![contact("Meg", "", "", false)];
  repo.commit(&edited).unwrap();

  repo.restore_backup(&backup).unwrap();
  assert_eq!(repo.load().unwrap(), original);

  assert_eq!(repo.undo().unwrap(), edited);
}

#[test]
fn restore_of_deleted_backup_is_not_found() {
  let fx = Fixture::new();
  let repo = fx.repo();
  repo.commit(&[contact("Jo", "", "", false)]).unwrap();
  let backup = repo.create_backup().unwrap();
  fs::remove_file(&backup.path).unwrap();

  assert!(matches!(repo.restore_backup(&backup), Err(Error::NotFound(_))));
}

// ─── JSON ────────────────────────────────────────────────────────────────────

#[test]
fn json_export_then_import() {
  let fx = Fixture::new();
  let contacts = vec![
    contact("Jo", "5551234567", "b,a", true),
    contact("Meg", "", "", false),
  ];
  let written = export_json(&fx.config.json_file, &contacts).unwrap();
  assert_eq!(written, 2);
  assert_eq!(import_json(&fx.config.json_file).unwrap(), contacts);
}

#[test]
fn json_import_of_object_is_format_error() {
  let fx = Fixture::new();
  fs::write(&fx.config.json_file, r#"{"name": "A"}"#).unwrap();
  assert!(matches!(
    import_json(&fx.config.json_file),
    Err(Error::Format(_))
  ));
}

#[test]
fn json_import_of_missing_file_is_not_found() {
  let fx = Fixture::new();
  assert!(matches!(
    import_json(&fx.config.json_file),
    Err(Error::NotFound(_))
  ));
}
