//! [`SnapshotManager`]: the single-slot undo snapshot and dated backups.
//!
//! The snapshot is a JSON copy of the collection as it stood before the most
//! recent write; it is overwritten by every write and consumed by undo.
//! Backups are byte copies of the CSV file named
//! `contacts_backup_<YYYYMMDD>_<HHMMSS>.csv` and are never deleted.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use rolodex_core::contact::Contact;

use crate::{Error, Result, store::write_atomic};

const BACKUP_PREFIX: &str = "contacts_backup_";
const BACKUP_SUFFIX: &str = ".csv";

// ─── BackupHandle ────────────────────────────────────────────────────────────

/// A backup file found in (or just written to) the backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHandle {
  pub path:       PathBuf,
  pub file_name:  String,
  /// Parsed from the file name; `None` for names that don't follow the
  /// timestamp pattern.
  pub created_at: Option<NaiveDateTime>,
  /// Stamp text and same-second sequence number, compared for listing.
  order:          (String, u32),
}

impl BackupHandle {
  fn from_path(path: PathBuf) -> Option<Self> {
    let file_name = path.file_name()?.to_str()?.to_string();
    let stamp = file_name
      .strip_prefix(BACKUP_PREFIX)?
      .strip_suffix(BACKUP_SUFFIX)?;
    let created_at = stamp
      .get(..15)
      .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
    // Manual backups taken within the same second carry a `_<n>` suffix.
    let order = stamp
      .get(15..)
      .filter(|_| created_at.is_some())
      .and_then(|rest| rest.strip_prefix('_'))
      .and_then(|n| n.parse().ok())
      .map_or_else(
        || (stamp.to_string(), 0),
        |seq| (stamp[..15].to_string(), seq),
      );
    Some(Self {
      path,
      file_name,
      created_at,
      order,
    })
  }
}

fn backup_stamp(now: NaiveDateTime) -> String {
  now.format("%Y%m%d_%H%M%S").to_string()
}

fn day_prefix(day: NaiveDate) -> String {
  format!("{BACKUP_PREFIX}{}_", day.format("%Y%m%d"))
}

// ─── SnapshotManager ─────────────────────────────────────────────────────────

/// Owns the undo snapshot file and the backup directory.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
  snapshot_file: PathBuf,
  backup_dir:    PathBuf,
  live_file:     PathBuf,
}

impl SnapshotManager {
  /// `live_file` is the CSV file that backups copy and restores overwrite.
  pub fn new(
    snapshot_file: impl Into<PathBuf>,
    backup_dir: impl Into<PathBuf>,
    live_file: impl Into<PathBuf>,
  ) -> Self {
    Self {
      snapshot_file: snapshot_file.into(),
      backup_dir:    backup_dir.into(),
      live_file:     live_file.into(),
    }
  }

  pub fn backup_dir(&self) -> &Path { &self.backup_dir }

  // ── Snapshot slot ─────────────────────────────────────────────────────

  /// Record `prior` (the persisted state before the pending write) as the
  /// undo snapshot, replacing any earlier one.
  ///
  /// Best-effort: a failure is logged and otherwise ignored so the write it
  /// precedes can still go ahead.
  pub fn before_write(&self, prior: &[Contact]) {
    if let Err(e) = self.capture(prior) {
      tracing::warn!(
        path = %self.snapshot_file.display(),
        error = %e,
        "could not capture undo snapshot"
      );
    }
  }

  fn capture(&self, prior: &[Contact]) -> Result<()> {
    let json = serde_json::to_vec_pretty(prior)?;
    write_atomic(&self.snapshot_file, &json)
  }

  pub fn has_snapshot(&self) -> bool { self.snapshot_file.is_file() }

  /// Take the snapshot out of its slot, deleting the file.
  ///
  /// The caller persists the returned collection. With an empty slot this
  /// fails with [`Error::NoSnapshot`].
  pub fn undo(&self) -> Result<Vec<Contact>> {
    let bytes = match fs::read(&self.snapshot_file) {
      Ok(b) => b,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(Error::NoSnapshot);
      }
      Err(e) => return Err(Error::io(&self.snapshot_file, e)),
    };
    let contacts: Vec<Contact> = serde_json::from_slice(&bytes)?;
    fs::remove_file(&self.snapshot_file)
      .map_err(|e| Error::io(&self.snapshot_file, e))?;
    Ok(contacts)
  }

  // ── Backups ───────────────────────────────────────────────────────────

  /// Copy the live file into the backup directory unless a backup dated
  /// `now`'s calendar day already exists, or there is no live file yet.
  pub fn maybe_create_dated_backup(
    &self,
    now: NaiveDateTime,
  ) -> Result<Option<BackupHandle>> {
    if !self.live_file.is_file() {
      return Ok(None);
    }
    let prefix = day_prefix(now.date());
    if self
      .list_backups()?
      .iter()
      .any(|b| b.file_name.starts_with(&prefix))
    {
      return Ok(None);
    }
    self.copy_live_to(&backup_stamp(now)).map(Some)
  }

  /// Copy the live file into the backup directory unconditionally.
  pub fn create_manual_backup(&self, now: NaiveDateTime) -> Result<BackupHandle> {
    if !self.live_file.is_file() {
      return Err(Error::NotFound(self.live_file.clone()));
    }
    self.copy_live_to(&backup_stamp(now))
  }

  /// All backups, newest first. Same-second backups order by their numeric
  /// suffix, so `_10` lists above `_9`.
  pub fn list_backups(&self) -> Result<Vec<BackupHandle>> {
    let entries = match fs::read_dir(&self.backup_dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(Error::io(&self.backup_dir, e)),
    };

    let mut backups = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|e| Error::io(&self.backup_dir, e))?;
      if entry.path().is_file() {
        backups.extend(BackupHandle::from_path(entry.path()));
      }
    }
    backups.sort_by(|a, b| b.order.cmp(&a.order));
    Ok(backups)
  }

  /// Overwrite the live file with the content of `handle`.
  pub fn restore(&self, handle: &BackupHandle) -> Result<()> {
    let bytes = match fs::read(&handle.path) {
      Ok(b) => b,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(Error::NotFound(handle.path.clone()));
      }
      Err(e) => return Err(Error::io(&handle.path, e)),
    };
    write_atomic(&self.live_file, &bytes)?;
    tracing::info!(backup = %handle.file_name, "restored backup");
    Ok(())
  }

  fn copy_live_to(&self, stamp: &str) -> Result<BackupHandle> {
    fs::create_dir_all(&self.backup_dir)
      .map_err(|e| Error::io(&self.backup_dir, e))?;

    let mut path = self
      .backup_dir
      .join(format!("{BACKUP_PREFIX}{stamp}{BACKUP_SUFFIX}"));
    let mut n = 1;
    while path.exists() {
      path = self
        .backup_dir
        .join(format!("{BACKUP_PREFIX}{stamp}_{n}{BACKUP_SUFFIX}"));
      n += 1;
    }

    fs::copy(&self.live_file, &path).map_err(|e| Error::io(&path, e))?;
    tracing::info!(backup = %path.display(), "created backup");
    BackupHandle::from_path(path.clone())
      .ok_or_else(|| Error::Format(format!("unexpected backup name {}", path.display())))
  }
}
