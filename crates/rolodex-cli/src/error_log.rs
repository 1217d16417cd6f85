//! Append-only plain-text error log.
//!
//! Each entry is three lines:
//!
//! ```text
//! [2026-10-19 14:03:22] Operation: add
//! Error: PersistenceError: cannot access contacts.csv: permission denied
//! ------------------------------------------------------------
//! ```

use std::{
  fs::{self, OpenOptions},
  io::{self, Write},
  path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

const RULE_WIDTH: usize = 60;

pub struct ErrorLog {
  path: PathBuf,
}

impl ErrorLog {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Append an entry stamped with the local time.
  pub fn record(&self, operation: &str, err: &anyhow::Error) -> io::Result<()> {
    self.record_at(operation, err, Local::now().naive_local())
  }

  pub fn record_at(
    &self,
    operation: &str,
    err: &anyhow::Error,
    at: NaiveDateTime,
  ) -> io::Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)?;
    write!(
      file,
      "[{}] Operation: {operation}\nError: {}: {err:#}\n{}\n",
      at.format("%Y-%m-%d %H:%M:%S"),
      error_kind(err),
      "-".repeat(RULE_WIDTH),
    )
  }
}

/// Taxonomy name of the first recognised error in `err`'s chain.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
  use rolodex_store_fs::Error as StoreError;

  for cause in err.chain() {
    if let Some(e) = cause.downcast_ref::<StoreError>() {
      return match e {
        StoreError::Core(core) => core_kind(core),
        StoreError::Persistence { .. } => "PersistenceError",
        StoreError::Csv { .. } | StoreError::Json(_) | StoreError::Format(_) => {
          "FormatError"
        }
        StoreError::NoSnapshot => "NoSnapshotError",
        StoreError::NotFound(_) => "NotFoundError",
      };
    }
    if let Some(e) = cause.downcast_ref::<rolodex_core::Error>() {
      return core_kind(e);
    }
    if cause.is::<rolodex_vcard::Error>() || cause.is::<io::Error>() {
      return "PersistenceError";
    }
  }
  "Error"
}

fn core_kind(err: &rolodex_core::Error) -> &'static str {
  match err {
    rolodex_core::Error::EmptyName | rolodex_core::Error::InvalidPattern(_) => {
      "InputError"
    }
    rolodex_core::Error::ContactNotFound(_) => "NotFoundError",
  }
}

/// Failures the user can act on directly; these are reported without a log
/// entry.
pub fn is_expected(err: &anyhow::Error) -> bool {
  matches!(
    error_kind(err),
    "NotFoundError" | "NoSnapshotError" | "InputError"
  )
}

#[cfg(test)]
mod tests {
  use anyhow::Context as _;
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn entry_format() {
    let dir = tempfile::tempdir().unwrap();
    let log = ErrorLog::new(dir.path().join("error_log.txt"));
    let at = NaiveDate::from_ymd_opt(2026, 10, 19)
      .unwrap()
      .and_hms_opt(14, 3, 22)
      .unwrap();
    let err = anyhow::Error::from(rolodex_store_fs::Error::Format("not an array".into()));

    log.record_at("import_json", &err, at).unwrap();
    log.record_at("import_json", &err, at).unwrap();

    let text = fs::read_to_string(log.path()).unwrap();
    let entry = format!(
      "[2026-10-19 14:03:22] Operation: import_json\n\
       Error: FormatError: malformed input: not an array\n{}\n",
      "-".repeat(60)
    );
    assert_eq!(text, entry.repeat(2));
  }

  #[test]
  fn kinds_follow_the_cause_chain() {
    let err = Err::<(), _>(rolodex_store_fs::Error::NoSnapshot)
      .context("undo")
      .unwrap_err();
    assert_eq!(error_kind(&err), "NoSnapshotError");
    assert!(is_expected(&err));

    let err = anyhow::Error::from(rolodex_core::Error::ContactNotFound("x".into()));
    assert_eq!(error_kind(&err), "NotFoundError");

    let err = anyhow::Error::from(io::Error::other("disk full"));
    assert_eq!(error_kind(&err), "PersistenceError");
    assert!(!is_expected(&err));

    assert_eq!(error_kind(&anyhow::anyhow!("boom")), "Error");
  }
}
