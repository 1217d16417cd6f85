//! [`Repository`]: the commit pipeline over the contact file.
//!
//! Every persisted mutation runs the same steps, in order:
//!
//! 1. read the collection currently on disk;
//! 2. store it as the undo snapshot (best-effort);
//! 3. make the day's automatic backup if there is none yet (best-effort);
//! 4. atomically replace the contact file.
//!
//! Steps 2 and 3 complete before step 4 starts, so the snapshot always
//! describes the state the write replaced.

use chrono::{Local, NaiveDateTime};
use rolodex_core::{config::RolodexConfig, contact::Contact, store::PersistenceGateway};

use crate::{
  Result,
  snapshot::{BackupHandle, SnapshotManager},
  store::CsvStore,
};

type Clock = Box<dyn Fn() -> NaiveDateTime>;

/// What a successful commit did besides saving.
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
  /// Number of contacts written.
  pub saved:  usize,
  /// The automatic backup made by this commit, if any.
  pub backup: Option<BackupHandle>,
}

/// The contact file plus its snapshot slot and backup directory.
pub struct Repository {
  store:     CsvStore,
  snapshots: SnapshotManager,
  clock:     Clock,
}

impl Repository {
  pub fn new(config: &RolodexConfig) -> Self {
    Self {
      store:     CsvStore::new(&config.contacts_file),
      snapshots: SnapshotManager::new(
        &config.snapshot_file,
        &config.backup_dir,
        &config.contacts_file,
      ),
      clock:     Box::new(|| Local::now().naive_local()),
    }
  }

  /// Replace the wall clock used to date backups.
  pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
    self.clock = Box::new(clock);
    self
  }

  pub fn store(&self) -> &CsvStore { &self.store }

  pub fn snapshots(&self) -> &SnapshotManager { &self.snapshots }

  pub fn load(&self) -> Result<Vec<Contact>> { self.store.load() }

  /// Persist `contacts` as the new authoritative collection.
  pub fn commit(&self, contacts: &[Contact]) -> Result<CommitReport> {
    self.capture_prior();
    self.write(contacts)
  }

  /// Restore the undo snapshot and persist it.
  ///
  /// No new snapshot is captured, so an immediate second undo fails with
  /// [`crate::Error::NoSnapshot`]. If saving fails the snapshot is put back.
  pub fn undo(&self) -> Result<Vec<Contact>> {
    let prior = self.snapshots.undo()?;
    if let Err(e) = self.write(&prior) {
      self.snapshots.before_write(&prior);
      return Err(e);
    }
    Ok(prior)
  }

  pub fn create_backup(&self) -> Result<BackupHandle> {
    self.snapshots.create_manual_backup((self.clock)())
  }

  pub fn list_backups(&self) -> Result<Vec<BackupHandle>> {
    self.snapshots.list_backups()
  }

  /// Overwrite the contact file with `handle`. The replaced state becomes
  /// the undo snapshot.
  pub fn restore_backup(&self, handle: &BackupHandle) -> Result<()> {
    if !handle.path.is_file() {
      return Err(crate::Error::NotFound(handle.path.clone()));
    }
    self.capture_prior();
    self.snapshots.restore(handle)
  }

  fn capture_prior(&self) {
    match self.store.load() {
      Ok(prior) => self.snapshots.before_write(&prior),
      Err(e) => tracing::warn!(
        error = %e,
        "could not read current contacts; skipping undo snapshot"
      ),
    }
  }

  fn write(&self, contacts: &[Contact]) -> Result<CommitReport> {
    let backup = match self.snapshots.maybe_create_dated_backup((self.clock)()) {
      Ok(backup) => backup,
      Err(e) => {
        tracing::warn!(error = %e, "could not create daily backup");
        None
      }
    };
    self.store.save(contacts)?;
    tracing::info!(count = contacts.len(), "committed contacts");
    Ok(CommitReport {
      saved: contacts.len(),
      backup,
    })
  }
}
