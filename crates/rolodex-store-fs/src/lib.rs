//! Filesystem backend for the Rolodex contact book.
//!
//! The contact collection lives in one CSV file. Alongside it sit a JSON undo
//! snapshot and a directory of dated CSV backups. All writes to the contact
//! file go through a temp file and a rename, so a failed save leaves the
//! previous content in place.

mod encode;
mod json;
mod repository;
mod snapshot;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use json::{export_json, import_json};
pub use repository::{CommitReport, Repository};
pub use snapshot::{BackupHandle, SnapshotManager};
pub use store::CsvStore;

#[cfg(test)]
mod tests;
