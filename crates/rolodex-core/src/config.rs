//! Runtime configuration shared by every component.
//!
//! Paths and thresholds are injected at construction; nothing reads globals.

use std::path::PathBuf;

use serde::Deserialize;

/// File locations and matching thresholds.
///
/// Every field has a default, so an empty config file (or none at all) is
/// valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RolodexConfig {
  /// The authoritative CSV contact file.
  pub contacts_file:   PathBuf,
  /// Default target for JSON export and source for JSON import.
  pub json_file:       PathBuf,
  /// Single-slot undo snapshot.
  pub snapshot_file:   PathBuf,
  pub backup_dir:      PathBuf,
  pub error_log:       PathBuf,
  /// Where `.vcf` exports are written.
  pub vcard_dir:       PathBuf,
  /// Minimum name similarity for the duplicate scan.
  pub merge_threshold: f64,
  /// Minimum name similarity for "similar name exists" hints on add.
  pub suggest_cutoff:  f64,
  pub suggest_limit:   usize,
}

impl Default for RolodexConfig {
  fn default() -> Self {
    Self {
      contacts_file:   PathBuf::from("contacts.csv"),
      json_file:       PathBuf::from("contacts.json"),
      snapshot_file:   PathBuf::from(".prev_contacts_snapshot.json"),
      backup_dir:      PathBuf::from("backups"),
      error_log:       PathBuf::from("error_log.txt"),
      vcard_dir:       PathBuf::from("."),
      merge_threshold: 0.9,
      suggest_cutoff:  0.85,
      suggest_limit:   3,
    }
  }
}

impl RolodexConfig {
  /// Defaults with every path placed under `dir`.
  pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    let defaults = Self::default();
    Self {
      contacts_file: dir.join(defaults.contacts_file),
      json_file: dir.join(defaults.json_file),
      snapshot_file: dir.join(defaults.snapshot_file),
      backup_dir: dir.join(defaults.backup_dir),
      error_log: dir.join(defaults.error_log),
      vcard_dir: dir,
      ..defaults
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rooted_config_keeps_thresholds() {
    let cfg = RolodexConfig::rooted_at("/tmp/book");
    assert_eq!(cfg.contacts_file, PathBuf::from("/tmp/book/contacts.csv"));
    assert_eq!(cfg.backup_dir, PathBuf::from("/tmp/book/backups"));
    assert_eq!(cfg.vcard_dir, PathBuf::from("/tmp/book"));
    assert_eq!(cfg.merge_threshold, 0.9);
  }

  #[test]
  fn partial_config_fills_defaults() {
    let cfg: RolodexConfig =
      serde_json::from_str(r#"{"merge_threshold": 0.8}"#).unwrap();
    assert_eq!(cfg.merge_threshold, 0.8);
    assert_eq!(cfg.contacts_file, PathBuf::from("contacts.csv"));
  }
}
