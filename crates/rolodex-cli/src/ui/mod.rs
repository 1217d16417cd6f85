//! Plain-text rendering for the console.

pub mod contact_detail;
pub mod contact_list;

use rolodex_store_fs::BackupHandle;

/// Numbered backup listing, newest first.
pub fn backup_list(backups: &[BackupHandle]) -> String {
  if backups.is_empty() {
    return "No backups available.".to_string();
  }
  let mut out = String::from("Available backups:\n");
  for (i, backup) in backups.iter().enumerate() {
    out.push_str(&format!("{}. {}\n", i + 1, backup.path.display()));
  }
  out
}
