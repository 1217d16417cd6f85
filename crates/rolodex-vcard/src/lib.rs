//! vCard 3.0 export for Rolodex contacts.
//!
//! One card per contact, one `.vcf` file per card. Pure string building plus
//! a single file write; no parsing.
//!
//! # Quick start
//!
//! ```no_run
//! use rolodex_core::contact::Contact;
//!
//! let contact = Contact::new("Alice Smith").unwrap();
//! let card = rolodex_vcard::serialize(&contact);
//! assert!(card.starts_with("BEGIN:VCARD\r\n"));
//! ```

pub mod error;
mod serialize;

use std::{
  fs,
  path::{Path, PathBuf},
};

pub use error::{Error, Result};
use rolodex_core::contact::Contact;

/// Serialize `contact` as a vCard 3.0 string (CRLF line endings, folded at 75
/// octets). `TEL` and `EMAIL` are omitted when empty.
pub fn serialize(contact: &Contact) -> String { serialize::serialize(contact) }

/// File name for `contact`'s card: the name with every character outside
/// `[A-Za-z0-9_-]` replaced by `_`, plus `.vcf`.
pub fn file_name(contact: &Contact) -> String {
  let stem: String = contact
    .name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
        c
      } else {
        '_'
      }
    })
    .collect();
  format!("{stem}.vcf")
}

/// Write `contact`'s card into `dir`, returning the file path.
pub fn export(contact: &Contact, dir: &Path) -> Result<PathBuf> {
  let path = dir.join(file_name(contact));
  fs::create_dir_all(dir).map_err(|source| Error::Write {
    path: dir.to_path_buf(),
    source,
  })?;
  fs::write(&path, serialize(contact)).map_err(|source| Error::Write {
    path: path.clone(),
    source,
  })?;
  Ok(path)
}

#[cfg(test)]
mod tests {
  use rolodex_core::contact::NewContact;

  use super::*;

  fn contact(name: &str, phone: &str, email: &str) -> Contact {
    NewContact {
      name: name.into(),
      phone: phone.into(),
      email: email.into(),
      ..NewContact::default()
    }
    .normalize()
    .unwrap()
    .0
  }

  #[test]
  fn full_card() {
    let card = serialize(&contact("Alice Smith", "555-123-4567", "alice@example.com"));
    assert_eq!(
      card,
      "BEGIN:VCARD\r\n\
       VERSION:3.0\r\n\
       N:Alice Smith\r\n\
       TEL;TYPE=CELL:5551234567\r\n\
       EMAIL;TYPE=INTERNET:alice@example.com\r\n\
       END:VCARD\r\n"
    );
  }

  #[test]
  fn empty_phone_and_email_are_omitted() {
    let card = serialize(&contact("Bob", "", ""));
    assert!(!card.contains("TEL"));
    assert!(!card.contains("EMAIL"));
    assert_eq!(card.lines().count(), 4);
  }

  #[test]
  fn file_name_is_sanitized() {
    assert_eq!(file_name(&contact("O'Brien, Pat", "", "")), "O_Brien__Pat.vcf");
    assert_eq!(file_name(&contact("jo-ann_b", "", "")), "jo-ann_b.vcf");
  }

  #[test]
  fn export_writes_card_file() {
    let dir = tempfile::tempdir().unwrap();
    let c = contact("Alice Smith", "5551234567", "");
    let path = export(&c, dir.path()).unwrap();

    assert_eq!(path, dir.path().join("Alice_Smith.vcf"));
    assert_eq!(fs::read_to_string(&path).unwrap(), serialize(&c));
  }
}
