//! JSON export and import of contact collections.

use std::{fs, path::Path};

use rolodex_core::contact::Contact;

use crate::{Error, Result, encode::decode_json_contacts, store::write_atomic};

/// Write `contacts` to `path` as a pretty-printed JSON array.
pub fn export_json<'a, I>(path: &Path, contacts: I) -> Result<usize>
where
  I: IntoIterator<Item = &'a Contact>,
{
  let contacts: Vec<&Contact> = contacts.into_iter().collect();
  let json = serde_json::to_vec_pretty(&contacts)?;
  write_atomic(path, &json)?;
  Ok(contacts.len())
}

/// Read contacts from a JSON file holding an array of contact objects.
///
/// Invalid items are skipped; a document that is not an array is a
/// [`Error::Format`].
pub fn import_json(path: &Path) -> Result<Vec<Contact>> {
  let bytes = match fs::read(path) {
    Ok(b) => b,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(Error::NotFound(path.to_path_buf()));
    }
    Err(e) => return Err(Error::io(path, e)),
  };
  let doc: serde_json::Value = serde_json::from_slice(&bytes)?;
  decode_json_contacts(&doc)
}
