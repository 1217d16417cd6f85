//! [`CsvStore`]: the CSV-file implementation of [`PersistenceGateway`].

use std::{
  fs,
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use rolodex_core::{contact::Contact, store::PersistenceGateway};

use crate::{
  Error, Result,
  encode::{ColumnMap, HEADER, decode_row, encode_row},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The authoritative contact collection, kept in a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
  path: PathBuf,
}

impl CsvStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  pub fn exists(&self) -> bool { self.path.is_file() }

  /// Write a header-only file if none exists yet.
  pub fn ensure_exists(&self) -> Result<()> {
    if self.exists() {
      return Ok(());
    }
    self.save(&[])
  }

  /// Read contacts from some other CSV file (bulk import), using the same
  /// tolerant decoding as the live file. A missing file is an error here.
  pub fn read_import(path: &Path) -> Result<Vec<Contact>> {
    if !path.is_file() {
      return Err(Error::NotFound(path.to_path_buf()));
    }
    read_csv(path)
  }
}

// ─── PersistenceGateway impl ─────────────────────────────────────────────────

impl PersistenceGateway for CsvStore {
  type Error = Error;

  fn load(&self) -> Result<Vec<Contact>> {
    match fs::metadata(&self.path) {
      Ok(_) => read_csv(&self.path),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
      Err(e) => Err(Error::io(&self.path, e)),
    }
  }

  fn save(&self, contacts: &[Contact]) -> Result<()> {
    let mut buf = Vec::new();
    {
      let mut writer = csv::Writer::from_writer(&mut buf);
      writer
        .write_record(HEADER)
        .map_err(|e| Error::csv(&self.path, e))?;
      for contact in contacts {
        writer
          .write_record(encode_row(contact))
          .map_err(|e| Error::csv(&self.path, e))?;
      }
      writer.flush().map_err(|e| Error::io(&self.path, e))?;
    }
    write_atomic(&self.path, &buf)?;
    tracing::debug!(path = %self.path.display(), count = contacts.len(), "saved contacts");
    Ok(())
  }
}

// ─── File helpers ────────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<Vec<Contact>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_path(path)
    .map_err(|e| Error::csv(path, e))?;

  let columns = ColumnMap::from_headers(reader.headers().map_err(|e| Error::csv(path, e))?);

  let mut contacts = Vec::new();
  for record in reader.records() {
    let record = record.map_err(|e| Error::csv(path, e))?;
    contacts.extend(decode_row(&record, &columns));
  }
  Ok(contacts)
}

/// Replace `path` with `bytes` so readers see either the old or the new
/// content, never a partial write.
///
/// The data goes to a sibling temp file first, then is renamed over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "contacts".into());
  let tmp_path = dir.join(format!(".{file_name}.tmp.{}", std::process::id()));

  let written = (|| -> io::Result<()> {
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
  })();

  if let Err(e) = written {
    let _ = fs::remove_file(&tmp_path);
    return Err(Error::io(path, e));
  }
  Ok(())
}
