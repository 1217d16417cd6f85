//! Encoding and decoding helpers between [`Contact`] and the text forms kept
//! on disk.
//!
//! Decoding is tolerant: missing columns or keys become empty values, blank
//! names drop the record, and phones and tags are re-normalized so the
//! in-memory invariants hold no matter who wrote the file.

use csv::StringRecord;
use rolodex_core::{
  contact::{Contact, Tags},
  validate::normalize_phone,
};
use serde_json::Value;

use crate::{Error, Result};

// ─── CSV ─────────────────────────────────────────────────────────────────────

/// Fixed header row of the contact file.
pub const HEADER: [&str; 5] = ["name", "phone", "email", "tags", "favorite"];

pub fn encode_favorite(favorite: bool) -> &'static str {
  if favorite { "1" } else { "0" }
}

/// `1`, `true`, `yes` and `y` (any case) are true; anything else is false.
pub fn decode_favorite(raw: &str) -> bool {
  matches!(
    raw.trim().to_lowercase().as_str(),
    "1" | "true" | "yes" | "y"
  )
}

pub fn encode_row(contact: &Contact) -> [String; 5] {
  [
    contact.name.clone(),
    contact.phone.clone(),
    contact.email.clone(),
    contact.tags.to_string(),
    encode_favorite(contact.favorite).to_string(),
  ]
}

/// Column positions resolved from a file's header row.
///
/// Files written by other tools may reorder or omit columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
  name:     Option<usize>,
  phone:    Option<usize>,
  email:    Option<usize>,
  tags:     Option<usize>,
  favorite: Option<usize>,
}

impl ColumnMap {
  pub fn from_headers(headers: &StringRecord) -> Self {
    let position = |wanted: &str| {
      headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    Self {
      name:     position("name"),
      phone:    position("phone"),
      email:    position("email"),
      tags:     position("tags"),
      favorite: position("favorite"),
    }
  }
}

/// Decode one data row. Returns `None` when the name is blank.
pub fn decode_row(record: &StringRecord, columns: &ColumnMap) -> Option<Contact> {
  let field = |idx: Option<usize>| {
    idx
      .and_then(|i| record.get(i))
      .map(str::trim)
      .unwrap_or_default()
  };

  let mut contact = Contact::new(field(columns.name)).ok()?;
  contact.phone = normalize_phone(field(columns.phone));
  contact.email = field(columns.email).to_string();
  contact.tags = Tags::parse(field(columns.tags));
  contact.favorite = decode_favorite(field(columns.favorite));
  Some(contact)
}

// ─── JSON ────────────────────────────────────────────────────────────────────

/// Decode an imported JSON document: a top-level array of contact objects.
///
/// Items that are not objects, or lack a non-blank `name`, are skipped.
pub fn decode_json_contacts(doc: &Value) -> Result<Vec<Contact>> {
  let items = doc.as_array().ok_or_else(|| {
    Error::Format(format!(
      "expected a JSON array of contacts, found {}",
      json_kind(doc)
    ))
  })?;
  Ok(items.iter().filter_map(decode_json_contact).collect())
}

fn decode_json_contact(item: &Value) -> Option<Contact> {
  let obj = item.as_object()?;
  let text = |key: &str| obj.get(key).and_then(Value::as_str).unwrap_or_default();

  let mut contact = Contact::new(text("name")).ok()?;
  contact.phone = normalize_phone(text("phone"));
  contact.email = text("email").trim().to_string();
  contact.tags = match obj.get("tags") {
    Some(Value::String(s)) => Tags::parse(s),
    Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
    _ => Tags::default(),
  };
  contact.favorite = obj.get("favorite").is_some_and(json_truthy);
  Some(contact)
}

fn json_truthy(value: &Value) -> bool {
  match value {
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => decode_favorite(s),
    _ => false,
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
