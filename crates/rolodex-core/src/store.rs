//! The in-memory [`ContactStore`] and the [`PersistenceGateway`] trait.
//!
//! The gateway is implemented by storage backends (e.g. `rolodex-store-fs`).
//! The store itself never touches the filesystem: callers load a collection
//! through a gateway, mutate it here, and hand the result back for saving.

use crate::{
  Error, Result,
  contact::{Contact, ContactPatch, NewContact},
  query::{ContactFilter, SearchQuery, SortKey},
  similarity::close_matches,
  validate::ValidationWarning,
};

// ─── Gateway trait ───────────────────────────────────────────────────────────

/// Load/save access to the authoritative contact collection.
///
/// `save` must be all-or-nothing: on error the previously persisted
/// collection is left intact.
pub trait PersistenceGateway {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the full collection. A missing backing file is an empty collection.
  fn load(&self) -> Result<Vec<Contact>, Self::Error>;

  /// Replace the persisted collection with `contacts`.
  fn save(&self, contacts: &[Contact]) -> Result<(), Self::Error>;
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ordered, in-memory contact collection.
///
/// Names are matched case-insensitively. Duplicate names are tolerated;
/// name-keyed lookups act on the first match, removal on all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactStore {
  contacts: Vec<Contact>,
}

impl ContactStore {
  pub fn new(contacts: Vec<Contact>) -> Self { Self { contacts } }

  pub fn contacts(&self) -> &[Contact] { &self.contacts }

  pub fn into_contacts(self) -> Vec<Contact> { self.contacts }

  pub fn len(&self) -> usize { self.contacts.len() }

  pub fn is_empty(&self) -> bool { self.contacts.is_empty() }

  // ── Lookup ────────────────────────────────────────────────────────────

  /// First contact whose name equals `name`, ignoring case.
  pub fn find(&self, name: &str) -> Option<&Contact> {
    self.contacts.iter().find(|c| c.has_name(name))
  }

  pub fn find_mut(&mut self, name: &str) -> Option<&mut Contact> {
    self.contacts.iter_mut().find(|c| c.has_name(name))
  }

  /// Existing names similar to `name`, best first.
  pub fn close_matches(
    &self,
    name: &str,
    limit: usize,
    cutoff: f64,
  ) -> Vec<(&str, f64)> {
    close_matches(
      name,
      self.contacts.iter().map(|c| c.name.as_str()),
      limit,
      cutoff,
    )
  }

  pub fn search(&self, query: &SearchQuery) -> Vec<&Contact> {
    self.contacts.iter().filter(|c| query.matches(c)).collect()
  }

  pub fn filter(&self, filter: &ContactFilter) -> Vec<&Contact> {
    self.contacts.iter().filter(|c| filter.matches(c)).collect()
  }

  /// All contacts ordered by `key`; the stored order is left unchanged.
  pub fn sorted(&self, key: SortKey) -> Vec<&Contact> {
    let mut view: Vec<&Contact> = self.contacts.iter().collect();
    view.sort_by(|a, b| key.compare(a, b));
    view
  }

  // ── Mutation ──────────────────────────────────────────────────────────

  /// Normalize and append `input`.
  pub fn add(&mut self, input: NewContact) -> Result<Vec<ValidationWarning>> {
    let (contact, warnings) = input.normalize()?;
    self.contacts.push(contact);
    Ok(warnings)
  }

  /// Normalize `input` and merge it into the existing contact `existing`
  /// instead of adding a new record.
  pub fn absorb_into(
    &mut self,
    existing: &str,
    input: NewContact,
  ) -> Result<Vec<ValidationWarning>> {
    let (incoming, warnings) = input.normalize()?;
    let target = self
      .find_mut(existing)
      .ok_or_else(|| Error::ContactNotFound(existing.to_string()))?;
    target.absorb(&incoming);
    Ok(warnings)
  }

  /// Apply `patch` to the first contact named `name`.
  pub fn update(
    &mut self,
    name: &str,
    patch: &ContactPatch,
  ) -> Result<Vec<ValidationWarning>> {
    let target = self
      .find_mut(name)
      .ok_or_else(|| Error::ContactNotFound(name.to_string()))?;
    Ok(patch.apply(target))
  }

  /// Remove every contact named `name`; returns how many were removed.
  pub fn remove(&mut self, name: &str) -> Result<usize> {
    let before = self.contacts.len();
    self.contacts.retain(|c| !c.has_name(name));
    match before - self.contacts.len() {
      0 => Err(Error::ContactNotFound(name.to_string())),
      removed => Ok(removed),
    }
  }

  /// Append already-normalized contacts (bulk import).
  pub fn extend(&mut self, contacts: impl IntoIterator<Item = Contact>) {
    self.contacts.extend(contacts);
  }

  /// Replace the whole collection (JSON import, undo, dedupe).
  pub fn replace_all(&mut self, contacts: Vec<Contact>) { self.contacts = contacts; }
}

impl From<Vec<Contact>> for ContactStore {
  fn from(contacts: Vec<Contact>) -> Self { Self::new(contacts) }
}
