//! Contact types: the single record kind kept by Rolodex.
//!
//! A [`Contact`] is always normalized: the name is trimmed and non-empty, the
//! phone holds digits only, and tags are a sorted set without blanks. Raw user
//! input enters through [`NewContact`] and [`ContactPatch`], which normalize
//! and report advisory [`ValidationWarning`]s on the way in.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  validate::{ValidationWarning, check_email, check_phone, normalize_phone},
};

// ─── Tags ────────────────────────────────────────────────────────────────────

/// A sorted, deduplicated set of case-sensitive tags.
///
/// Serialised as comma-joined text (`"vip,work"`), which is also how tags are
/// written to the contact file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Tags(BTreeSet<String>);

impl Tags {
  /// Parse comma-separated text, trimming each element and dropping blanks.
  pub fn parse(raw: &str) -> Self {
    Self(
      raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect(),
    )
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn contains(&self, tag: &str) -> bool { self.0.contains(tag) }

  /// Case-insensitive membership test, used for filtering.
  pub fn contains_ignore_case(&self, tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    self.0.iter().any(|t| t.to_lowercase() == tag)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Add every tag of `other` to `self`.
  pub fn union_with(&mut self, other: &Tags) {
    self.0.extend(other.0.iter().cloned());
  }
}

impl fmt::Display for Tags {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for tag in &self.0 {
      if !first {
        f.write_str(",")?;
      }
      f.write_str(tag)?;
      first = false;
    }
    Ok(())
  }
}

impl From<String> for Tags {
  fn from(raw: String) -> Self { Self::parse(&raw) }
}

impl From<Tags> for String {
  fn from(tags: Tags) -> Self { tags.to_string() }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .flat_map(|s| Tags::parse(s.as_ref()).0)
        .collect(),
    )
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A normalized contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub name:     String,
  /// Digits only; empty when unknown.
  #[serde(default)]
  pub phone:    String,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub tags:     Tags,
  #[serde(default)]
  pub favorite: bool,
}

impl Contact {
  /// A contact with only a name. Fails if the trimmed name is empty.
  pub fn new(name: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self {
      name:     name.to_string(),
      phone:    String::new(),
      email:    String::new(),
      tags:     Tags::default(),
      favorite: false,
    })
  }

  /// Case-insensitive name equality; names are the lookup key.
  pub fn has_name(&self, name: &str) -> bool {
    self.name.to_lowercase() == name.trim().to_lowercase()
  }

  /// Merge `source` into `self`.
  ///
  /// Phone and email are taken from `source` only where `self` has none;
  /// tags are unioned; favorite is OR-ed. The name never changes.
  pub fn absorb(&mut self, source: &Contact) {
    if self.phone.is_empty() {
      self.phone.clone_from(&source.phone);
    }
    if self.email.is_empty() {
      self.email.clone_from(&source.email);
    }
    self.tags.union_with(&source.tags);
    self.favorite |= source.favorite;
  }
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Raw input for a contact being added or imported.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
  pub name:     String,
  pub phone:    String,
  pub email:    String,
  /// Comma-separated tags as typed.
  pub tags:     String,
  pub favorite: bool,
}

impl NewContact {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  /// Normalize into a [`Contact`], collecting advisory warnings.
  ///
  /// Only an empty name is an error; a bad phone is still stored as its
  /// digits and a bad email is stored as typed (trimmed).
  pub fn normalize(self) -> Result<(Contact, Vec<ValidationWarning>)> {
    let mut contact = Contact::new(&self.name)?;
    let warnings: Vec<_> = [check_phone(&self.phone), check_email(&self.email)]
      .into_iter()
      .flatten()
      .collect();

    contact.phone = normalize_phone(&self.phone);
    contact.email = self.email.trim().to_string();
    contact.tags = Tags::parse(&self.tags);
    contact.favorite = self.favorite;
    Ok((contact, warnings))
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// Replacement values for an update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
  pub phone:    Option<String>,
  pub email:    Option<String>,
  /// Comma-separated; replaces the whole tag set.
  pub tags:     Option<String>,
  pub favorite: Option<bool>,
}

impl ContactPatch {
  pub fn is_empty(&self) -> bool {
    self.phone.is_none()
      && self.email.is_none()
      && self.tags.is_none()
      && self.favorite.is_none()
  }

  /// Apply to `contact`, returning warnings for the replaced fields.
  pub fn apply(&self, contact: &mut Contact) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if let Some(phone) = &self.phone {
      warnings.extend(check_phone(phone));
      contact.phone = normalize_phone(phone);
    }
    if let Some(email) = &self.email {
      warnings.extend(check_email(email));
      contact.email = email.trim().to_string();
    }
    if let Some(tags) = &self.tags {
      contact.tags = Tags::parse(tags);
    }
    if let Some(favorite) = self.favorite {
      contact.favorite = favorite;
    }
    warnings
  }
}
