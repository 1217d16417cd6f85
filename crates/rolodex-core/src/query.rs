//! Search, filter and sort parameters for [`crate::store::ContactStore`].

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use crate::{Result, contact::Contact};

// ─── Search ──────────────────────────────────────────────────────────────────

/// A free-text or regular-expression search over name, phone, email and tags.
#[derive(Debug, Clone)]
pub enum SearchQuery {
  /// Case-insensitive substring match.
  Text(String),
  /// Case-insensitive regex match.
  Pattern(Regex),
}

impl SearchQuery {
  /// Parse user input: `/pattern/` is a regex, anything else plain text.
  ///
  /// A lone `/` opens and closes at once, so it is the empty pattern and
  /// matches every contact.
  pub fn parse(input: &str) -> Result<Self> {
    let input = input.trim();
    if input.starts_with('/') && input.ends_with('/') {
      let pattern = input.get(1..input.len() - 1).unwrap_or_default();
      let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
      return Ok(Self::Pattern(re));
    }
    Ok(Self::Text(input.to_string()))
  }

  pub fn matches(&self, contact: &Contact) -> bool {
    let tags = contact.tags.to_string();
    let fields = [
      contact.name.as_str(),
      contact.phone.as_str(),
      contact.email.as_str(),
      tags.as_str(),
    ];
    match self {
      Self::Text(needle) => {
        let needle = needle.to_lowercase();
        fields.iter().any(|f| f.to_lowercase().contains(&needle))
      }
      Self::Pattern(re) => fields.iter().any(|f| re.is_match(f)),
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Selection used by filtered JSON export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContactFilter {
  #[default]
  All,
  /// Contacts carrying this tag (case-insensitive).
  Tag(String),
  Favorites,
}

impl ContactFilter {
  pub fn matches(&self, contact: &Contact) -> bool {
    match self {
      Self::All => true,
      Self::Tag(tag) => contact.tags.contains_ignore_case(tag),
      Self::Favorites => contact.favorite,
    }
  }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Display ordering. Sorting is stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
  #[default]
  Name,
  Phone,
  Email,
  /// Favorites first, otherwise insertion order.
  Favorite,
}

impl SortKey {
  pub fn compare(self, a: &Contact, b: &Contact) -> Ordering {
    match self {
      Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
      Self::Phone => a.phone.cmp(&b.phone),
      Self::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
      Self::Favorite => b.favorite.cmp(&a.favorite),
    }
  }
}

impl std::str::FromStr for SortKey {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "" | "name" => Ok(Self::Name),
      "phone" => Ok(Self::Phone),
      "email" => Ok(Self::Email),
      "favorite" | "fav" => Ok(Self::Favorite),
      other => Err(format!("unknown sort key: {other:?}")),
    }
  }
}
