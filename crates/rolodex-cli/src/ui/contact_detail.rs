//! Single-contact detail and validation warnings.

use rolodex_core::{contact::Contact, validate::ValidationWarning};

/// Field-per-line view of one contact.
pub fn detail(contact: &Contact) -> String {
  format!(
    "Name:     {}\nPhone:    {}\nEmail:    {}\nTags:     {}\nFavorite: {}",
    contact.name,
    contact.phone,
    contact.email,
    contact.tags,
    if contact.favorite { "yes" } else { "no" },
  )
}

/// One `Warning: …` line per validation warning.
pub fn warnings(warnings: &[ValidationWarning]) -> Vec<String> {
  warnings.iter().map(|w| format!("Warning: {w}")).collect()
}
