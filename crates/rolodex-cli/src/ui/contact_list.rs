//! Contact table: one row per contact, columns padded to the widest value.

use rolodex_core::contact::Contact;

/// Render `contacts` in the order given.
pub fn table(contacts: &[&Contact]) -> String {
  if contacts.is_empty() {
    return "\nNo contacts found.\n".to_string();
  }

  let tags: Vec<String> = contacts.iter().map(|c| c.tags.to_string()).collect();
  let name_w = width("Name", contacts.iter().map(|c| c.name.as_str()));
  let phone_w = width("Phone", contacts.iter().map(|c| c.phone.as_str()));
  let email_w = width("Email", contacts.iter().map(|c| c.email.as_str()));
  let tags_w = width("Tags", tags.iter().map(String::as_str));

  let header = format!(
    "{:3}\t{:<name_w$}\t{:<phone_w$}\t{:<email_w$}\t{:<tags_w$}",
    "Fav", "Name", "Phone", "Email", "Tags"
  );
  let mut out = format!("\n{header}\n{}\n", "-".repeat(header.len() + 10));
  for (contact, tags) in contacts.iter().zip(&tags) {
    let fav = if contact.favorite { "*" } else { " " };
    out.push_str(&format!(
      "{fav:3}\t{:<name_w$}\t{:<phone_w$}\t{:<email_w$}\t{:<tags_w$}\n",
      contact.name, contact.phone, contact.email, tags
    ));
  }
  out
}

fn width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
  cells
    .map(|cell| cell.chars().count())
    .fold(header.chars().count(), usize::max)
}
