//! vCard 3.0 serializer.
//!
//! Produces CRLF line endings and folds at 75 octets per RFC 2426 §2.6.

use rolodex_core::contact::Contact;

// ─── Line folding ─────────────────────────────────────────────────────────────

/// Emit `s` as one logical line. No physical line exceeds 75 octets; each
/// continuation starts with a space, which counts toward its limit. A line is
/// never split inside a UTF-8 sequence.
pub(crate) fn fold_line(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + s.len() / 74 * 3 + 2);
  let mut room = 75;
  for ch in s.chars() {
    let width = ch.len_utf8();
    if width > room {
      out.push_str("\r\n ");
      room = 74;
    }
    out.push(ch);
    room -= width;
  }
  out.push_str("\r\n");
  out
}

// ─── Value escaping ───────────────────────────────────────────────────────────

/// Escape a text value. Bare carriage returns are dropped so a value can't
/// end the line early.
fn escape_value(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '\\' | ',' | ';' => {
        out.push('\\');
        out.push(ch);
      }
      '\n' => out.push_str("\\n"),
      '\r' => {}
      _ => out.push(ch),
    }
  }
  out
}

// ─── Card ─────────────────────────────────────────────────────────────────────

pub(crate) fn serialize(contact: &Contact) -> String {
  let mut out = String::new();
  out.push_str(&fold_line("BEGIN:VCARD"));
  out.push_str(&fold_line("VERSION:3.0"));
  out.push_str(&fold_line(&format!("N:{}", escape_value(&contact.name))));
  if !contact.phone.is_empty() {
    out.push_str(&fold_line(&format!("TEL;TYPE=CELL:{}", contact.phone)));
  }
  if !contact.email.is_empty() {
    out.push_str(&fold_line(&format!(
      "EMAIL;TYPE=INTERNET:{}",
      escape_value(&contact.email)
    )));
  }
  out.push_str(&fold_line("END:VCARD"));
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_lines_are_not_folded() {
    assert_eq!(fold_line("N:Jo"), "N:Jo\r\n");
  }

  #[test]
  fn long_lines_fold_with_leading_space() {
    let long = format!("N:{}", "x".repeat(100));
    let folded = fold_line(&long);
    let lines: Vec<_> = folded.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 75);
    assert!(lines[1].starts_with(' '));
    assert_eq!(lines[0].len() + lines[1].len() - 1, long.len());
  }

  #[test]
  fn folding_respects_char_boundaries() {
    let long = format!("N:{}", "é".repeat(60));
    for line in fold_line(&long).split("\r\n") {
      assert!(line.len() <= 75);
    }
  }

  #[test]
  fn special_characters_are_escaped() {
    assert_eq!(escape_value("a,b;c\\d"), "a\\,b\\;c\\\\d");
    assert_eq!(escape_value("line one\r\nline two"), "line one\\nline two");
  }

  #[test]
  fn exactly_75_octets_stays_on_one_line() {
    let line = format!("N:{}", "x".repeat(73));
    assert_eq!(fold_line(&line), format!("{line}\r\n"));
  }
}
