//! Field normalization and advisory validation.
//!
//! Validation never blocks a write. A malformed phone or email is still
//! stored; the caller receives [`ValidationWarning`]s to surface as it sees
//! fit.

use std::{fmt, sync::LazyLock};

use regex::Regex;

/// Shortest phone number, in digits, considered plausible.
pub const PHONE_MIN_DIGITS: usize = 7;
/// Longest phone number, in digits (E.164 limit).
pub const PHONE_MAX_DIGITS: usize = 15;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[a-zA-Z0-9]{2,}$").expect("static email regex")
});

/// Strip every non-digit character from `raw`.
pub fn normalize_phone(raw: &str) -> String {
  raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `true` when the digits of `raw` number between 7 and 15.
pub fn is_valid_phone(raw: &str) -> bool {
  let len = normalize_phone(raw).len();
  (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&len)
}

/// Loose `local@domain.tld` check: one `@`, no whitespace, and a final label
/// of at least two alphanumeric characters.
pub fn is_valid_email(raw: &str) -> bool { EMAIL_RE.is_match(raw) }

// ─── Warnings ────────────────────────────────────────────────────────────────

/// A non-fatal problem found while normalizing user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
  /// The phone had too few or too many digits. Holds the raw input.
  InvalidPhone(String),
  /// The email did not look like `local@domain.tld`. Holds the raw input.
  InvalidEmail(String),
}

impl fmt::Display for ValidationWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidPhone(raw) => {
        write!(f, "phone {raw:?} looks invalid (kept digits only)")
      }
      Self::InvalidEmail(raw) => write!(f, "email {raw:?} looks invalid"),
    }
  }
}

/// Check a raw phone value. Empty input is not a warning.
pub fn check_phone(raw: &str) -> Option<ValidationWarning> {
  let raw = raw.trim();
  (!raw.is_empty() && !is_valid_phone(raw))
    .then(|| ValidationWarning::InvalidPhone(raw.to_string()))
}

/// Check a raw email value. Empty input is not a warning.
pub fn check_email(raw: &str) -> Option<ValidationWarning> {
  let raw = raw.trim();
  (!raw.is_empty() && !is_valid_email(raw))
    .then(|| ValidationWarning::InvalidEmail(raw.to_string()))
}
