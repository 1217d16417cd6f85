//! Line-oriented console I/O and the interactive merge policy.
//!
//! Input and output are generic so the same prompts run against stdin/stdout
//! in the binary and against in-memory buffers in tests.

use std::io::{self, BufRead, Write};

use rolodex_core::{
  contact::Contact,
  dedupe::{MergeDecision, MergePolicy},
};

/// A prompt-and-answer console.
pub struct Console<R, W> {
  input:  R,
  output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
  pub fn new(input: R, output: W) -> Self { Self { input, output } }

  #[cfg(test)]
  pub fn output(&self) -> &W { &self.output }

  /// Print `text` followed by a newline.
  pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
    writeln!(self.output, "{}", text.as_ref())
  }

  /// Print `prompt` and read one trimmed line. `None` at end of input.
  pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
    write!(self.output, "{prompt}")?;
    self.output.flush()?;
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      writeln!(self.output)?;
      return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
  }

  /// Like [`Console::ask`], but an empty answer (or end of input) is `None`.
  pub fn ask_optional(&mut self, prompt: &str) -> io::Result<Option<String>> {
    Ok(self.ask(prompt)?.filter(|s| !s.is_empty()))
  }

  /// Yes/no question; anything but `y`/`yes` is no.
  pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
    Ok(matches!(
      self.ask(prompt)?.map(|s| s.to_lowercase()).as_deref(),
      Some("y" | "yes")
    ))
  }

  /// `y`/`yes` → `Some(true)`, `n`/`no` → `Some(false)`, anything else keeps
  /// the current value.
  pub fn ask_flag(&mut self, prompt: &str) -> io::Result<Option<bool>> {
    Ok(match self.ask(prompt)?.map(|s| s.to_lowercase()).as_deref() {
      Some("y" | "yes") => Some(true),
      Some("n" | "no") => Some(false),
      _ => None,
    })
  }
}

// ─── Merge policy ─────────────────────────────────────────────────────────────

/// Asks the user about each duplicate candidate.
pub struct PromptPolicy<'a, R, W> {
  console: &'a mut Console<R, W>,
}

impl<'a, R, W> PromptPolicy<'a, R, W> {
  pub fn new(console: &'a mut Console<R, W>) -> Self { Self { console } }
}

impl<R: BufRead, W: Write> PromptPolicy<'_, R, W> {
  fn ask(&mut self, target: &Contact, source: &Contact, score: f64) -> io::Result<MergeDecision> {
    self.console.say(format!(
      "Possible duplicate:\n 1) {}  2) {} (sim={score:.2})",
      target.name, source.name
    ))?;
    let answer = self
      .console
      .ask("Type M to merge, S to skip, A to always auto-merge, C to cancel > ")?;
    Ok(match answer.map(|s| s.to_uppercase()).as_deref() {
      Some("M") => MergeDecision::Merge,
      Some("A") => MergeDecision::MergeAll,
      Some("C") | None => MergeDecision::Abort,
      Some(_) => MergeDecision::Skip,
    })
  }
}

impl<R: BufRead, W: Write> MergePolicy for PromptPolicy<'_, R, W> {
  fn decide(&mut self, target: &Contact, source: &Contact, similarity: f64) -> MergeDecision {
    self.ask(target, source, similarity).unwrap_or_else(|e| {
      tracing::warn!(error = %e, "console failed during duplicate scan");
      MergeDecision::Abort
    })
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;

  fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
  }

  #[test]
  fn ask_trims_and_reports_eof() {
    let mut c = console("  hello \n");
    assert_eq!(c.ask("> ").unwrap().as_deref(), Some("hello"));
    assert_eq!(c.ask("> ").unwrap(), None);
  }

  #[test]
  fn optional_answer_treats_blank_as_none() {
    let mut c = console("\nvalue\n");
    assert_eq!(c.ask_optional("? ").unwrap(), None);
    assert_eq!(c.ask_optional("? ").unwrap().as_deref(), Some("value"));
  }

  #[test]
  fn flags_keep_current_on_blank() {
    let mut c = console("YES\nn\n\n");
    assert_eq!(c.ask_flag("? ").unwrap(), Some(true));
    assert_eq!(c.ask_flag("? ").unwrap(), Some(false));
    assert_eq!(c.ask_flag("? ").unwrap(), None);
  }

  #[test]
  fn prompt_policy_maps_answers() {
    let mut c = console("m\na\ns\nc\n");
    let a = Contact::new("A").unwrap();
    let b = Contact::new("B").unwrap();
    let mut policy = PromptPolicy::new(&mut c);
    assert_eq!(policy.decide(&a, &b, 0.9), MergeDecision::Merge);
    assert_eq!(policy.decide(&a, &b, 0.9), MergeDecision::MergeAll);
    assert_eq!(policy.decide(&a, &b, 0.9), MergeDecision::Skip);
    assert_eq!(policy.decide(&a, &b, 0.9), MergeDecision::Abort);
    assert_eq!(policy.decide(&a, &b, 0.9), MergeDecision::Abort);
  }
}
