//! Duplicate detection and merge.
//!
//! [`DuplicateResolver`] walks every unordered pair of contacts once, in
//! ascending `(i, j)` order, and asks a [`MergePolicy`] what to do with each
//! pair whose names are similar enough. Merges happen in memory; the caller
//! decides whether to persist the outcome.

use std::collections::BTreeSet;

use crate::{contact::Contact, similarity::similarity};

/// What to do with one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
  /// The earlier contact absorbs the later one.
  Merge,
  /// Leave both contacts untouched.
  Skip,
  /// Merge this pair and every later qualifying pair without asking again.
  MergeAll,
  /// Stop scanning; the outcome must not be persisted.
  Abort,
}

/// Decides the fate of each candidate pair.
///
/// Implemented for any `FnMut(&Contact, &Contact, f64) -> MergeDecision`, so
/// tests and scripted runs can pass a closure.
pub trait MergePolicy {
  fn decide(
    &mut self,
    target: &Contact,
    source: &Contact,
    similarity: f64,
  ) -> MergeDecision;
}

impl<F> MergePolicy for F
where
  F: FnMut(&Contact, &Contact, f64) -> MergeDecision,
{
  fn decide(
    &mut self,
    target: &Contact,
    source: &Contact,
    similarity: f64,
  ) -> MergeDecision {
    self(target, source, similarity)
  }
}

/// Result of a duplicate scan.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
  /// Surviving contacts in their original relative order.
  pub contacts:    Vec<Contact>,
  /// How many sources were absorbed.
  pub merged:      usize,
  /// How many pairs were scored.
  pub comparisons: usize,
  /// How many times the policy was consulted.
  pub prompts:     usize,
  /// The policy answered [`MergeDecision::Abort`].
  pub aborted:     bool,
}

/// Finds and merges near-duplicate contacts by name similarity.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateResolver {
  threshold: f64,
}

impl DuplicateResolver {
  /// Pairs scoring at or above `threshold` are offered to the policy.
  pub fn new(threshold: f64) -> Self { Self { threshold } }

  pub fn threshold(&self) -> f64 { self.threshold }

  /// Scan `contacts` for duplicates and merge according to `policy`.
  ///
  /// A contact absorbed as a source is skipped for the rest of the scan, both
  /// as a target and as a source. Targets keep their name, so later
  /// comparisons against a target are unaffected by what it absorbed.
  pub fn find_and_merge<P>(
    &self,
    mut contacts: Vec<Contact>,
    policy: &mut P,
  ) -> MergeOutcome
  where
    P: MergePolicy + ?Sized,
  {
    let mut consumed = BTreeSet::new();
    let mut comparisons = 0;
    let mut prompts = 0;
    let mut auto = false;
    let mut aborted = false;

    'scan: for i in 0..contacts.len() {
      if consumed.contains(&i) {
        continue;
      }
      for j in (i + 1)..contacts.len() {
        if consumed.contains(&j) {
          continue;
        }
        comparisons += 1;
        let score = similarity(&contacts[i].name, &contacts[j].name);
        if score < self.threshold {
          continue;
        }

        let decision = if auto {
          MergeDecision::Merge
        } else {
          prompts += 1;
          policy.decide(&contacts[i], &contacts[j], score)
        };
        tracing::debug!(
          target_name = %contacts[i].name,
          source_name = %contacts[j].name,
          score,
          ?decision,
          "duplicate candidate"
        );

        match decision {
          MergeDecision::Skip => {}
          MergeDecision::Abort => {
            aborted = true;
            break 'scan;
          }
          MergeDecision::Merge | MergeDecision::MergeAll => {
            let (head, tail) = contacts.split_at_mut(j);
            head[i].absorb(&tail[0]);
            consumed.insert(j);
            auto |= decision == MergeDecision::MergeAll;
          }
        }
      }
    }

    let merged = consumed.len();
    let contacts = contacts
      .into_iter()
      .enumerate()
      .filter(|(idx, _)| !consumed.contains(idx))
      .map(|(_, c)| c)
      .collect();

    MergeOutcome {
      contacts,
      merged,
      comparisons,
      prompts,
      aborted,
    }
  }
}
