//! Name similarity via a sequence-matching ratio.
//!
//! The score is `2·M / T`, where `M` counts the characters in the matching
//! blocks found by repeatedly taking the longest common block and recursing
//! on either side of it, and `T` is the combined length of both strings.

use std::collections::HashMap;

/// Case-insensitive similarity of `a` and `b`, in `[0, 1]`.
///
/// Symmetric and reflexive; two empty strings score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
  let a = a.to_lowercase();
  let b = b.to_lowercase();
  // Block matching is order-sensitive on ties; fix the order.
  let (a, b) = if a <= b { (a, b) } else { (b, a) };

  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  let total = a.len() + b.len();
  if total == 0 {
    return 1.0;
  }
  2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Up to `limit` candidates scoring at least `cutoff` against `word`, best
/// first. Ties keep candidate order.
pub fn close_matches<'a, I>(
  word: &str,
  candidates: I,
  limit: usize,
  cutoff: f64,
) -> Vec<(&'a str, f64)>
where
  I: IntoIterator<Item = &'a str>,
{
  let mut scored: Vec<(&str, f64)> = candidates
    .into_iter()
    .map(|c| (c, similarity(word, c)))
    .filter(|(_, score)| *score >= cutoff)
    .collect();
  scored.sort_by(|x, y| y.1.total_cmp(&x.1));
  scored.truncate(limit);
  scored
}

// ─── Block matching ──────────────────────────────────────────────────────────

fn matching_chars(a: &[char], b: &[char]) -> usize {
  let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
  for (j, ch) in b.iter().enumerate() {
    b_index.entry(*ch).or_default().push(j);
  }

  let mut matched = 0;
  let mut pending = vec![(0, a.len(), 0, b.len())];
  while let Some((alo, ahi, blo, bhi)) = pending.pop() {
    let (i, j, size) = longest_match(a, &b_index, alo, ahi, blo, bhi);
    if size == 0 {
      continue;
    }
    matched += size;
    if alo < i && blo < j {
      pending.push((alo, i, blo, j));
    }
    if i + size < ahi && j + size < bhi {
      pending.push((i + size, ahi, j + size, bhi));
    }
  }
  matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, as
/// `(start_in_a, start_in_b, len)`. Earliest in `a`, then in `b`, on ties.
fn longest_match(
  a: &[char],
  b_index: &HashMap<char, Vec<usize>>,
  alo: usize,
  ahi: usize,
  blo: usize,
  bhi: usize,
) -> (usize, usize, usize) {
  let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
  // Length of the match ending at b[j], for the previous row of a.
  let mut run_at: HashMap<usize, usize> = HashMap::new();

  for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
    let mut next_run_at = HashMap::new();
    for &j in b_index.get(ch).map(Vec::as_slice).unwrap_or_default() {
      if j < blo {
        continue;
      }
      if j >= bhi {
        break;
      }
      let len = j
        .checked_sub(1)
        .and_then(|prev| run_at.get(&prev))
        .copied()
        .unwrap_or(0)
        + 1;
      next_run_at.insert(j, len);
      if len > best_len {
        best_i = i + 1 - len;
        best_j = j + 1 - len;
        best_len = len;
      }
    }
    run_at = next_run_at;
  }

  (best_i, best_j, best_len)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn identical_strings_score_one() {
    for s in ["", "a", "Jon Smith", "ÅSA", "aaaa"] {
      assert!(approx(similarity(s, s), 1.0), "{s:?}");
    }
  }

  #[test]
  fn case_is_ignored() {
    assert!(approx(similarity("JON SMITH", "jon smith"), 1.0));
  }

  #[test]
  fn disjoint_strings_score_zero() {
    assert!(approx(similarity("abc", "xyz"), 0.0));
    assert!(approx(similarity("", "abc"), 0.0));
  }

  #[test]
  fn symmetric_over_sample_pairs() {
    let names = [
      "Jon Smith",
      "Jonn Smith",
      "John Smythe",
      "Smith, Jon",
      "abcd",
      "bcda",
      "aab",
      "aba",
      "",
    ];
    for a in names {
      for b in names {
        assert!(approx(similarity(a, b), similarity(b, a)), "{a:?} / {b:?}");
      }
    }
  }

  #[test]
  fn one_inserted_letter() {
    // 9 shared characters over 19 total.
    assert!(approx(similarity("Jon Smith", "Jonn Smith"), 18.0 / 19.0));
  }

  #[test]
  fn matching_blocks_recurse_on_both_sides() {
    // "ab" + "d" match around the differing middle character.
    assert!(approx(similarity("abcd", "abxd"), 6.0 / 8.0));
  }

  #[test]
  fn closer_strings_score_higher() {
    let base = "Margaret Hamilton";
    let one_edit = similarity(base, "Margret Hamilton");
    let two_edits = similarity(base, "Margret Hamiltn");
    let unrelated = similarity(base, "Alan Turing");
    assert!(one_edit > two_edits);
    assert!(two_edits > unrelated);
  }

  #[test]
  fn close_matches_orders_and_limits() {
    let names = ["Jon Smith", "Jane Doe", "Jonn Smith", "John Smith"];
    let found = close_matches("Jon Smith", names, 2, 0.85);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].0, "Jon Smith");
    assert!(found[0].1 >= found[1].1);
    assert!(found.iter().all(|(n, _)| *n != "Jane Doe"));
  }
}
