//! Lexical nearest-neighbour matching.
//!
//! The similarity score is the Ratcliff/Obershelp ratio `2 * M / (|a| + |b|)`,
//! where `M` is the number of characters in the recursively found longest
//! common blocks. No junk heuristics are applied.

/// Similarity ratio between two strings, from 0.0 (disjoint) to 1.0 (equal).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Pick the candidate most similar to `query`, if any scores at least `cutoff`.
///
/// The ratio is not symmetric; each candidate is scored as the first sequence
/// against the query. Ties keep the lexicographically greatest candidate.
pub fn closest_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = similarity_ratio(candidate, query);
        if score < cutoff {
            continue;
        }
        let better = best.map_or(true, |(leader, top)| {
            score > top || (score == top && candidate > leader)
        });
        if better {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        if a_lo >= a_hi || b_lo >= b_hi {
            continue;
        }
        let (i, j, size) = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        total += size;
        pending.push((a_lo, i, b_lo, j));
        pending.push((i + size, a_hi, j + size, b_hi));
    }
    total
}

/// Longest common block inside the given windows, earliest in `a` then `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let width = b_hi - b_lo + 1;
    let mut previous = vec![0usize; width];
    let mut best = (a_lo, b_lo, 0);

    for i in a_lo..a_hi {
        let mut current = vec![0usize; width];
        for j in b_lo..b_hi {
            if a[i] != b[j] {
                continue;
            }
            let size = previous[j - b_lo] + 1;
            current[j - b_lo + 1] = size;
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        previous = current;
    }
    best
}
