//! String similarity scores (Levenshtein, Jaro, longest common subsequence)
//!
//! Edit distances come from `strsim`. All functions work on `char`s, so CJK
//! text is compared character by character rather than byte by byte.

/// Length of the longest common subsequence
pub fn longest_common_subsequence(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            dp[i + 1][j + 1] = if ca == cb {
                dp[i][j] + 1
            } else {
                dp[i][j + 1].max(dp[i + 1][j])
            };
        }
    }
    dp[a.len()][b.len()]
}

/// Edit distance (insert, delete, substitute)
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Levenshtein distance normalised to `0.0..=1.0` (1.0 means equal)
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Jaro similarity in `0.0..=1.0`
pub fn jaro(a: &str, b: &str) -> f64 {
    strsim::jaro(a, b)
}

/// Find the candidate closest to `target`.
///
/// Candidates of two characters or fewer score 0. A candidate containing
/// `target` scores 1 and ends the search. Otherwise candidates are scored
/// with [`jaro`] and the first best score wins. Returns `None` when no
/// candidate scores above zero.
pub fn find_similarity_index<S: AsRef<str>>(target: &str, candidates: &[S]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = if candidate.chars().count() <= 2 {
            0.0
        } else if candidate.contains(target) {
            return Some((index, 1.0));
        } else {
            jaro(target, candidate)
        };
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((index, score));
        }
    }
    best
}
