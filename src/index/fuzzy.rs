//! Bounded edit-distance matching for fuzzy search

/// Levenshtein distance between two strings, classic dynamic programming.
///
/// O(|a|·|b|) time and O(|b|) space. Operates on Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Whether two tokens are within `max` edits of each other.
///
/// Length difference alone can rule a pair out without running the DP table.
pub fn within_distance(a: &str, b: &str, max: usize) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > max {
        return false;
    }
    levenshtein(a, b) <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(levenshtein("report", "report"), 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_transposition_counts_as_two() {
        // "reoprt" is a transposition of "report": two substitutions
        assert_eq!(levenshtein("reoprt", "report"), 2);
    }

    #[test]
    fn test_classic_cases() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_within_distance() {
        assert!(within_distance("reoprt", "report", 2));
        assert!(!within_distance("notes", "report", 2));
        // length pre-check path
        assert!(!within_distance("cat", "catalogue", 2));
    }
}
