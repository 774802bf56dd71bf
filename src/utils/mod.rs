//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, graph_to_sprs, to_sprs_csr};

/// Splits a line into tokens separated by runs of spaces and tabs.
///
/// Empty tokens are discarded, so leading, trailing and repeated
/// separators never produce empty strings.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split([' ', '\t']).filter(|t| !t.is_empty())
}

/// Returns true if the first byte of `line` is one of `comment_chars`
pub fn starts_with_any(line: &str, comment_chars: &[u8]) -> bool {
    line.as_bytes()
        .first()
        .is_some_and(|b| comment_chars.contains(b))
}

/// Converts per-row counts stored at `counts[1..]` into start offsets in place.
///
/// After the call `counts[i]` holds the sum of the original
/// `counts[0..=i]`, so with `counts[0] == 0` it is the CSR start of row `i`.
pub fn prefix_sum_in_place(counts: &mut [usize]) {
    for i in 1..counts.len() {
        counts[i] += counts[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens() {
        let tokens: Vec<_> = split_tokens("  1\t 2.5   3 \t").collect();
        assert_eq!(tokens, vec!["1", "2.5", "3"]);

        assert_eq!(split_tokens("").count(), 0);
        assert_eq!(split_tokens(" \t ").count(), 0);
    }

    #[test]
    fn test_starts_with_any() {
        assert!(starts_with_any("% comment", b"%"));
        assert!(starts_with_any("\"quoted", b"#%\"/"));
        assert!(!starts_with_any(" % indented", b"%"));
        assert!(!starts_with_any("", b"%"));
    }

    #[test]
    fn test_prefix_sum_in_place() {
        let mut counts = vec![0, 1, 2, 3, 4];
        prefix_sum_in_place(&mut counts);
        assert_eq!(counts, vec![0, 1, 3, 6, 10]);

        let mut counts = vec![0, 0, 5, 0];
        prefix_sum_in_place(&mut counts);
        assert_eq!(counts, vec![0, 0, 5, 5]);
    }
}
