// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::hash::Hash;

/// The first element of `items` that appeared earlier in the slice.
///
/// ```rust
/// use taskgraph::utils::first_duplicate;
///
/// assert_eq!(first_duplicate(&[1, 2, 1, 2]), Some(&1));
/// assert_eq!(first_duplicate::<u8>(&[]), None);
/// ```
pub fn first_duplicate<T: Eq + Hash>(items: &[T]) -> Option<&T> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().find(|item| !seen.insert(*item))
}

/// Whether no element of `items` repeats.
pub fn is_unique<T: Eq + Hash>(items: &[T]) -> bool {
    first_duplicate(items).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unique() {
        assert!(is_unique::<usize>(&[]));
        assert!(is_unique(&[0, 1, 2]));
        assert!(!is_unique(&[1, 1]));
        assert!(!is_unique(&["a", "b", "a"]));
    }

    #[test]
    fn test_first_duplicate_reports_second_occurrence() {
        assert_eq!(first_duplicate(&[3, 1, 4, 1, 5, 3]), Some(&1));
        assert_eq!(first_duplicate(&[3, 1, 4]), None);
    }
}
