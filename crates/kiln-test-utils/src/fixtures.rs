//! Reusable element fixtures.
//!
//! Strings own heap memory, so they take the element-wise clone and drop
//! paths that plain integers skip.

/// `count` strings of the form `"Str0"`, `"Str1"`, ...
pub fn numbered_strings(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Str{i}")).collect()
}

/// `count` strings long enough to defeat any small-string optimisation.
pub fn long_strings(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("This is a long string used to force heap allocation #{i}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_strings_are_sequential() {
        assert_eq!(numbered_strings(3), vec!["Str0", "Str1", "Str2"]);
    }

    #[test]
    fn long_strings_are_distinct() {
        let strings = long_strings(4);
        assert_eq!(strings.len(), 4);
        assert_ne!(strings[0], strings[1]);
        assert!(strings.iter().all(|s| s.len() > 32));
    }
}
