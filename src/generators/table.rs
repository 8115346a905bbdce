//! Keyed lookup tables with an explicit `"default"` entry.
//!
//! Generators map genre, video type, scene context, role and mood keys to
//! small template records. Every table carries a `"default"` row, and any
//! key that does not match (after normalization) resolves to it.

/// Key every table must contain.
pub const DEFAULT_KEY: &str = "default";

/// A static `key -> record` table with a `"default"` fallback.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable<T: 'static> {
    entries: &'static [(&'static str, T)],
}

impl<T: 'static> LookupTable<T> {
    /// Wraps a static slice of entries. Keys must already be normalized.
    pub const fn new(entries: &'static [(&'static str, T)]) -> Self {
        Self { entries }
    }

    /// Returns the record for `key`, or `None` if neither the key nor the
    /// `"default"` entry exists.
    pub fn try_get(&self, key: &str) -> Option<&'static T> {
        let key = normalize_key(key);
        self.find(&key).or_else(|| self.find(DEFAULT_KEY))
    }

    /// Returns the record for `key`, falling back to `"default"`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no `"default"` entry. All tables in this crate
    /// are checked by tests.
    pub fn get(&self, key: &str) -> &'static T {
        match self.try_get(key) {
            Some(record) => record,
            None => panic!("lookup table is missing its \"{}\" entry", DEFAULT_KEY),
        }
    }

    /// True if `key` has its own row (no fallback).
    pub fn contains(&self, key: &str) -> bool {
        self.find(&normalize_key(key)).is_some()
    }

    /// True if the table has a `"default"` row.
    pub fn has_default(&self) -> bool {
        self.find(DEFAULT_KEY).is_some()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(k, _)| *k)
    }

    fn find(&self, key: &str) -> Option<&'static T> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, record)| record)
    }
}

/// Lowercases and folds spaces and hyphens to underscores.
///
/// "Short Film", "short-film" and "short_film" all normalize to "short_film".
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Picks `items[index % len]`; `None` for an empty slice.
pub fn cycle<T>(items: &[T], index: usize) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(index % items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: LookupTable<&str> =
        LookupTable::new(&[("sci_fi", "chrome"), ("fantasy", "gold"), ("default", "grey")]);

    static NO_DEFAULT: LookupTable<u32> = LookupTable::new(&[("only", 1)]);

    #[test]
    fn test_exact_and_normalized_lookup() {
        assert_eq!(*COLORS.get("fantasy"), "gold");
        assert_eq!(*COLORS.get("Sci-Fi"), "chrome");
        assert_eq!(*COLORS.get("  SCI FI "), "chrome");
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(*COLORS.get("western"), "grey");
        assert_eq!(*COLORS.get(""), "grey");
        assert!(!COLORS.contains("western"));
        assert!(COLORS.contains("Fantasy"));
    }

    #[test]
    fn test_missing_default() {
        assert!(!NO_DEFAULT.has_default());
        assert_eq!(NO_DEFAULT.try_get("other"), None);
        assert_eq!(NO_DEFAULT.try_get("only"), Some(&1));
    }

    #[test]
    #[should_panic(expected = "missing its")]
    fn test_get_panics_without_default() {
        NO_DEFAULT.get("other");
    }

    #[test]
    fn test_keys_in_order() {
        assert_eq!(COLORS.keys().collect::<Vec<_>>(), vec!["sci_fi", "fantasy", "default"]);
    }

    #[test]
    fn test_cycle() {
        let items = ["a", "b", "c"];
        assert_eq!(cycle(&items[..], 0), Some(&"a"));
        assert_eq!(cycle(&items[..], 4), Some(&"b"));
        assert_eq!(cycle::<&str>(&[], 2), None);
    }
}
