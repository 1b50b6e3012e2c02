//! Banned sticker set lookup.

use std::collections::HashSet;
use std::sync::Arc;

/// Immutable set of banned sticker set names.
///
/// Matching is exact and case-sensitive. Cloning shares the same set.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    sets: Arc<HashSet<String>>,
}

impl Denylist {
    /// Build a denylist. Blank names are ignored so a sticker without a set
    /// name can never match.
    pub fn new<I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sets = sets
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            sets: Arc::new(sets),
        }
    }

    /// Check whether a sticker set is banned.
    #[inline]
    pub fn is_banned(&self, set_name: &str) -> bool {
        self.sets.contains(set_name)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let denylist = Denylist::new(["t_me_gfjojnlo_by_fStikBot"]);

        assert!(denylist.is_banned("t_me_gfjojnlo_by_fStikBot"));
        assert!(!denylist.is_banned("T_ME_GFJOJNLO_BY_FSTIKBOT"));
        assert!(!denylist.is_banned("t_me_gfjojnlo"));
        assert!(!denylist.is_banned("unknown_set"));
    }

    #[test]
    fn test_blank_names_ignored() {
        let denylist = Denylist::new(["", "a_set"]);

        assert_eq!(denylist.len(), 1);
        assert!(!denylist.is_banned(""));
    }

    #[test]
    fn test_duplicates_collapse() {
        let denylist = Denylist::new(vec!["a".to_string(), "a".to_string()]);
        assert_eq!(denylist.len(), 1);
        assert!(!denylist.is_empty());
    }
}
