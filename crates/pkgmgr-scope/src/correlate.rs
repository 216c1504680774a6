//! Keyed correlation of a current map against a prior one
//!
//! Used wherever the current state is diffed against a snapshot: scopes by
//! name, aspects by type, variables by local name, index templates by name.

use indexmap::IndexMap;
use std::hash::{BuildHasher, Hash};

/// Whether a prior map was supplied at all
///
/// An absent prior is not the same as an empty one; both leave every source
/// entry unpaired, but callers may treat a missing snapshot specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorState {
    /// No prior map
    Absent,
    /// A prior map (possibly empty)
    Present,
}

/// One entry with its prior counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlated<'a, K, V> {
    /// Key shared by both maps
    pub key: &'a K,
    /// Entry from the map the pairing started from
    pub item: &'a V,
    /// Entry under the same key in the other map
    pub paired_with: Option<&'a V>,
}

/// Result of [`correlate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation<'a, K, V> {
    /// Every source entry in source order, paired where the prior has the key
    pub matched: Vec<Correlated<'a, K, V>>,
    /// Prior entries whose key is not in the source, in prior order
    pub orphaned: Vec<Correlated<'a, K, V>>,
    /// Whether a prior map was given
    pub prior: PriorState,
}

/// Pair each `source` entry with the `compared_to` entry under the same key
///
/// Entries only in `compared_to` come back as orphans (their `paired_with`
/// is always `None`).
#[must_use]
pub fn correlate<'a, K, V, S>(
    source: &'a IndexMap<K, V, S>,
    compared_to: Option<&'a IndexMap<K, V, S>>,
) -> Correlation<'a, K, V>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    let matched = source
        .iter()
        .map(|(key, item)| Correlated {
            key,
            item,
            paired_with: compared_to.and_then(|prior| prior.get(key)),
        })
        .collect();

    let orphaned = compared_to
        .map(|prior| {
            prior
                .iter()
                .filter(|(key, _)| !source.contains_key(*key))
                .map(|(key, item)| Correlated {
                    key,
                    item,
                    paired_with: None,
                })
                .collect()
        })
        .unwrap_or_default();

    Correlation {
        matched,
        orphaned,
        prior: if compared_to.is_some() {
            PriorState::Present
        } else {
            PriorState::Absent
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(entries: &[(&str, i32)]) -> IndexMap<String, i32> {
        entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn pairs_and_orphans() {
        let current = map(&[("a", 1), ("b", 2)]);
        let prior = map(&[("b", 20), ("c", 30)]);

        let correlation = correlate(&current, Some(&prior));

        assert_eq!(correlation.prior, PriorState::Present);
        assert_eq!(correlation.matched.len(), 2);
        assert_eq!(correlation.matched[0].paired_with, None);
        assert_eq!(correlation.matched[1].paired_with, Some(&20));
        assert_eq!(correlation.orphaned.len(), 1);
        assert_eq!(correlation.orphaned[0].key, "c");
    }

    #[test]
    fn absent_prior_is_distinct_from_empty() {
        let current = map(&[("a", 1)]);
        let empty = IndexMap::new();

        let absent = correlate(&current, None);
        let present = correlate(&current, Some(&empty));

        assert_eq!(absent.prior, PriorState::Absent);
        assert_eq!(present.prior, PriorState::Present);
        assert!(absent.orphaned.is_empty());
        assert!(present.orphaned.is_empty());
        assert!(absent.matched.iter().all(|c| c.paired_with.is_none()));
    }

    #[test]
    fn empty_source_orphans_everything() {
        let current = IndexMap::new();
        let prior = map(&[("x", 1), ("y", 2)]);
        let correlation = correlate(&current, Some(&prior));
        assert!(correlation.matched.is_empty());
        assert_eq!(correlation.orphaned.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_every_key_accounted_once(
            current in prop::collection::vec(("[a-e]", any::<i32>()), 0..8),
            prior in prop::collection::vec(("[a-e]", any::<i32>()), 0..8),
        ) {
            let current: IndexMap<String, i32> = current.into_iter().collect();
            let prior: IndexMap<String, i32> = prior.into_iter().collect();

            let correlation = correlate(&current, Some(&prior));

            prop_assert_eq!(correlation.matched.len(), current.len());
            let paired = correlation.matched.iter().filter(|c| c.paired_with.is_some()).count();
            prop_assert_eq!(paired + correlation.orphaned.len(), prior.len());
        }
    }
}
