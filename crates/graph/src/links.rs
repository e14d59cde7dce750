use crate::types::Link;
use std::collections::{BTreeMap, BTreeSet};

/// Candidate link set with set-union semantics.
///
/// Insertion order never matters, so partial sets built on different threads
/// can be merged in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the link was not present yet.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) -> bool {
        self.edges.entry(from.into()).or_default().insert(to.into())
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|targets| targets.contains(to))
    }

    pub fn union(mut self, other: LinkSet) -> LinkSet {
        if self.edges.len() < other.edges.len() {
            return other.union(self);
        }
        for (from, targets) in other.edges {
            self.edges.entry(from).or_default().extend(targets);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.values().all(BTreeSet::is_empty)
    }

    /// Links in `(from, to)` order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().flat_map(|(from, targets)| {
            targets.iter().map(move |to| (from.as_str(), to.as_str()))
        })
    }

    pub fn into_links(self) -> Vec<Link> {
        self.edges
            .into_iter()
            .flat_map(|(from, targets)| {
                targets.into_iter().map(move |to| Link {
                    from: from.clone(),
                    to,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_inserts_collapse() {
        let mut set = LinkSet::new();
        assert!(set.insert("a", "b"));
        assert!(!set.insert("a", "b"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("a", "b"));
        assert!(!set.contains("b", "a"));
    }

    #[test]
    fn union_is_order_independent() {
        let mut left = LinkSet::new();
        left.insert("a", "b");
        left.insert("c", "d");

        let mut right = LinkSet::new();
        right.insert("a", "b");
        right.insert("a", "c");

        let one = left.clone().union(right.clone());
        let two = right.union(left);
        assert_eq!(one, two);
        assert_eq!(
            one.iter().collect::<Vec<_>>(),
            vec![("a", "b"), ("a", "c"), ("c", "d")]
        );
    }
}
