use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Document, Item};

/// Whether a duplicate pair is reported once or in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrder {
    /// `(a, b)` with `a` before `b` in the document, once per pair.
    #[default]
    Unordered,
    /// `(a, b)` and `(b, a)`.
    Ordered,
}

/// Two distinct items (by position) sharing first URI, username and password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub first: usize,
    pub second: usize,
}

type MatchKey<'a> = (&'a str, Option<&'a str>, Option<&'a str>);

#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    order: PairOrder,
}

impl DuplicateFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair_order(mut self, order: PairOrder) -> Self {
        self.order = order;
        self
    }

    /// Groups items by `(first uri, username, password)` and pairs them up
    /// within each group. Items without a first URI are never compared.
    ///
    /// Pairs come back sorted by `(first, second)`, so prompts follow the
    /// document order regardless of grouping.
    pub fn find_pairs(&self, doc: &Document) -> Vec<DuplicatePair> {
        let mut buckets: HashMap<MatchKey<'_>, Vec<usize>> = HashMap::new();
        for (idx, item) in doc.items.iter().enumerate() {
            match match_key(item) {
                Some(key) => buckets.entry(key).or_default().push(idx),
                None => {
                    if item.has_login() {
                        warn!(id = %item.id, "login without a first URI skipped by duplicate scan");
                    }
                }
            }
        }

        let groups: Vec<Vec<usize>> = buckets
            .into_values()
            .filter(|indexes| indexes.len() > 1)
            .collect();

        let mut pairs = Vec::new();
        for indexes in &groups {
            for (pos, &first) in indexes.iter().enumerate() {
                for &second in &indexes[pos + 1..] {
                    pairs.push(DuplicatePair { first, second });
                    if self.order == PairOrder::Ordered {
                        pairs.push(DuplicatePair {
                            first: second,
                            second: first,
                        });
                    }
                }
            }
        }
        pairs.sort_by_key(|pair| (pair.first, pair.second));

        debug!(groups = groups.len(), pairs = pairs.len(), "duplicate scan finished");
        pairs
    }
}

fn match_key(item: &Item) -> Option<MatchKey<'_>> {
    let login = item.login.as_ref()?;
    let uri = login.first_uri()?;
    Some((uri, login.username.as_deref(), login.password.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Login;

    fn login_item(id: &str, username: &str, password: &str, uris: &[&str]) -> Item {
        Item::new(id, id.to_uppercase())
            .with_login(Login::new(username, password).with_uris(uris.iter().copied()))
    }

    fn as_tuples(pairs: &[DuplicatePair]) -> Vec<(usize, usize)> {
        pairs.iter().map(|p| (p.first, p.second)).collect()
    }

    #[test]
    fn test_finds_pair_with_same_uri_username_password() {
        let doc = Document::new(vec![
            login_item("a", "alice", "pw", &["https://x.com"]),
            login_item("b", "bob", "pw", &["https://x.com"]),
            login_item("c", "alice", "pw", &["https://x.com", "https://y.com"]),
        ]);

        let pairs = DuplicateFinder::new().find_pairs(&doc);
        assert_eq!(as_tuples(&pairs), vec![(0, 2)]);
    }

    #[test]
    fn test_ordered_reports_both_directions() {
        let doc = Document::new(vec![
            login_item("a", "alice", "pw", &["https://x.com"]),
            login_item("b", "alice", "pw", &["https://x.com"]),
        ]);

        let pairs = DuplicateFinder::new()
            .with_pair_order(PairOrder::Ordered)
            .find_pairs(&doc);
        assert_eq!(as_tuples(&pairs), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_ordered_pairs_are_sorted_across_the_document() {
        let doc = Document::new(vec![
            login_item("a", "alice", "pw", &["https://x.com"]),
            login_item("b", "alice", "pw", &["https://x.com"]),
            login_item("c", "alice", "pw", &["https://x.com"]),
        ]);

        let pairs = DuplicateFinder::new()
            .with_pair_order(PairOrder::Ordered)
            .find_pairs(&doc);
        assert_eq!(
            as_tuples(&pairs),
            vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]
        );
    }

    #[test]
    fn test_only_first_uri_is_compared() {
        let doc = Document::new(vec![
            login_item("a", "alice", "pw", &["https://x.com", "https://y.com"]),
            login_item("b", "alice", "pw", &["https://y.com", "https://x.com"]),
        ]);
        assert!(DuplicateFinder::new().find_pairs(&doc).is_empty());
    }

    #[test]
    fn test_different_password_is_not_a_duplicate() {
        let doc = Document::new(vec![
            login_item("a", "alice", "pw1", &["https://x.com"]),
            login_item("b", "alice", "pw2", &["https://x.com"]),
        ]);
        assert!(DuplicateFinder::new().find_pairs(&doc).is_empty());
    }

    #[test]
    fn test_identity_is_positional_not_by_id() {
        let doc = Document::new(vec![
            login_item("same", "alice", "pw", &["https://x.com"]),
            login_item("same", "alice", "pw", &["https://x.com"]),
        ]);
        assert_eq!(as_tuples(&DuplicateFinder::new().find_pairs(&doc)), vec![(0, 1)]);
    }

    #[test]
    fn test_three_way_group_yields_every_pair() {
        let doc = Document::new(vec![
            login_item("a", "u", "p", &["https://x.com"]),
            login_item("z", "other", "p", &["https://z.com"]),
            login_item("b", "u", "p", &["https://x.com"]),
            login_item("c", "u", "p", &["https://x.com"]),
        ]);

        let pairs = DuplicateFinder::new().find_pairs(&doc);
        assert_eq!(as_tuples(&pairs), vec![(0, 2), (0, 3), (2, 3)]);
    }

    #[test]
    fn test_groups_are_reported_in_document_order() {
        let doc = Document::new(vec![
            login_item("a", "u", "p", &["https://first.com"]),
            login_item("b", "u", "p", &["https://second.com"]),
            login_item("c", "u", "p", &["https://second.com"]),
            login_item("d", "u", "p", &["https://first.com"]),
        ]);

        let pairs = DuplicateFinder::new().find_pairs(&doc);
        assert_eq!(as_tuples(&pairs), vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn test_items_without_uris_are_guarded() {
        let doc = Document::new(vec![
            Item::new("note", "Note"),
            Item::new("bare", "Bare").with_login(Login::new("u", "p")),
            login_item("empty", "u", "p", &[]),
            login_item("a", "u", "p", &["https://x.com"]),
        ]);
        assert!(DuplicateFinder::new().find_pairs(&doc).is_empty());
    }
}
