use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::dedup::DuplicatePair;
use crate::models::{Document, LoginUri};
use crate::prompt::{Announce, Confirm};

pub const MERGE_QUESTION: &str = "Do you want to merge these items?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRecord {
    pub from_id: String,
    pub from_name: String,
    pub into_id: String,
    pub into_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// One side was already merged away, or the pair is unusable. No prompt.
    Skipped,
    /// The user said no (or gave no answer).
    Declined,
    Merged(MergeRecord),
}

/// Offers duplicate pairs for merging and remembers which items have been
/// merged into another one. One resolver per cleaning run.
///
/// Items are tracked by their position in the document, the same identity the
/// duplicate finder uses. Ids are not unique in real exports and may be empty.
#[derive(Debug, Clone, Default)]
pub struct MergeResolver {
    merged: HashSet<usize>,
}

impl MergeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every merge recorded so far.
    pub fn reset(&mut self) {
        self.merged.clear();
    }

    pub fn is_merged(&self, index: usize) -> bool {
        self.merged.contains(&index)
    }

    /// Positions of items that were merged into another item.
    pub fn registry(&self) -> &HashSet<usize> {
        &self.merged
    }

    /// Show the pair, ask, and on "yes" fold the second item's URIs into the
    /// first. The second item stays in the document; only its position is
    /// recorded.
    pub fn resolve(
        &mut self,
        doc: &mut Document,
        pair: DuplicatePair,
        confirm: &mut dyn Confirm,
        announce: &mut dyn Announce,
    ) -> MergeOutcome {
        if pair.first == pair.second {
            return MergeOutcome::Skipped;
        }
        let (Some(a), Some(b)) = (doc.items.get(pair.first), doc.items.get(pair.second)) else {
            return MergeOutcome::Skipped;
        };
        if self.is_merged(pair.first) || self.is_merged(pair.second) {
            debug!(first = pair.first, second = pair.second, "pair already merged, skipping");
            return MergeOutcome::Skipped;
        }
        let (Some(login_a), Some(login_b)) = (a.login.as_ref(), b.login.as_ref()) else {
            return MergeOutcome::Skipped;
        };

        announce.announce(&format!(
            "Found possible duplicate items: \"{}\" and \"{}\"",
            a.name, b.name
        ));
        announce.announce(&format!(
            "\"{}\" has the following URIs: {:?}",
            a.name,
            login_a.uri_strings()
        ));
        announce.announce(&format!(
            "\"{}\" has the following URIs: {:?}",
            b.name,
            login_b.uri_strings()
        ));

        if !confirm.confirm(MERGE_QUESTION, false) {
            debug!(a = %a.id, b = %b.id, "merge declined");
            return MergeOutcome::Declined;
        }

        let incoming = login_b.uris.clone().unwrap_or_default();
        let record = MergeRecord {
            from_id: b.id.clone(),
            from_name: b.name.clone(),
            into_id: a.id.clone(),
            into_name: a.name.clone(),
        };

        if let Some(login) = doc.items[pair.first].login.as_mut() {
            let current = login.uris.take().unwrap_or_default();
            login.uris = Some(union_by_uri(&current, &incoming));
        }
        self.merged.insert(pair.second);

        announce.announce(&format!(
            "Merged item \"{}\" into \"{}\" successfully.",
            record.from_name, record.into_name
        ));
        MergeOutcome::Merged(record)
    }
}

/// `current` followed by `incoming`, one entry per URI string. An entry keeps
/// the position of the first occurrence of its URI but the contents of the
/// last one.
pub fn union_by_uri(current: &[LoginUri], incoming: &[LoginUri]) -> Vec<LoginUri> {
    let mut merged: Vec<LoginUri> = Vec::with_capacity(current.len() + incoming.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in current.iter().chain(incoming) {
        let key = entry.uri.clone().unwrap_or_default();
        match positions.get(&key) {
            Some(&pos) => merged[pos] = entry.clone(),
            None => {
                positions.insert(key, merged.len());
                merged.push(entry.clone());
            }
        }
    }

    merged
}
