//! Item predicate filters.
//!
//! Each filter decides per item and drops the failing ones in a single
//! `retain_mut` pass, so adjacent removable items are never skipped and the
//! result does not depend on item order.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::models::{Document, Item, LoginUri};
use crate::prompt::Announce;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    NoUsername,
    NoPassword,
    NoUri,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemovalReason::NoUsername => "no username",
            RemovalReason::NoPassword => "no password",
            RemovalReason::NoUri => "no valid URI",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub id: String,
    pub name: String,
    pub reason: RemovalReason,
}

/// Drop items that declare a login without a (non-empty) username.
pub fn remove_userless(doc: &mut Document, announce: &mut dyn Announce) -> Vec<Removal> {
    remove_where(doc, announce, RemovalReason::NoUsername, |item| {
        item.login.as_ref().is_some_and(|login| !login.has_username())
    })
}

/// Drop items that declare a login without a password.
/// Items with no login at all are left alone here.
pub fn remove_passwordless(doc: &mut Document, announce: &mut dyn Announce) -> Vec<Removal> {
    remove_where(doc, announce, RemovalReason::NoPassword, |item| {
        item.login.as_ref().is_some_and(|login| !login.has_password())
    })
}

/// Strip empty URI entries and drop items left without any URI.
/// Items with no login, or a login without URIs, are dropped too.
pub fn remove_uriless(doc: &mut Document, announce: &mut dyn Announce) -> Vec<Removal> {
    remove_where(doc, announce, RemovalReason::NoUri, |item| {
        match item.login.as_mut().and_then(|login| login.uris.as_mut()) {
            Some(uris) if !uris.is_empty() => {
                uris.retain(LoginUri::is_valid);
                uris.is_empty()
            }
            _ => true,
        }
    })
}

/// Userless, passwordless and uriless filters, in that order.
pub fn apply_all(doc: &mut Document, announce: &mut dyn Announce) -> Vec<Removal> {
    let mut removed = remove_userless(doc, announce);
    removed.extend(remove_passwordless(doc, announce));
    removed.extend(remove_uriless(doc, announce));
    removed
}

fn remove_where<F>(
    doc: &mut Document,
    announce: &mut dyn Announce,
    reason: RemovalReason,
    mut should_remove: F,
) -> Vec<Removal>
where
    F: FnMut(&mut Item) -> bool,
{
    let mut removed = Vec::new();
    doc.items.retain_mut(|item| {
        if !should_remove(item) {
            return true;
        }
        debug!(id = %item.id, %reason, "removing item");
        announce.announce(&format!("Removing item with {reason}: \"{}\"", item.name));
        removed.push(Removal {
            id: item.id.clone(),
            name: item.name.clone(),
            reason,
        });
        false
    });
    removed
}
