use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::lenient;

// ─── Document ───────────────────────────────────────────────

/// A decrypted vault export: `{ "items": [...], ... }`.
/// Everything besides `items` (folders, the `encrypted` flag, …) is kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub items: Vec<Item>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            extra: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

// ─── Item ───────────────────────────────────────────────────

/// One credential entry. Non-login items (secure notes, cards, identities)
/// simply have no `login`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub login: Option<Login>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, login: Login) -> Self {
        self.login = Some(login);
        self
    }

    pub fn has_login(&self) -> bool {
        self.login.is_some()
    }
}

// ─── Login ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Login {
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::uri_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub uris: Option<Vec<LoginUri>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Login {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn with_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uris = Some(uris.into_iter().map(LoginUri::new).collect());
        self
    }

    /// Present and non-empty.
    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Present; an empty password still counts as set.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn first_uri(&self) -> Option<&str> {
        self.uris.as_ref()?.first()?.uri.as_deref()
    }

    /// URI strings in order, skipping entries without one.
    pub fn uri_strings(&self) -> Vec<&str> {
        self.uris
            .iter()
            .flatten()
            .filter_map(|entry| entry.uri.as_deref())
            .collect()
    }
}

// ─── LoginUri ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginUri {
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub uri: Option<String>,

    /// `match` and any other per-URI settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoginUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            extra: Map::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.uri.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_bitwarden_login_item() {
        let raw = json!({
            "id": "b1",
            "name": "GitHub",
            "type": 1,
            "folderId": null,
            "login": {
                "username": "octo",
                "password": "hunter2",
                "totp": null,
                "uris": [{ "match": null, "uri": "https://github.com" }]
            }
        });

        let item: Item = serde_json::from_value(raw).unwrap();
        let login = item.login.as_ref().unwrap();
        assert_eq!(item.id, "b1");
        assert_eq!(login.first_uri(), Some("https://github.com"));
        assert!(login.has_username());
        assert!(login.has_password());
        assert_eq!(item.extra.get("type"), Some(&json!(1)));
        assert!(login.extra.contains_key("totp"));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "encrypted": false,
            "folders": [{ "id": "f1", "name": "Work" }],
            "items": [{
                "id": "n1",
                "name": "Note",
                "type": 2,
                "secureNote": { "type": 0 }
            }]
        });

        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert!(!doc.items[0].has_login());
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_malformed_fields_decode_as_absent() {
        let raw = json!({
            "id": "m1",
            "name": "Broken",
            "login": {
                "username": 42,
                "password": ["nope"],
                "uris": [7, { "uri": "https://ok.example" }, { "uri": false }]
            }
        });

        let item: Item = serde_json::from_value(raw).unwrap();
        let login = item.login.unwrap();
        assert_eq!(login.username, None);
        assert_eq!(login.password, None);
        assert_eq!(login.uris.as_ref().map(Vec::len), Some(3));
        assert_eq!(login.uri_strings(), vec!["https://ok.example"]);
    }

    #[test]
    fn test_null_or_scalar_login_is_no_login() {
        let null_login: Item =
            serde_json::from_value(json!({ "id": "a", "name": "A", "login": null })).unwrap();
        assert!(!null_login.has_login());

        let scalar_login: Item =
            serde_json::from_value(json!({ "id": "b", "name": "B", "login": "x" })).unwrap();
        assert!(!scalar_login.has_login());
    }

    #[test]
    fn test_empty_username_is_not_a_username() {
        let login = Login::new("", "pw");
        assert!(!login.has_username());

        let login = Login::new("user", "");
        assert!(login.has_password());
    }
}
