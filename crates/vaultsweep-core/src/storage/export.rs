use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, SweepError};
use crate::models::Document;

/// Read and decode a plaintext vault export.
///
/// A file that cannot be read, is not JSON, or has no `items` array is an
/// error; it is never treated as an empty vault.
pub fn load_document(path: &Path) -> Result<Document> {
    let contents = fs::read_to_string(path).map_err(|source| SweepError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decode = |source| SweepError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let value: Value = serde_json::from_str(&contents).map_err(decode)?;
    if !value.get("items").is_some_and(Value::is_array) {
        return Err(SweepError::MissingItems(path.to_path_buf()));
    }
    serde_json::from_value(value).map_err(decode)
}

/// Write the document as pretty JSON, creating parent directories.
/// On Unix the file is created owner-only since it holds plaintext secrets.
pub fn save_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// `{dir}/{stem}.{suffix}.json` next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vault".to_string());
    input.with_file_name(format!("{stem}.{suffix}.json"))
}

/// Pick where the cleaned document goes. Writing over the input requires
/// `in_place`.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    in_place: bool,
    suffix: &str,
) -> Result<PathBuf> {
    if in_place {
        return Ok(input.to_path_buf());
    }
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input, suffix),
    };
    if same_file(&path, input) {
        return Err(SweepError::WouldOverwriteInput(input.to_path_buf()));
    }
    Ok(path)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Login};
    use tempfile::TempDir;

    const EXPORT: &str = r#"{
        "encrypted": false,
        "folders": [],
        "items": [
            {
                "id": "1",
                "name": "GitHub",
                "type": 1,
                "login": {
                    "username": "octo",
                    "password": "pw",
                    "uris": [{ "match": null, "uri": "https://github.com" }]
                }
            }
        ]
    }"#;

    #[test]
    fn test_load_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, EXPORT).unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.items[0].name, "GitHub");
        assert_eq!(doc.extra.get("encrypted"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_save_and_load_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("clean.json");
        let doc = Document::new(vec![
            Item::new("1", "GitHub")
                .with_login(Login::new("octo", "pw").with_uris(["https://github.com"])),
        ]);

        save_document(&path, &doc).unwrap();
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.json");
        save_document(&path, &Document::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = load_document(Path::new("/tmp/nonexistent_vaultsweep_export.json")).unwrap_err();
        assert!(matches!(err, SweepError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"items\": [").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, SweepError::Decode { .. }));
    }

    #[test]
    fn test_load_without_items_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, r#"{ "folders": [] }"#).unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, SweepError::MissingItems(_)));
    }

    #[test]
    fn test_default_output_path() {
        let out = default_output_path(Path::new("/exports/bitwarden.json"), "cleaned");
        assert_eq!(out, PathBuf::from("/exports/bitwarden.cleaned.json"));
    }

    #[test]
    fn test_resolve_output_refuses_to_overwrite_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        fs::write(&input, EXPORT).unwrap();

        let err = resolve_output_path(&input, Some(&input), false, "cleaned").unwrap_err();
        assert!(matches!(err, SweepError::WouldOverwriteInput(_)));

        let in_place = resolve_output_path(&input, None, true, "cleaned").unwrap();
        assert_eq!(in_place, input);
    }
}
