//! Loading the Gemini API key from a YAML secrets file.
//!
//! The file holds a list of single-key entries under `SECRETS`:
//!
//! ```yaml
//! SECRETS:
//!   - gemini_api_key: YOUR_API_KEY
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SECRETS_FILE_NAME: &str = "secrets.yml";
pub const API_KEY_NAME: &str = "gemini_api_key";

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "SECRETS", default)]
    secrets: Vec<HashMap<String, serde_yaml::Value>>,
}

/// Errors that can occur while loading the API key.
#[derive(Debug)]
pub enum SecretsError {
    /// No secrets file exists at any of the searched locations.
    NotFound { searched: Vec<PathBuf> },

    /// The secrets file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The secrets file is not valid YAML of the expected shape.
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// No `SECRETS` entry supplies the key.
    MissingKey { path: PathBuf, key: String },

    /// The key is present but its value is not a usable credential.
    InvalidCredential { path: PathBuf, key: String },
}

impl fmt::Display for SecretsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretsError::NotFound { searched } => {
                let searched = searched
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "No {SECRETS_FILE_NAME} found (looked in: {searched})")
            }
            SecretsError::Read { path, source } => {
                write!(f, "Failed to read secrets at {}: {}", path.display(), source)
            }
            SecretsError::Parse { path, source } => {
                write!(f, "Failed to parse secrets at {}: {}", path.display(), source)
            }
            SecretsError::MissingKey { path, key } => {
                write!(f, "No '{key}' entry under SECRETS in {}", path.display())
            }
            SecretsError::InvalidCredential { path, key } => {
                write!(
                    f,
                    "The '{key}' entry in {} must be a non-empty string",
                    path.display()
                )
            }
        }
    }
}

impl StdError for SecretsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SecretsError::Read { source, .. } => Some(source),
            SecretsError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Candidate secrets file locations, in lookup order.
pub fn secrets_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SECRETS_FILE_NAME)];
    if let Some(proj_dirs) = ProjectDirs::from("org", "pvai", "pvai") {
        paths.push(proj_dirs.config_dir().join(SECRETS_FILE_NAME));
    }
    paths
}

/// First existing path among `candidates`.
pub fn locate_secrets_file(candidates: &[PathBuf]) -> Result<PathBuf, SecretsError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| SecretsError::NotFound {
            searched: candidates.to_vec(),
        })
}

/// Extract `key` from YAML secrets `contents` read from `path`.
pub fn parse_secret(contents: &str, path: &Path, key: &str) -> Result<String, SecretsError> {
    let file: SecretsFile =
        serde_yaml::from_str(contents).map_err(|source| SecretsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let value = file
        .secrets
        .iter()
        .find_map(|entry| entry.get(key))
        .ok_or_else(|| SecretsError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        })?;

    match value {
        serde_yaml::Value::String(secret) if !secret.trim().is_empty() => {
            Ok(secret.trim().to_string())
        }
        _ => Err(SecretsError::InvalidCredential {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}

pub fn load_api_key_from_path(path: &Path) -> Result<String, SecretsError> {
    let contents = fs::read_to_string(path).map_err(|source| SecretsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_secret(&contents, path, API_KEY_NAME)
}

/// Locate the secrets file and load the Gemini API key from it.
pub fn load_api_key() -> Result<String, SecretsError> {
    let path = locate_secrets_file(&secrets_search_paths())?;
    load_api_key_from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_secrets(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(SECRETS_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_key_from_secrets_list() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(
            &dir,
            "SECRETS:\n  - other_service: nope\n  - gemini_api_key: abc123\n",
        );

        assert_eq!(load_api_key_from_path(&path).unwrap(), "abc123");
    }

    #[test]
    fn missing_key_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "SECRETS:\n  - other_service: nope\n");

        let err = load_api_key_from_path(&path).unwrap_err();
        assert!(matches!(err, SecretsError::MissingKey { ref key, .. } if key == API_KEY_NAME));
    }

    #[test]
    fn missing_secrets_section_is_a_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "OTHER: 1\n");

        let err = load_api_key_from_path(&path).unwrap_err();
        assert!(matches!(err, SecretsError::MissingKey { .. }));
    }

    #[test]
    fn blank_or_non_string_key_is_invalid() {
        let dir = TempDir::new().unwrap();

        let blank = write_secrets(&dir, "SECRETS:\n  - gemini_api_key: \"  \"\n");
        let err = load_api_key_from_path(&blank).unwrap_err();
        assert!(matches!(err, SecretsError::InvalidCredential { .. }));

        let null = write_secrets(&dir, "SECRETS:\n  - gemini_api_key:\n");
        let err = load_api_key_from_path(&null).unwrap_err();
        assert!(matches!(err, SecretsError::InvalidCredential { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_secrets(&dir, "SECRETS: [unclosed\n");

        let err = load_api_key_from_path(&path).unwrap_err();
        assert!(matches!(err, SecretsError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse secrets at "));
        assert!(err.source().is_some());
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_api_key_from_path(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, SecretsError::Read { .. }));
    }

    #[test]
    fn locate_picks_first_existing_candidate() {
        let dir = TempDir::new().unwrap();
        let existing = write_secrets(&dir, "SECRETS: []\n");
        let absent = dir.path().join("nowhere").join(SECRETS_FILE_NAME);

        let found = locate_secrets_file(&[absent.clone(), existing.clone()]).unwrap();
        assert_eq!(found, existing);

        let err = locate_secrets_file(&[absent.clone()]).unwrap_err();
        match err {
            SecretsError::NotFound { searched } => assert_eq!(searched, vec![absent]),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn search_paths_start_with_working_directory() {
        let paths = secrets_search_paths();
        assert_eq!(paths[0], PathBuf::from(SECRETS_FILE_NAME));
    }
}
