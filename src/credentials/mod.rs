//! Speech service credentials.
//!
//! Credentials live in a small JSON file, `azure_secret.json` by default:
//!
//! ```json
//! {
//!   "key": "<subscription key>",
//!   "region": "westeurope"
//! }
//! ```
//!
//! On first run the file is created with empty fields so the user has a
//! template to fill in, and the run stops before any job is read. The key is
//! treated as a secret throughout: `Debug` redacts it and the backing memory
//! is wiped on drop.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default location of the credentials file.
pub const DEFAULT_CREDENTIALS_FILE: &str = "azure_secret.json";

/// Written on first run so the user has a template to fill in.
const CREDENTIALS_TEMPLATE: &str = r#"{
  "key": "",
  "region": ""
}
"#;

/// Credential error types
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("created {}; fill in your speech service key and region, then run again", .path.display())]
    Created { path: PathBuf },

    #[error("could not create {}: {source}", .path.display())]
    Uncreatable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} has an empty key or region; fill in both fields", .path.display())]
    Incomplete { path: PathBuf },
}

/// Subscription key and region for one speech resource.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub key: String,
    pub region: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"[REDACTED]")
            .field("region", &self.region)
            .finish()
    }
}

/// Load credentials, creating a fill-in template on first run.
///
/// Every error here is terminal for the caller; no job should be read until
/// a usable key and region exist.
pub fn load_or_init(path: &Path) -> Result<Credentials, CredentialsError> {
    if !path.exists() {
        std::fs::write(path, CREDENTIALS_TEMPLATE).map_err(|source| {
            CredentialsError::Uncreatable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        return Err(CredentialsError::Created {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|source| CredentialsError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let credentials: Credentials =
        serde_json::from_str(&raw).map_err(|source| CredentialsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    if credentials.key.is_empty() || credentials.region.is_empty() {
        return Err(CredentialsError::Incomplete {
            path: path.to_path_buf(),
        });
    }
    Ok(credentials)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
