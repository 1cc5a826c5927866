//! File-backed credential store.
//!
//! One JSON record under a fixed path — the client-side analogue of the
//! origin-scoped browser storage the session machine expects. Reads are
//! synchronous so session init never depends on the network. IO failures
//! degrade to "no credential" rather than failing the caller; the store has
//! no validation logic of its own.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use werkbank_session::{Credential, CredentialStore};

#[derive(Debug, Serialize, Deserialize)]
struct TokenRecord {
    access_token: Credential,
}

/// Durable credential store persisting a single JSON record.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice::<TokenRecord>(&bytes) {
            Ok(record) => Some(record.access_token),
            Err(err) => {
                tracing::warn!(
                    %err,
                    path = %self.path.display(),
                    "corrupt token record, treating as absent"
                );
                None
            }
        }
    }

    fn set(&self, credential: &Credential) {
        let record = TokenRecord {
            access_token: credential.clone(),
        };
        let json = match serde_json::to_vec(&record) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "failed to encode token record");
                return;
            }
        };

        if let Some(dir) = self.path.parent() {
            let _ = fs::create_dir_all(dir);
        }

        // Write-then-rename keeps a crash from leaving a torn record.
        let tmp = self.path.with_extension("tmp");
        let written = fs::write(&tmp, &json).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(err) = written {
            tracing::warn!(%err, path = %self.path.display(), "failed to persist credential");
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(%err, path = %self.path.display(), "failed to clear credential");
            }
        }
    }
}
