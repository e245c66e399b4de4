use crate::features::auth::types::TokenPair;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed persistence for the token pair. This is the only durable
/// client-side state; the value is opaque and trusted as-is, with no expiry
/// tracking or encryption.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted pair. Never errors: a missing, unreadable, or
    /// malformed file is treated as "no stored session".
    #[must_use]
    pub fn load(&self) -> Option<TokenPair> {
        let raw = fs::read_to_string(&self.path).ok()?;

        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                debug!("discarding malformed token file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persist the pair, overwriting any prior value. Writes through a
    /// sibling temp file so a crash never leaves a half-written store.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, tokens: &TokenPair) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string(tokens)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Remove the persisted pair. A missing file is not an error.
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!("failed to remove token file {}: {e}", self.path.display());
            }
        }
    }
}
