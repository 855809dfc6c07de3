//! Sources for the bearer token attached to outgoing requests
//!
//! The client only ever reads credentials. Writing them is left to whatever
//! performs the login flow.

use arc_swap::ArcSwapOption;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage key the token is kept under
pub const TOKEN_KEY: &str = "token";

/// Read access to the stored credential
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated
    fn token(&self) -> Option<String>;
}

/// Never supplies a token
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn token(&self) -> Option<String> {
        None
    }
}

/// A fixed token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<String> {
        non_empty(&self.0)
    }
}

/// A token slot shared with the login flow.
///
/// Clones share the same slot; writers never block readers.
#[derive(Debug, Default, Clone)]
pub struct SharedToken {
    slot: Arc<ArcSwapOption<String>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token
    pub fn set(&self, token: impl Into<String>) {
        self.slot.store(Some(Arc::new(token.into())));
    }

    /// Forget the stored token
    pub fn clear(&self) {
        self.slot.store(None);
    }
}

impl CredentialProvider for SharedToken {
    fn token(&self) -> Option<String> {
        self.slot.load().as_deref().and_then(|token| non_empty(token))
    }
}

/// Persistent client storage: a JSON object on disk, read under [`TOKEN_KEY`].
///
/// The file is read on every request so a token written by another process
/// is picked up without restarting. A missing file, malformed JSON or a
/// missing key all mean "no credential".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/courier/credentials.json`
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("courier")
            .join("credentials.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileTokenStore {
    fn token(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::trace!(path = %self.path.display(), "No credential file: {err}");
                return None;
            }
        };

        let stored: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), "Ignoring malformed credential file: {err}");
                return None;
            }
        };

        stored.get(TOKEN_KEY)?.as_str().and_then(non_empty)
    }
}

/// Browser `localStorage`, read under [`TOKEN_KEY`]
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageToken;

#[cfg(target_arch = "wasm32")]
impl CredentialProvider for LocalStorageToken {
    fn token(&self) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        storage
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .as_deref()
            .and_then(non_empty)
    }
}

fn non_empty(token: &str) -> Option<String> {
    (!token.is_empty()).then(|| token.to_string())
}
