use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app::get_config_dir;
use crate::constants::SESSION_FILE_NAME;

/// Durable home of the bearer token.
///
/// The gateway takes one of these at construction and reads it before every
/// request; nothing else in the app holds a long-lived copy of the token.
/// Implementations must be safe to share behind an `Arc`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist `token` under the fixed key, replacing any existing value.
    async fn store(&self, token: &str) -> Result<()>;

    /// The current token, or `None` when absent. An empty string counts
    /// as absent.
    ///
    /// Never fails: an unreadable backing store logs a warning and reports
    /// `None`, so storage trouble degrades to "logged out" rather than an
    /// error the caller has to handle.
    async fn read(&self) -> Option<String>;

    /// Remove the stored token. Succeeds when none is stored.
    async fn clear(&self) -> Result<()>;

    /// Whether a token is currently stored.
    async fn is_authenticated(&self) -> bool {
        self.read().await.is_some()
    }
}

/// On-disk session file content
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    auth_token: Option<String>,
}

/// Token store backed by one small TOML file (`session.toml`) in the app
/// config directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store rooted at the platform config directory, e.g.
    /// `~/.config/saferide/session.toml` on Linux.
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: get_config_dir()?.join(SESSION_FILE_NAME),
        })
    }

    /// Store rooted at an explicit directory. Tests point this at a temp dir.
    pub fn at_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE_NAME),
        }
    }

    async fn load(&self) -> Result<SessionFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            // First launch: no file yet, no session.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(SessionFile::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, session: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = toml::to_string_pretty(session)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn store(&self, token: &str) -> Result<()> {
        self.save(&SessionFile {
            auth_token: Some(token.to_string()),
        })
        .await
    }

    async fn read(&self) -> Option<String> {
        match self.load().await {
            Ok(session) => session.auth_token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!("session file unreadable, treating as logged out: {}", err);
                None
            }
        }
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory token store. Used by tests and by embedders that do not want
/// the session to survive the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn read(&self) -> Option<String> {
        self.token.lock().clone().filter(|token| !token.is_empty())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::at_dir(dir.path());

        assert!(store.read().await.is_none());
        assert!(!store.is_authenticated().await);

        store.store("abc123").await.unwrap();
        assert_eq!(store.read().await.as_deref(), Some("abc123"));
        assert!(store.is_authenticated().await);

        // Overwrite wins.
        store.store("next-token").await.unwrap();
        assert_eq!(store.read().await.as_deref(), Some("next-token"));

        store.clear().await.unwrap();
        assert!(store.read().await.is_none());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::at_dir(dir.path());

        store.clear().await.unwrap();
        store.store("t").await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        FileTokenStore::at_dir(dir.path())
            .store("persisted")
            .await
            .unwrap();

        let reopened = FileTokenStore::at_dir(dir.path());
        assert_eq!(reopened.read().await.as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_file_store_fails_open_on_garbage() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE_NAME), "][ not toml ][").unwrap();

        let store = FileTokenStore::at_dir(dir.path());
        assert!(store.read().await.is_none());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_file_store_ignores_empty_token() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE_NAME), "auth_token = \"\"\n").unwrap();

        let store = FileTokenStore::at_dir(dir.path());
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn test_session_file_uses_fixed_key() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::at_dir(dir.path());
        store.store("abc").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE_NAME)).unwrap();
        assert!(raw.contains("auth_token"));
        assert!(raw.contains("abc"));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.read().await.is_none());

        store.store("tok").await.unwrap();
        assert_eq!(store.read().await.as_deref(), Some("tok"));
        assert!(store.is_authenticated().await);

        store.clear().await.unwrap();
        assert!(store.read().await.is_none());
    }

    // Both impls must answer the same after store(""): absent.
    #[tokio::test]
    async fn test_memory_store_ignores_empty_token() {
        let store = MemoryTokenStore::new();
        store.store("").await.unwrap();
        assert!(store.read().await.is_none());
        assert!(!store.is_authenticated().await);
    }
}
