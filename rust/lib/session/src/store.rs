//! Credential store backed by one context of the TOML config file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use yatri_client::{ApiError, CredentialStore};

use crate::config::{ClientConfig, Context};
use crate::error::SessionError;

/// Persists token and role into a named context of a [`ClientConfig`] file.
///
/// Every call re-reads the file, so edits made by another process (or
/// another `yatri` invocation) are picked up.
#[derive(Debug)]
pub struct FileCredentials {
    path: PathBuf,
    context: String,
    write: Mutex<()>,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: context.into(),
            write: Mutex::new(()),
        }
    }

    /// Store for the file's current context.
    pub fn current(path: &Path) -> Result<Self, SessionError> {
        let config = ClientConfig::load(path)?;
        if config.current().is_none() {
            return Err(SessionError::Storage(
                "no current context. Use 'yatri use context <name>' first".into(),
            ));
        }
        Ok(Self::new(path, config.current_context))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    fn read(&self) -> Option<Context> {
        match ClientConfig::load(&self.path) {
            Ok(config) => config.get(&self.context).cloned(),
            Err(e) => {
                tracing::warn!("cannot read {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Rewrite this context in the file. A missing context is created only
    /// when `create` is set; otherwise nothing is written.
    fn update(&self, create: bool, apply: impl FnOnce(&mut Context)) -> Result<(), SessionError> {
        let _guard = self.write.lock().unwrap_or_else(|p| p.into_inner());
        let mut config = ClientConfig::load(&self.path)?;
        match config.get_mut(&self.context) {
            Some(ctx) => apply(ctx),
            None if create => {
                let mut ctx = Context::new(&self.context);
                apply(&mut ctx);
                config.upsert_context(ctx);
            }
            None => return Ok(()),
        }
        config.save(&self.path)
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

impl CredentialStore for FileCredentials {
    fn token(&self) -> Option<String> {
        self.read().and_then(|c| non_empty(c.token))
    }

    fn role(&self) -> Option<String> {
        self.read().and_then(|c| non_empty(c.role))
    }

    fn save(&self, token: &str, role: &str) -> Result<(), ApiError> {
        self.update(true, |ctx| {
            ctx.token = token.to_string();
            ctx.role = role.to_string();
        })
        .map_err(ApiError::from)
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.update(false, |ctx| {
            ctx.token.clear();
            ctx.role.clear();
        })
        .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(dir: &Path) -> PathBuf {
        let path = dir.join("config.toml");
        let mut config = ClientConfig::default();
        config.current_context = "local".into();
        config.upsert_context(Context {
            server: "http://localhost:5000/api".into(),
            ..Context::new("local")
        });
        config.upsert_context(Context::new("other"));
        config.save(&path).unwrap();
        path
    }

    #[test]
    fn save_and_clear_touch_only_own_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(dir.path());
        let store = FileCredentials::current(&path).unwrap();
        assert_eq!(store.context(), "local");
        assert_eq!(store.token(), None);

        store.save("jwt-1", "volunteer").unwrap();
        assert_eq!(store.token().as_deref(), Some("jwt-1"));
        assert_eq!(store.role().as_deref(), Some("volunteer"));

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.get("other").unwrap().token, "");
        assert_eq!(config.get("local").unwrap().server, "http://localhost:5000/api");

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.role(), None);
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.get("local").unwrap().server, "http://localhost:5000/api");
    }

    #[test]
    fn save_creates_missing_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = FileCredentials::new(&path, "fresh");
        store.save("t", "admin").unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.get("fresh").unwrap().role, "admin");
    }

    #[test]
    fn clear_leaves_deleted_context_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(dir.path());
        let store = FileCredentials::new(&path, "other");

        let mut config = ClientConfig::load(&path).unwrap();
        assert!(config.remove_context("other"));
        config.save(&path).unwrap();

        store.clear().unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert!(config.get("other").is_none());
        assert_eq!(config.contexts.len(), 1);

        let missing = dir.path().join("never-written.toml");
        FileCredentials::new(&missing, "local").clear().unwrap();
        assert!(!missing.exists());
    }

    #[test]
    fn current_requires_selected_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCredentials::current(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
    }

    #[test]
    fn unreadable_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let store = FileCredentials::new(&path, "local");
        assert_eq!(store.token(), None);
        assert!(store.save("t", "host").is_err());
    }
}
