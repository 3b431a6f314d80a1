//! Client-side context file.
//!
//! Reads/writes `~/.yatri/config.toml`. Each context names a backend and
//! holds the credential persisted for it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// A single context: one backend plus the credential issued by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "staging").
    pub name: String,

    /// Backend base URL (e.g. "http://localhost:5000/api"). Empty means
    /// `YATRI_API_URL` or the built-in default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Access token (set by `yatri login`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Last role confirmed by the backend.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.yatri/config.toml.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The currently active context, if any.
    pub fn current(&self) -> Option<&Context> {
        self.get(&self.current_context)
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or replace a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context.clear();
        }
        self.contexts.len() < len
    }
}

/// ~/.yatri
fn config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".yatri")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = ClientConfig::default();
        config.current_context = "local".into();
        config.upsert_context(Context {
            name: "local".into(),
            server: "http://localhost:5000/api".into(),
            token: "jwt".into(),
            role: "host".into(),
        });
        config.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("current-context = \"local\""));

        let back = ClientConfig::load(&path).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.current().map(|c| c.role.as_str()), Some("host"));
    }

    #[test]
    fn empty_fields_not_written() {
        let mut config = ClientConfig::default();
        config.upsert_context(Context::new("bare"));
        let raw = toml::to_string_pretty(&config).unwrap();
        assert!(!raw.contains("token"));
        assert!(!raw.contains("server"));
    }

    #[test]
    fn upsert_replaces_by_name() {
        let mut config = ClientConfig::default();
        config.upsert_context(Context::new("a"));
        config.upsert_context(Context {
            server: "http://x".into(),
            ..Context::new("a")
        });
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].server, "http://x");
    }

    #[test]
    fn remove_current_clears_selection() {
        let mut config = ClientConfig::default();
        config.upsert_context(Context::new("a"));
        config.current_context = "a".into();
        assert!(config.remove_context("a"));
        assert!(config.current_context.is_empty());
        assert!(!config.remove_context("a"));
    }
}
