//! Persisted credential: the access token and last-known role.
//!
//! The Gateway only reads from a [`CredentialStore`]; the session manager is
//! the single writer.

use std::sync::RwLock;

use crate::error::ApiError;

/// Literal produced by a known serialization bug upstream. A persisted token
/// equal to this string is treated as corrupt.
pub const CORRUPT_TOKEN: &str = "[object Object]";

/// Storage for the access token and role, keyed by fixed names.
///
/// Implementations must keep token and role together: `save` writes both,
/// `clear` removes both.
pub trait CredentialStore: Send + Sync + 'static {
    fn token(&self) -> Option<String>;
    fn role(&self) -> Option<String>;
    fn save(&self, token: &str, role: &str) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// The persisted token if it is present, non-empty and not corrupt.
pub fn usable_token(store: &dyn CredentialStore) -> Option<String> {
    store.token().filter(|t| is_usable(t))
}

/// True when a raw persisted token can be sent to the backend.
pub fn is_usable(token: &str) -> bool {
    !token.is_empty() && token != CORRUPT_TOKEN
}

/// In-process credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    inner: RwLock<Stored>,
}

#[derive(Debug, Default, Clone)]
struct Stored {
    token: Option<String>,
    role: Option<String>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token (and optionally a role) already persisted.
    pub fn with_token(token: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            inner: RwLock::new(Stored {
                token: Some(token.into()),
                role: role.map(str::to_string),
            }),
        }
    }

    fn read(&self) -> Stored {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write(&self, stored: Stored) {
        match self.inner.write() {
            Ok(mut guard) => *guard = stored,
            Err(poisoned) => *poisoned.into_inner() = stored,
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.read().token
    }

    fn role(&self) -> Option<String> {
        self.read().role
    }

    fn save(&self, token: &str, role: &str) -> Result<(), ApiError> {
        self.write(Stored {
            token: Some(token.to_string()),
            role: Some(role.to_string()),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.write(Stored::default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_nothing() {
        let store = MemoryCredentials::new();
        assert!(store.token().is_none());
        assert!(store.role().is_none());
        assert!(usable_token(&store).is_none());
    }

    #[test]
    fn save_then_clear() {
        let store = MemoryCredentials::new();
        store.save("jwt", "host").unwrap();
        assert_eq!(store.token().as_deref(), Some("jwt"));
        assert_eq!(store.role().as_deref(), Some("host"));

        store.clear().unwrap();
        assert!(store.token().is_none());
        assert!(store.role().is_none());
    }

    #[test]
    fn corrupt_token_is_not_usable() {
        let store = MemoryCredentials::with_token(CORRUPT_TOKEN, Some("admin"));
        assert_eq!(store.token().as_deref(), Some(CORRUPT_TOKEN));
        assert!(usable_token(&store).is_none());
    }

    #[test]
    fn empty_token_is_not_usable() {
        assert!(!is_usable(""));
        assert!(is_usable("abc.def.ghi"));
    }
}
