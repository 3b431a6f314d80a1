//! Session Manager: who is logged in, as which role, and whether that has
//! been settled yet.
//!
//! The manager is the only writer of the credential store; the Gateway only
//! reads it. State is published on a `watch` channel so any number of
//! views can observe it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use yatri_client::{
    is_usable, usable_token, ApiError, CredentialStore, Credentials, Gateway, Role,
};

use crate::error::SessionError;
use crate::nav::Navigator;

/// Login surface; logout always lands here.
pub const LOGIN_PATH: &str = "/user/login";

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub is_logged_in: bool,
    pub role: Option<Role>,
    /// True until the first verification settles.
    pub loading: bool,
}

impl Session {
    pub fn initial() -> Self {
        Self {
            is_logged_in: false,
            role: None,
            loading: true,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            role: None,
            loading: false,
        }
    }

    pub fn logged_in(role: Role) -> Self {
        Self {
            is_logged_in: true,
            role: Some(role),
            loading: false,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        !self.loading && self.is_logged_in && self.role == Some(role)
    }
}

/// Owns the session lifecycle: initialize, verify, login, logout.
pub struct SessionManager {
    gateway: Gateway,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// The credential store is the one `gateway` attaches tokens from.
    pub fn new(gateway: Gateway, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(Session::initial());
        Self {
            gateway,
            navigator,
            state,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.gateway.credentials()
    }

    pub fn snapshot(&self) -> Session {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        !self.snapshot().loading
    }

    /// Resolve once the session has settled.
    pub async fn wait_ready(&self) -> Session {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(s) => *s,
            Err(_) => self.snapshot(),
        }
    }

    fn settle(&self, session: Session) -> Session {
        self.state.send_replace(session);
        session
    }

    fn clear_store(&self) {
        if let Err(e) = self.store().clear() {
            warn!("failed to clear persisted credential: {e}");
        }
    }

    /// Settle the session from whatever credential is persisted.
    ///
    /// No token settles logged-out without a network call. A corrupt token
    /// is also wiped from storage.
    pub async fn initialize(&self) -> Session {
        match self.store().token() {
            None => self.settle(Session::logged_out()),
            Some(token) if !is_usable(&token) => {
                if !token.is_empty() {
                    warn!("discarding corrupt persisted token");
                    self.clear_store();
                }
                self.settle(Session::logged_out())
            }
            Some(_) => self.verify_session().await,
        }
    }

    /// Ask the backend who the persisted token belongs to.
    ///
    /// Any failure (unreachable backend, rejected token, unknown role)
    /// clears the credential and settles logged-out.
    pub async fn verify_session(&self) -> Session {
        let outcome = self.gateway.auth().me().await.and_then(|user| {
            user.role
                .parse::<Role>()
                .map_err(|e| ApiError::Decode(e.to_string()))
        });

        match outcome {
            Ok(role) => {
                debug!("session verified as {role}");
                if let Some(token) = usable_token(self.store().as_ref()) {
                    if let Err(e) = self.store().save(&token, role.as_str()) {
                        warn!("failed to persist verified role: {e}");
                    }
                }
                self.settle(Session::logged_in(role))
            }
            Err(e) => {
                if e.is_network() {
                    warn!("backend unreachable during verification: {e}");
                } else {
                    info!("session token rejected: {e}");
                }
                self.clear_store();
                self.settle(Session::logged_out())
            }
        }
    }

    /// Record a fresh login. No network call; state changes immediately.
    pub fn login(&self, token: &str, role: Role) -> Session {
        if let Err(e) = self.store().save(token, role.as_str()) {
            warn!("failed to persist credential: {e}");
        }
        self.settle(Session::logged_in(role))
    }

    /// Exchange email and password for a token, then [`login`](Self::login).
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Role, ApiError> {
        let grant = self.gateway.auth().login(credentials).await?;
        if !is_usable(&grant.access_token) {
            return Err(ApiError::Decode("login response carried no usable token".into()));
        }
        let role = grant
            .role
            .parse::<Role>()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.login(&grant.access_token, role);
        Ok(role)
    }

    /// Tell the backend (best effort), wipe local state, and reload onto
    /// the login surface. Never fails.
    pub async fn logout(&self) {
        if usable_token(self.store().as_ref()).is_some() {
            if let Err(e) = self.gateway.auth().logout().await {
                warn!("server-side logout failed, clearing local session: {e}");
            }
        }
        self.clear_store();
        self.settle(Session::logged_out());
        self.navigator.hard_navigate(LOGIN_PATH);
    }

    /// Guard for role-restricted views.
    pub fn require_role(&self, role: Role) -> Result<(), SessionError> {
        let session = self.snapshot();
        if session.has_role(role) {
            Ok(())
        } else {
            Err(SessionError::Denied {
                required: role,
                actual: session.role,
            })
        }
    }
}
