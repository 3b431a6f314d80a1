//! Nomad Yatri HTTP client.
//!
//! Every backend call flows through one [`Gateway`]: it attaches the bearer
//! token from a [`CredentialStore`], picks the content-type, and converts
//! non-2xx responses into [`ApiError::Server`] carrying the server's message.
//! The [`api`] modules wrap it with typed per-resource calls.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use yatri_client::{Gateway, MemoryCredentials};
//!
//! let gateway = Gateway::from_env(Arc::new(MemoryCredentials::new()));
//! let program = gateway.programs().get(42).await?;
//! ```

pub mod api;
pub mod credentials;
pub mod error;
pub mod gateway;

pub use api::models::{
    AdminProgram, AdminUser, Application, ApplicationStatus, Credentials, CurrentUser,
    DashboardStats, HostProfile, LoginGrant, Program, Role, SortOrder, UnknownRole,
    VolunteerProfile,
};
pub use credentials::{is_usable, usable_token, CredentialStore, MemoryCredentials, CORRUPT_TOKEN};
pub use error::ApiError;
pub use gateway::{
    base_url_from_env, Body, Envelope, Form, FormPart, Gateway, Payload, RequestOptions, Upload,
    API_URL_ENV, DEFAULT_API_URL,
};
