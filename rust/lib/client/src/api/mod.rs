//! Per-resource API modules over the [`Gateway`].
//!
//! Each module declares the payload shape it expects; nothing reads fields
//! off untyped JSON.

pub mod admin;
pub mod auth;
pub mod host;
pub mod models;
pub mod programs;
pub mod volunteer;

use serde_json::Value;

use crate::error::ApiError;
use crate::gateway::{Envelope, Gateway, Payload, RequestOptions};

pub use admin::{AdminApi, ProgramQuery, UserQuery};
pub use auth::AuthApi;
pub use host::{HostApi, HostProfileForm};
pub use programs::{ProgramForm, ProgramsApi};
pub use volunteer::{VolunteerApi, VolunteerProfileForm};

impl Gateway {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.clone())
    }

    pub fn host(&self) -> HostApi {
        HostApi::new(self.clone())
    }

    pub fn programs(&self) -> ProgramsApi {
        ProgramsApi::new(self.clone())
    }

    pub fn volunteer(&self) -> VolunteerApi {
        VolunteerApi::new(self.clone())
    }
}

/// Send a mutation. A JSON answer must not carry `success: false`; a text
/// or empty answer counts as success.
pub(crate) async fn mutate(
    gateway: &Gateway,
    path: &str,
    options: RequestOptions,
) -> Result<(), ApiError> {
    match gateway.send(path, options).await? {
        Payload::Json(value) => {
            let env: Envelope<Value> = serde_json::from_value(value)
                .map_err(|e| ApiError::Decode(format!("response body: {}", e)))?;
            env.ensure_success().map(|_| ())
        }
        Payload::Text(_) => Ok(()),
    }
}
