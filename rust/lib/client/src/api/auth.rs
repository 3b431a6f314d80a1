//! `/users` endpoints: login, logout, current user.

use reqwest::Method;
use serde::Deserialize;

use super::models::{Credentials, CurrentUser, LoginGrant};
use crate::error::ApiError;
use crate::gateway::{Envelope, Gateway, RequestOptions};

pub const LOGIN_PATH: &str = "/users/login";
pub const LOGOUT_PATH: &str = "/users/logout";
pub const ME_PATH: &str = "/users/me";

/// Login responses have carried the token both at the top level and inside
/// `data`, under `accessToken` or `token`, with the role either flat or on
/// a nested user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGrant {
    #[serde(default, alias = "token", alias = "access_token")]
    access_token: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    user: Option<RoleHolder>,
}

#[derive(Debug, Default, Deserialize)]
struct RoleHolder {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLogin {
    #[serde(default)]
    data: Option<RawGrant>,
    #[serde(flatten)]
    top: RawGrant,
}

impl RawGrant {
    fn role(&self) -> Option<String> {
        self.role
            .clone()
            .or_else(|| self.user.as_ref().and_then(|u| u.role.clone()))
    }
}

impl RawLogin {
    fn into_grant(self) -> Result<LoginGrant, ApiError> {
        let nested = self.data.unwrap_or_default();
        let access_token = nested
            .access_token
            .clone()
            .or_else(|| self.top.access_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Decode("login response has no access token".into()))?;
        let role = nested
            .role()
            .or_else(|| self.top.role())
            .ok_or_else(|| ApiError::Decode("login response has no role".into()))?;
        Ok(LoginGrant { access_token, role })
    }
}

#[derive(Debug, Deserialize)]
struct MeData {
    user: CurrentUser,
}

/// Authentication endpoints.
#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `POST /users/login`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let raw: RawLogin = self.gateway.post_json(LOGIN_PATH, credentials).await?;
        raw.into_grant()
    }

    /// `GET /users/me`; the role lives at `data.user.role`.
    pub async fn me(&self) -> Result<CurrentUser, ApiError> {
        let env: Envelope<MeData> = self.gateway.get(ME_PATH).await?;
        Ok(env.into_data()?.user)
    }

    /// `POST /users/logout` with the persisted token.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.gateway
            .execute(LOGOUT_PATH, RequestOptions::new(Method::POST))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grant(value: serde_json::Value) -> Result<LoginGrant, ApiError> {
        serde_json::from_value::<RawLogin>(value).unwrap().into_grant()
    }

    #[test]
    fn grant_from_nested_data() {
        let g = grant(json!({
            "success": true,
            "data": {"accessToken": "jwt-1", "user": {"role": "host"}}
        }))
        .unwrap();
        assert_eq!(g.access_token, "jwt-1");
        assert_eq!(g.role, "host");
    }

    #[test]
    fn grant_from_top_level() {
        let g = grant(json!({"token": "jwt-2", "role": "volunteer"})).unwrap();
        assert_eq!(g.access_token, "jwt-2");
        assert_eq!(g.role, "volunteer");
    }

    #[test]
    fn grant_without_token_rejected() {
        let err = grant(json!({"data": {"role": "admin"}})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn grant_without_role_rejected() {
        let err = grant(json!({"data": {"accessToken": "jwt"}})).unwrap_err();
        assert!(err.to_string().contains("no role"));
    }

    #[test]
    fn me_envelope_decodes_nested_role() {
        let env: Envelope<MeData> =
            serde_json::from_value(json!({"data": {"user": {"role": "host"}}})).unwrap();
        assert!(env.success);
        assert_eq!(env.into_data().unwrap().user.role, "host");

        let env: Envelope<MeData> =
            serde_json::from_value(json!({"success": false, "message": "Unauthorized"})).unwrap();
        assert_eq!(env.into_data().unwrap_err().to_string(), "Unauthorized");
    }
}
