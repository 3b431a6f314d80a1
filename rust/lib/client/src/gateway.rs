//! Request Gateway: the single chokepoint for backend calls.
//!
//! Attaches the bearer token and content-type, sends one attempt, and turns
//! the response into either a [`Payload`] or an [`ApiError`] carrying the
//! server's message.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::credentials::{usable_token, CredentialStore};
use crate::error::ApiError;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "YATRI_API_URL";

/// Base URL used when `YATRI_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const JSON_MIME: &str = "application/json";

// ── Request body ────────────────────────────────────────────────────

/// Request body. Only `Multipart` leaves the content-type to the transport.
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Multipart form builder.
///
/// Kept independent of `reqwest::multipart::Form` so forms can be inspected
/// and cloned before sending.
#[derive(Debug, Clone, Default)]
pub struct Form {
    parts: Vec<FormPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// A file attached to a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: mime.into(),
        }
    }

    /// Guess the MIME type from the file extension.
    pub fn guess(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        };
        Self::new(file_name, bytes, mime)
    }
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Self {
        self.push_file(name, upload);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn push_file(&mut self, name: impl Into<String>, upload: Upload) {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: upload.file_name,
            bytes: upload.bytes,
            mime: upload.mime,
        });
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Text values for a field name, in insertion order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of file parts under a field name.
    pub fn file_count(&self, name: &str) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, FormPart::File { name: n, .. } if n == name))
            .count()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn into_multipart(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    bytes,
                    mime,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

// ── Request options ─────────────────────────────────────────────────

/// Options bag for [`Gateway::send`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Body,
    /// Extra headers, applied after the defaults so they take precedence.
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("request body: {}", e)))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn form(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

// ── Response ────────────────────────────────────────────────────────

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    /// Decode a JSON payload into the caller's declared shape.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Payload::Json(v) => serde_json::from_value(v)
                .map_err(|e| ApiError::Decode(format!("response body: {}", e))),
            Payload::Text(t) => Err(ApiError::Decode(format!(
                "expected JSON response, got text ({} bytes)",
                t.len()
            ))),
        }
    }
}

/// Standard backend response wrapper: `{ success, message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// Unwrap `data`, turning `success: false` into a server error carrying
    /// the envelope's message.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.ensure_success()?
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }

    /// Like [`Envelope::into_data`] but `data` may be absent.
    pub fn ensure_success(self) -> Result<Option<T>, ApiError> {
        if !self.success {
            return Err(ApiError::Server {
                status: 200,
                message: self
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }
        Ok(self.data)
    }
}

/// Message for a non-2xx JSON body: its `message` field, else `Error: <status>`.
pub fn error_message(body: &Value, status: u16) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_message(status))
}

fn fallback_message(status: u16) -> String {
    format!("Error: {}", status)
}

// ── Gateway ─────────────────────────────────────────────────────────

/// HTTP gateway to the Nomad Yatri backend.
///
/// Cloning is cheap; clones share the connection pool, cookie jar and
/// credential store.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl Gateway {
    /// Build a gateway whose HTTP client keeps a cookie store.
    pub fn try_new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Like [`Gateway::try_new`], but falls back to a client without a
    /// cookie store if the builder fails.
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        let base_url = base_url.into();
        match Self::try_new(base_url.clone(), credentials.clone()) {
            Ok(gateway) => gateway,
            Err(e) => {
                warn!("http client with cookie store unavailable, cookies will not be sent: {e}");
                Self::with_client(reqwest::Client::new(), base_url, credentials)
            }
        }
    }

    fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Build a gateway against `YATRI_API_URL` (or the default base URL).
    pub fn from_env(credentials: Arc<dyn CredentialStore>) -> Self {
        Self::new(base_url_from_env(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Default headers, then caller extras (extras replace defaults).
    fn headers(&self, body: &Body, extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if !matches!(body, Body::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        }
        if let Some(token) = usable_token(self.credentials.as_ref()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Credentials("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::Validation(format!("invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::Validation(format!("invalid value for header {}", name)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Send one request and normalise the response.
    pub async fn send(&self, path: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let RequestOptions {
            method,
            body,
            headers,
            query,
        } = options;

        debug!(%method, path, "api request");
        let headers = self.headers(&body, &headers)?;
        let mut req = self.http.request(method, self.url(path)).headers(headers);
        if !query.is_empty() {
            req = req.query(&query);
        }
        req = match body {
            Body::Empty => req,
            Body::Json(value) => req.body(
                serde_json::to_vec(&value)
                    .map_err(|e| ApiError::Decode(format!("request body: {}", e)))?,
            ),
            Body::Multipart(form) => req.multipart(form.into_multipart()?),
        };

        let resp = req.send().await?;
        Self::read(resp).await
    }

    async fn read(resp: reqwest::Response) -> Result<Payload, ApiError> {
        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_MIME));

        if !status.is_success() {
            let code = status.as_u16();
            debug!(status = code, "api request rejected");
            let message = if is_json {
                match resp.json::<Value>().await {
                    Ok(body) => error_message(&body, code),
                    Err(_) => fallback_message(code),
                }
            } else {
                let text = resp.text().await.unwrap_or_default();
                if text.is_empty() {
                    fallback_message(code)
                } else {
                    text
                }
            };
            return Err(ApiError::Server {
                status: code,
                message,
            });
        }

        if is_json {
            let value = resp
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Decode(format!("response body: {}", e)))?;
            return Ok(Payload::Json(value));
        }
        Ok(Payload::Text(resp.text().await?))
    }

    /// Send and discard the body.
    pub async fn execute(&self, path: &str, options: RequestOptions) -> Result<(), ApiError> {
        self.send(path, options).await.map(|_| ())
    }

    // ── Typed helpers ───────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, RequestOptions::new(Method::GET)).await?.decode()
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut options = RequestOptions::new(Method::GET);
        for (k, v) in query {
            options = options.query(*k, *v);
        }
        self.send(path, options).await?.decode()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(Method::POST).json(body)?;
        self.send(path, options).await?.decode()
    }

    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let options = RequestOptions::new(Method::POST).form(form);
        self.send(path, options).await?.decode()
    }

    pub async fn put_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let options = RequestOptions::new(Method::PUT).form(form);
        self.send(path, options).await?.decode()
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, RequestOptions::new(Method::PATCH)).await?.decode()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, RequestOptions::new(Method::DELETE)).await?.decode()
    }
}

/// `YATRI_API_URL`, or [`DEFAULT_API_URL`] when unset or blank.
pub fn base_url_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
