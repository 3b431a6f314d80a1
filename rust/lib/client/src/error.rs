/// Client-side API error.
///
/// Every backend call resolves to either a decoded payload or one of these.
/// `Display` yields the human-readable message pages show in dialogs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `message` field, the raw
    /// text body, or `"Error: <status>"` when neither is available.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("credentials: {0}")]
    Credentials(String),

    /// Rejected on the client before any request was issued.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Status code for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// True for 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_only() {
        let err = ApiError::Server { status: 400, message: "Title is required".into() };
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_network());
    }

    #[test]
    fn unauthorized_statuses() {
        let e401 = ApiError::Server { status: 401, message: "Error: 401".into() };
        let e403 = ApiError::Server { status: 403, message: "forbidden".into() };
        let e500 = ApiError::Server { status: 500, message: "boom".into() };
        assert!(e401.is_unauthorized());
        assert!(e403.is_unauthorized());
        assert!(!e500.is_unauthorized());
        assert!(!ApiError::Validation("x".into()).is_unauthorized());
    }
}
