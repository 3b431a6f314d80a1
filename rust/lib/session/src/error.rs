use yatri_client::{ApiError, Role};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("storage: {0}")]
    Storage(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("config write: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("access denied: {required} session required")]
    Denied { required: Role, actual: Option<Role> },
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Credentials(e.to_string())
    }
}
