use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaultlineError>;

#[derive(Debug, Error)]
pub enum FaultlineError {
    #[error("Invalid configuration value for {key}: {value:?} ({reason})")]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },

    #[error("No {kind} handler installed to restore")]
    NothingToRestore { kind: &'static str },
}

impl FaultlineError {
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl axum::response::IntoResponse for FaultlineError {
    fn into_response(self) -> axum::response::Response {
        crate::exception::CaughtError::response(self)
    }
}
