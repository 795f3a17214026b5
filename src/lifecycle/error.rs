//! Lifecycle-specific error types

use thiserror::Error;

/// Errors that can occur during lifecycle operations
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Component initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Shutdown operation failed
    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    /// Hook execution failed
    #[error("Hook execution failed for {component}: {message}")]
    HookFailed {
        /// Name of the component that failed
        component: String,
        /// Error message
        message: String,
    },
}

impl LifecycleError {
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn shutdown_failed(msg: impl Into<String>) -> Self {
        Self::ShutdownFailed(msg.into())
    }

    pub fn hook_failed(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HookFailed {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
