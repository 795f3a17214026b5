//! Test support for the faultline error handler.
//!
//! [`ErrorHandlerHarness`] owns a [`Runtime`] and records what reaches the
//! fallback and exception handlers. [`ErrorHandlerHarness::with_error_handler`]
//! installs the interceptor only for the duration of a closure, so tests
//! never leak handlers into each other.
//!
//! ```
//! use faultline::config::ErrorHandlerConfig;
//! use faultline::severity::Severity;
//! use faultline_testing::ErrorHandlerHarness;
//!
//! let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());
//! let result = harness.with_error_handler(|runtime| {
//!     runtime.trigger_error("Test message", Severity::UserWarning)
//! });
//! assert_eq!(result.unwrap_err().message(), "Test message");
//! assert_eq!(harness.runtime().error_handler_depth(), 0);
//! ```

use faultline::config::ErrorHandlerConfig;
use faultline::handler::{ErrorInterceptor, FallbackHandler};
use faultline::runtime::{ExceptionHandler, Runtime, StructuredError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Arguments of one legacy `handle_error` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub code: i32,
    pub message: String,
    pub file: String,
    pub line: u32,
}

/// Fallback handler that records every call.
#[derive(Debug, Default)]
pub struct RecordingFallback {
    calls: Mutex<Vec<RecordedError>>,
}

impl RecordingFallback {
    pub fn calls(&self) -> Vec<RecordedError> {
        self.calls.lock().clone()
    }
}

impl FallbackHandler for RecordingFallback {
    fn handle_error(&self, code: i32, message: &str, file: &str, line: u32) {
        self.calls.lock().push(RecordedError {
            code,
            message: message.to_string(),
            file: file.to_string(),
            line,
        });
    }
}

/// Exception handler that records every error it receives.
#[derive(Debug, Default)]
pub struct RecordingExceptionHandler {
    errors: Mutex<Vec<StructuredError>>,
}

impl RecordingExceptionHandler {
    pub fn errors(&self) -> Vec<StructuredError> {
        self.errors.lock().clone()
    }
}

impl ExceptionHandler for RecordingExceptionHandler {
    fn handle_exception(&self, error: &StructuredError) {
        self.errors.lock().push(error.clone());
    }
}

/// A runtime plus recording handlers.
pub struct ErrorHandlerHarness {
    runtime: Runtime,
    interceptor: ErrorInterceptor,
    fallback: Arc<RecordingFallback>,
    exceptions: Arc<RecordingExceptionHandler>,
}

impl ErrorHandlerHarness {
    pub fn new(config: ErrorHandlerConfig) -> Self {
        let fallback = Arc::new(RecordingFallback::default());
        let interceptor = ErrorInterceptor::with_fallback(Arc::new(config), fallback.clone());
        Self {
            runtime: Runtime::new(),
            interceptor,
            fallback,
            exceptions: Arc::new(RecordingExceptionHandler::default()),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Runs `f` with the interceptor installed for the severities currently
    /// reported and the recording exception handler active. Both are
    /// restored when `f` returns or unwinds.
    pub fn with_error_handler<T>(&self, f: impl FnOnce(&Runtime) -> T) -> T {
        let levels = self.runtime.error_reporting();
        let _errors = self
            .runtime
            .install_error_handler(self.interceptor.clone(), levels);

        let _exceptions = self
            .runtime
            .install_shared_exception_handler(self.exceptions.clone());

        f(&self.runtime)
    }

    pub fn fallback_calls(&self) -> Vec<RecordedError> {
        self.fallback.calls()
    }

    pub fn exceptions(&self) -> Vec<StructuredError> {
        self.exceptions.errors()
    }
}
