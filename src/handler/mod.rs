//! Promotion of runtime error signals to structured errors.
//!
//! [`ErrorInterceptor`] is installed as the runtime's error handler. For
//! every signal routed to it, it does one of four things:
//!
//! | case | result |
//! |------|--------|
//! | conversion disabled | forwarded to the [`FallbackHandler`] |
//! | severity not reported | suppressed |
//! | raised inside `Display::fmt`, unsupported | sent to the runtime's exception handler |
//! | otherwise | returned as `Err(StructuredError)` |
//!
//! # Example
//!
//! ```
//! use faultline::config::ErrorHandlerConfig;
//! use faultline::handler::ErrorInterceptor;
//! use faultline::runtime::Runtime;
//! use faultline::severity::{self, Severity};
//! use std::sync::Arc;
//!
//! let runtime = Runtime::new();
//! let interceptor = ErrorInterceptor::new(Arc::new(ErrorHandlerConfig::default()));
//! let _guard = runtime.install_error_handler(interceptor, severity::ALL);
//!
//! let error = runtime.trigger_error("disk almost full", Severity::UserWarning).unwrap_err();
//! assert_eq!(error.message(), "disk almost full");
//! assert_eq!(error.trace()[0].function, "trigger_error");
//! ```

mod component;

pub use component::ErrorHandlerComponent;

use crate::config::ErrorHandlerConfig;
use crate::runtime::{ErrorHandler, Runtime, RuntimeErrorSignal, StructuredError};
use crate::severity;
use crate::trace::{ArgKey, ArgValue, StackFrame, stack};
use std::sync::Arc;

/// Legacy handling for signals that are not converted.
pub trait FallbackHandler: Send + Sync + 'static {
    fn handle_error(&self, code: i32, message: &str, file: &str, line: u32);
}

/// Logs unconverted signals through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFallbackHandler;

impl FallbackHandler for TracingFallbackHandler {
    fn handle_error(&self, code: i32, message: &str, file: &str, line: u32) {
        tracing::warn!(
            "{} ({}): {} in {}:{}",
            severity::name_of(code),
            code,
            message,
            file,
            line
        );
    }
}

/// Runtime error handler converting signals to [`StructuredError`]s.
#[derive(Clone)]
pub struct ErrorInterceptor {
    config: Arc<ErrorHandlerConfig>,
    fallback: Arc<dyn FallbackHandler>,
}

impl ErrorInterceptor {
    pub fn new(config: Arc<ErrorHandlerConfig>) -> Self {
        Self::with_fallback(config, Arc::new(TracingFallbackHandler))
    }

    pub fn with_fallback(config: Arc<ErrorHandlerConfig>, fallback: Arc<dyn FallbackHandler>) -> Self {
        Self { config, fallback }
    }

    pub fn config(&self) -> &ErrorHandlerConfig {
        &self.config
    }

    fn own_frame(signal: &RuntimeErrorSignal) -> StackFrame {
        StackFrame::new("handle")
            .with_class("ErrorInterceptor")
            .with_args(vec![
                (ArgKey::Index(0), ArgValue::Int(i64::from(signal.severity))),
                (ArgKey::Index(1), ArgValue::Str(signal.message.clone())),
                (ArgKey::Index(2), ArgValue::Str(signal.file.clone())),
                (ArgKey::Index(3), ArgValue::Int(i64::from(signal.line))),
            ])
    }

    /// Call stack at the signal, without this interceptor's frame.
    fn capture_trace(signal: &RuntimeErrorSignal) -> Vec<StackFrame> {
        let mut trace = stack::capture();
        if !trace.is_empty() {
            trace.remove(0);
        }
        if trace.is_empty() {
            // Raised from uninstrumented code: the signal site is the only caller.
            trace.push(StackFrame::new("raise").with_location(signal.file.clone(), signal.line));
        }
        trace
    }
}

impl ErrorHandler for ErrorInterceptor {
    fn handle(
        &self,
        runtime: &Runtime,
        signal: &RuntimeErrorSignal,
    ) -> Result<bool, StructuredError> {
        let _frame = stack::push(Self::own_frame(signal));

        if !self.config.convert_error_to_exception {
            self.fallback
                .handle_error(signal.severity, &signal.message, &signal.file, signal.line);
            return Ok(false);
        }

        if !runtime.is_reported(signal.severity) {
            tracing::trace!("Suppressed {}: {}", severity::name_of(signal.severity), signal.message);
            return Ok(false);
        }

        let error = StructuredError::from_signal(signal, Self::capture_trace(signal));

        if !self.config.raise_in_display_supported
            && error.trace().iter().any(StackFrame::is_string_conversion)
        {
            tracing::debug!(
                "{} raised inside Display::fmt, passing to the exception handler",
                error.severity_name()
            );
            runtime.handle_exception(&error);
            return Ok(false);
        }

        Err(error)
    }
}
