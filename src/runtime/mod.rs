//! The error runtime.
//!
//! A [`Runtime`] owns what a host runtime keeps globally: the reporting mask,
//! the stack of installed error handlers and the stack of installed exception
//! handlers. It is shared explicitly (usually as `Arc<Runtime>`) instead of
//! living in a global, so tests can build their own and install handlers
//! deterministically.
//!
//! # Example
//!
//! ```
//! use faultline::runtime::{Runtime, RuntimeErrorSignal, StructuredError};
//! use faultline::severity::{self, Severity};
//!
//! fn ignore(_: &Runtime, signal: &RuntimeErrorSignal) -> Result<bool, StructuredError> {
//!     assert_eq!(signal.message, "careful");
//!     Ok(false)
//! }
//!
//! let runtime = Runtime::new();
//! let _guard = runtime.install_error_handler(ignore, severity::ALL);
//! runtime.trigger_error("careful", Severity::UserNotice).unwrap();
//! ```

mod signal;

pub use signal::{RuntimeErrorSignal, StructuredError};

use crate::error::{FaultlineError, Result};
use crate::severity::{self, Severity};
use crate::trace::{ArgKey, ArgValue, StackFrame, stack};
use parking_lot::RwLock;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// Receives every runtime error signal routed to it.
///
/// `Ok(true)` asks the runtime to continue with its default handling,
/// `Ok(false)` means the signal is fully handled. `Err` raises the
/// structured error to the code that triggered the signal.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(
        &self,
        runtime: &Runtime,
        signal: &RuntimeErrorSignal,
    ) -> std::result::Result<bool, StructuredError>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Runtime, &RuntimeErrorSignal) -> std::result::Result<bool, StructuredError>
        + Send
        + Sync
        + 'static,
{
    fn handle(
        &self,
        runtime: &Runtime,
        signal: &RuntimeErrorSignal,
    ) -> std::result::Result<bool, StructuredError> {
        self(runtime, signal)
    }
}

/// Receives structured errors that could not be raised to their caller.
pub trait ExceptionHandler: Send + Sync + 'static {
    fn handle_exception(&self, error: &StructuredError);
}

impl<F> ExceptionHandler for F
where
    F: Fn(&StructuredError) + Send + Sync + 'static,
{
    fn handle_exception(&self, error: &StructuredError) {
        self(error)
    }
}

#[derive(Clone)]
struct InstalledErrorHandler {
    handler: Arc<dyn ErrorHandler>,
    levels: i32,
}

/// Process-wide error state.
pub struct Runtime {
    error_reporting: AtomicI32,
    error_handlers: RwLock<Vec<InstalledErrorHandler>>,
    exception_handlers: RwLock<Vec<Arc<dyn ExceptionHandler>>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a runtime reporting every severity, with no handlers installed.
    pub fn new() -> Self {
        Self {
            error_reporting: AtomicI32::new(severity::ALL),
            error_handlers: RwLock::new(Vec::new()),
            exception_handlers: RwLock::new(Vec::new()),
        }
    }

    /// Current reporting mask.
    pub fn error_reporting(&self) -> i32 {
        self.error_reporting.load(Ordering::Acquire)
    }

    /// Replaces the reporting mask, returning the previous one.
    pub fn set_error_reporting(&self, mask: i32) -> i32 {
        self.error_reporting.swap(mask, Ordering::AcqRel)
    }

    /// Whether signals of `severity` are currently reported.
    pub fn is_reported(&self, severity: i32) -> bool {
        self.error_reporting() & severity != 0
    }

    /// Installs `handler` for signals whose severity is in `levels`,
    /// returning the handler it shadows.
    pub fn set_error_handler<H: ErrorHandler>(
        &self,
        handler: H,
        levels: i32,
    ) -> Option<Arc<dyn ErrorHandler>> {
        self.set_shared_error_handler(Arc::new(handler), levels)
    }

    pub fn set_shared_error_handler(
        &self,
        handler: Arc<dyn ErrorHandler>,
        levels: i32,
    ) -> Option<Arc<dyn ErrorHandler>> {
        self.push_error_handler(handler, levels).0
    }

    /// Pushes `handler`, returning the shadowed handler and the new depth
    /// read under the same lock.
    fn push_error_handler(
        &self,
        handler: Arc<dyn ErrorHandler>,
        levels: i32,
    ) -> (Option<Arc<dyn ErrorHandler>>, usize) {
        let mut handlers = self.error_handlers.write();
        let previous = handlers.last().map(|installed| installed.handler.clone());
        handlers.push(InstalledErrorHandler { handler, levels });
        tracing::debug!("Error handler installed (depth {})", handlers.len());
        (previous, handlers.len())
    }

    /// Removes the most recently installed error handler.
    pub fn restore_error_handler(&self) -> Result<()> {
        let mut handlers = self.error_handlers.write();
        handlers
            .pop()
            .map(|_| tracing::debug!("Error handler restored (depth {})", handlers.len()))
            .ok_or(FaultlineError::NothingToRestore { kind: "error" })
    }

    /// Removes the error handler installed at `depth`, together with every
    /// handler installed after it.
    pub fn restore_error_handler_at(&self, depth: usize) -> Result<()> {
        let mut handlers = self.error_handlers.write();
        if depth == 0 || handlers.len() < depth {
            return Err(FaultlineError::NothingToRestore { kind: "error" });
        }
        handlers.truncate(depth - 1);
        tracing::debug!("Error handler restored (depth {})", handlers.len());
        Ok(())
    }

    /// Installs `handler` and returns the depth it was installed at, for
    /// [`restore_error_handler_at`](Self::restore_error_handler_at).
    pub fn install_error_handler_at<H: ErrorHandler>(&self, handler: H, levels: i32) -> usize {
        self.push_error_handler(Arc::new(handler), levels).1
    }

    /// Installs `handler` until the returned guard drops.
    pub fn install_error_handler<H: ErrorHandler>(
        &self,
        handler: H,
        levels: i32,
    ) -> ErrorHandlerGuard<'_> {
        ErrorHandlerGuard {
            runtime: self,
            depth: self.install_error_handler_at(handler, levels),
        }
    }

    pub fn error_handler_depth(&self) -> usize {
        self.error_handlers.read().len()
    }

    /// Installs `handler` as the active exception handler, returning the one
    /// it shadows.
    pub fn set_exception_handler<H: ExceptionHandler>(
        &self,
        handler: H,
    ) -> Option<Arc<dyn ExceptionHandler>> {
        self.set_shared_exception_handler(Arc::new(handler))
    }

    pub fn set_shared_exception_handler(
        &self,
        handler: Arc<dyn ExceptionHandler>,
    ) -> Option<Arc<dyn ExceptionHandler>> {
        self.push_exception_handler(handler).0
    }

    fn push_exception_handler(
        &self,
        handler: Arc<dyn ExceptionHandler>,
    ) -> (Option<Arc<dyn ExceptionHandler>>, usize) {
        let mut handlers = self.exception_handlers.write();
        let previous = handlers.last().cloned();
        handlers.push(handler);
        (previous, handlers.len())
    }

    /// Removes the most recently installed exception handler.
    pub fn restore_exception_handler(&self) -> Result<()> {
        self.exception_handlers
            .write()
            .pop()
            .map(|_| ())
            .ok_or(FaultlineError::NothingToRestore { kind: "exception" })
    }

    /// Removes the exception handler installed at `depth`, together with
    /// every handler installed after it.
    pub fn restore_exception_handler_at(&self, depth: usize) -> Result<()> {
        let mut handlers = self.exception_handlers.write();
        if depth == 0 || handlers.len() < depth {
            return Err(FaultlineError::NothingToRestore { kind: "exception" });
        }
        handlers.truncate(depth - 1);
        Ok(())
    }

    /// Installs `handler` and returns the depth it was installed at.
    pub fn install_shared_exception_handler_at(&self, handler: Arc<dyn ExceptionHandler>) -> usize {
        self.push_exception_handler(handler).1
    }

    /// Installs `handler` until the returned guard drops.
    pub fn install_exception_handler<H: ExceptionHandler>(
        &self,
        handler: H,
    ) -> ExceptionHandlerGuard<'_> {
        self.install_shared_exception_handler(Arc::new(handler))
    }

    pub fn install_shared_exception_handler(
        &self,
        handler: Arc<dyn ExceptionHandler>,
    ) -> ExceptionHandlerGuard<'_> {
        ExceptionHandlerGuard {
            runtime: self,
            depth: self.install_shared_exception_handler_at(handler),
        }
    }

    pub fn exception_handler_depth(&self) -> usize {
        self.exception_handlers.read().len()
    }

    /// Hands `error` to the active exception handler, or logs it when none
    /// is installed.
    pub fn handle_exception(&self, error: &StructuredError) {
        let handler = self.exception_handlers.read().last().cloned();
        match handler {
            Some(handler) => handler.handle_exception(error),
            None => tracing::error!(
                "Unhandled {}: {} in {}:{}",
                error.severity_name(),
                error.message(),
                error.file(),
                error.line()
            ),
        }
    }

    /// Raises a signal of `severity` at the caller's location.
    ///
    /// Records a `trigger_error` frame with the message and severity as its
    /// arguments while the signal is handled.
    #[track_caller]
    pub fn trigger_error(
        &self,
        message: impl Into<String>,
        severity: Severity,
    ) -> std::result::Result<(), StructuredError> {
        let location = Location::caller();
        let message = message.into();
        let _frame = stack::push(
            StackFrame::new("trigger_error")
                .with_location(location.file(), location.line())
                .with_args(vec![
                    (ArgKey::Index(0), ArgValue::Str(message.clone())),
                    (ArgKey::Index(1), ArgValue::Int(i64::from(severity.code()))),
                ]),
        );

        self.raise(RuntimeErrorSignal::new(
            severity,
            message,
            location.file(),
            location.line(),
        ))
    }

    /// Routes `signal` to the active error handler when its severity is in
    /// the handler's levels, otherwise to the default handling.
    pub fn raise(&self, signal: RuntimeErrorSignal) -> std::result::Result<(), StructuredError> {
        // Cloned out so the lock is not held while the handler runs.
        let installed = self.error_handlers.read().last().cloned();

        let continue_default = match installed {
            Some(installed) if installed.levels & signal.severity != 0 => {
                installed.handler.handle(self, &signal)?
            }
            _ => true,
        };

        if continue_default {
            self.default_handle(&signal);
        }
        Ok(())
    }

    fn default_handle(&self, signal: &RuntimeErrorSignal) {
        if !self.is_reported(signal.severity) {
            return;
        }

        let name = severity::name_of(signal.severity);
        match Severity::from_code(signal.severity) {
            Some(severity) if severity.is_error() => tracing::error!(
                "{}: {} in {}:{}",
                name,
                signal.message,
                signal.file,
                signal.line
            ),
            Some(severity) if severity.is_deprecation() => tracing::info!(
                "{}: {} in {}:{}",
                name,
                signal.message,
                signal.file,
                signal.line
            ),
            _ => tracing::warn!(
                "{}: {} in {}:{}",
                name,
                signal.message,
                signal.file,
                signal.line
            ),
        }
    }
}

impl crate::trace::TraceArg for Runtime {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::object("Runtime")
    }
}

/// Restores the error handler stack to its previous depth on drop.
#[must_use = "the handler is removed as soon as the guard is dropped"]
pub struct ErrorHandlerGuard<'a> {
    runtime: &'a Runtime,
    depth: usize,
}

impl Drop for ErrorHandlerGuard<'_> {
    fn drop(&mut self) {
        self.runtime.error_handlers.write().truncate(self.depth - 1);
    }
}

/// Restores the exception handler stack to its previous depth on drop.
#[must_use = "the handler is removed as soon as the guard is dropped"]
pub struct ExceptionHandlerGuard<'a> {
    runtime: &'a Runtime,
    depth: usize,
}

impl Drop for ExceptionHandlerGuard<'_> {
    fn drop(&mut self) {
        self.runtime
            .exception_handlers
            .write()
            .truncate(self.depth - 1);
    }
}
