//! # Faultline
//!
//! Runtime error handling for axum services.
//!
//! Faultline promotes runtime error signals (warnings, notices, recoverable
//! faults) into catchable [`StructuredError`]s carrying the call stack of the
//! point they were raised at, and renders caught errors for operators and API
//! clients with a bounded, safely serializable trace.
//!
//! ## Features
//!
//! - **Error interception**: [`ErrorInterceptor`] converts, suppresses or
//!   delegates every signal raised through a [`Runtime`]
//! - **Scoped registration**: handlers are installed and restored explicitly,
//!   with guards or through lifecycle hooks
//! - **Trace simplification**: [`TraceFilter`] caps frame count, argument
//!   count and string length, and shows objects by type name only
//! - **Content negotiation**: [`ErrorPresenter`] answers in JSON or HTML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faultline::prelude::*;
//!
//! #[traced]
//! fn parse_port(raw: &str, runtime: &Runtime) -> Result<u16, StructuredError> {
//!     match raw.parse() {
//!         Ok(port) => Ok(port),
//!         Err(_) => {
//!             runtime.trigger_error(format!("Invalid port {:?}", raw), Severity::UserWarning)?;
//!             Ok(80)
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Arc::new(ErrorHandlerConfig::default().debug(true));
//!     let runtime = Arc::new(Runtime::new());
//!     runtime.set_error_handler(ErrorInterceptor::new(config.clone()), runtime.error_reporting());
//!
//!     let app: Router = Router::new()
//!         .route("/port/{raw}", axum::routing::get({
//!             let runtime = runtime.clone();
//!             move |Path(raw): Path<String>| async move {
//!                 parse_port(&raw, &runtime).map(|port| port.to_string())
//!             }
//!         }))
//!         .layer(ErrorHandlerLayer::new(ErrorPresenter::new(config)));
//!
//!     // Serve your app...
//! }
//! ```

// Lets `#[traced]` and `#[derive(TraceArg)]` expand inside this crate.
extern crate self as faultline;

pub mod config;
pub mod error;
pub mod exception;
pub mod handler;
pub mod lifecycle;
pub mod runtime;
pub mod severity;
pub mod trace;

// Re-export core types
pub use config::{ConfigService, ErrorHandlerConfig};
pub use error::{FaultlineError, Result};
pub use exception::{ErrorHandlerLayer, ErrorPresenter, ExceptionFilter};
pub use handler::{ErrorHandlerComponent, ErrorInterceptor, FallbackHandler};
pub use runtime::{Runtime, RuntimeErrorSignal, StructuredError};
pub use severity::Severity;
pub use trace::{ArgValue, StackFrame, TraceArg, TraceFilter};

// Re-export macros
pub use faultline_macro::{TraceArg, traced};

pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use faultline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, ErrorHandlerConfig};
    pub use crate::error::FaultlineError;
    pub use crate::exception::{ErrorHandlerLayer, ErrorPayload, ErrorPresenter, ExceptionFilter};
    pub use crate::handler::{ErrorHandlerComponent, ErrorInterceptor, FallbackHandler};
    pub use crate::lifecycle::{LifecycleError, LifecycleManager, OnModuleDestroy, OnModuleInit};
    pub use crate::runtime::{
        ErrorHandler, ExceptionHandler, Runtime, RuntimeErrorSignal, StructuredError,
    };
    pub use crate::severity::Severity;
    pub use crate::trace::{ArgKey, ArgValue, SimplifiedStackFrame, StackFrame, TraceFilter};
    pub use crate::{TraceArg, traced};
    pub use axum::{
        Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
