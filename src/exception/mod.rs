//! Presentation of caught errors.
//!
//! Handlers return errors as responses tagged with a [`CaughtError`]
//! extension. [`ErrorHandlerLayer`] finds the tag and asks its
//! [`ExceptionFilter`] (by default the [`ErrorPresenter`]) to render the
//! final response for the request.

mod layer;
mod payload;
mod presenter;

pub use layer::{ErrorHandlerLayer, ErrorHandlerMiddleware};
pub use payload::ErrorPayload;
pub use presenter::ErrorPresenter;

use crate::runtime::StructuredError;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::error::Error;
use std::sync::Arc;

/// The ExceptionFilter trait
///
/// Filters turn errors raised during request processing into responses.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an error and return a response for a request with `headers`
    fn catch(&self, error: &(dyn Error + 'static), headers: &HeaderMap) -> Response;
}

/// Response extension carrying the error a handler failed with.
#[derive(Clone)]
pub struct CaughtError(pub Arc<dyn Error + Send + Sync>);

impl CaughtError {
    /// Plain 500 response tagged with `error`. Rendered properly once it
    /// passes through an [`ErrorHandlerLayer`].
    pub fn response<E>(error: E) -> Response
    where
        E: Error + Send + Sync + 'static,
    {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(CaughtError(Arc::new(error)));
        response
    }
}

impl IntoResponse for StructuredError {
    fn into_response(self) -> Response {
        CaughtError::response(self)
    }
}
