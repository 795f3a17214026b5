use super::{CaughtError, ErrorPresenter, ExceptionFilter};
use axum::{body::Body, http::Request, response::Response};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer rendering errors through an [`ExceptionFilter`].
///
/// Responses tagged with [`CaughtError`] and errors returned by the inner
/// service are both replaced by the filter's response. The filter sees the
/// request headers, so it can negotiate the output format.
#[derive(Clone)]
pub struct ErrorHandlerLayer {
    filter: Arc<dyn ExceptionFilter>,
}

impl ErrorHandlerLayer {
    pub fn new(presenter: ErrorPresenter) -> Self {
        Self::with_filter(Arc::new(presenter))
    }

    pub fn with_filter(filter: Arc<dyn ExceptionFilter>) -> Self {
        Self { filter }
    }
}

impl<S> Layer<S> for ErrorHandlerLayer {
    type Service = ErrorHandlerMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorHandlerMiddleware {
            inner,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ErrorHandlerMiddleware<S> {
    inner: S,
    filter: Arc<dyn ExceptionFilter>,
}

impl<S> Service<Request<Body>> for ErrorHandlerMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness errors surface again from `call`.
        match self.inner.poll_ready(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(_) => Poll::Ready(Ok(())),
        }
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let filter = self.filter.clone();
        let headers = request.headers().clone();

        // The clone may not be ready; swap so the ready one handles this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match inner.call(request).await {
                Ok(response) => match response.extensions().get::<CaughtError>().cloned() {
                    Some(CaughtError(error)) => Ok(filter.catch(&*error, &headers)),
                    None => Ok(response),
                },
                Err(error) => {
                    let error: Box<dyn std::error::Error + Send + Sync> = error.into();
                    Ok(filter.catch(&*error, &headers))
                }
            }
        })
    }
}
