use super::{ErrorPayload, ExceptionFilter};
use crate::config::ErrorHandlerConfig;
use crate::runtime::StructuredError;
use crate::trace::TraceFilter;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Renders caught errors as JSON or as an HTML page.
///
/// The trace is only rendered as JSON in debug mode, bounded by
/// [`TraceFilter`].
#[derive(Clone)]
pub struct ErrorPresenter {
    config: Arc<ErrorHandlerConfig>,
    trace_filter: TraceFilter,
}

impl ErrorPresenter {
    pub fn new(config: Arc<ErrorHandlerConfig>) -> Self {
        let trace_filter = TraceFilter::new(config.max_trace_size);
        Self {
            config,
            trace_filter,
        }
    }

    pub fn config(&self) -> &ErrorHandlerConfig {
        &self.config
    }

    /// The configured predicate when set. Otherwise whether the `Accept`
    /// header is exactly `application/json`, ignoring case.
    pub fn should_render_as_json(&self, headers: &HeaderMap) -> bool {
        if let Some(predicate) = &self.config.should_render_as_json {
            return predicate();
        }

        headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| accept.eq_ignore_ascii_case("application/json"))
    }

    /// Builds the payload for `error`, with details in debug mode.
    pub fn payload(&self, error: &(dyn Error + 'static), status: StatusCode) -> ErrorPayload {
        let mut payload = ErrorPayload::new(
            status.canonical_reason().unwrap_or("Unknown Error"),
            status.as_u16(),
        );

        if self.config.debug {
            payload.message = Some(error.to_string());
            if let Some(structured) = error.downcast_ref::<StructuredError>() {
                payload.file = Some(structured.file().to_string());
                payload.line = Some(structured.line());
                payload.traces = Some(self.trace_filter.filter(structured.trace()));
            }
        }

        payload
    }

    pub fn render(&self, error: &(dyn Error + 'static), headers: &HeaderMap) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        if let Some(structured) = error.downcast_ref::<StructuredError>() {
            tracing::error!(
                "{}: {} in {}:{}",
                structured.severity_name(),
                structured.message(),
                structured.file(),
                structured.line()
            );
        } else {
            tracing::error!("Request failed: {}", error);
        }

        if self.should_render_as_json(headers) {
            self.render_json(error, status)
        } else {
            self.render_html(error, status)
        }
    }

    fn render_json(&self, error: &(dyn Error + 'static), status: StatusCode) -> Response {
        let payload = self.payload(error, status);
        let body = if self.config.debug {
            serde_json::to_string_pretty(&payload)
        } else {
            serde_json::to_string(&payload)
        };

        match body {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize error payload: {}", e);
                status.into_response()
            }
        }
    }

    fn render_html(&self, error: &(dyn Error + 'static), status: StatusCode) -> Response {
        let title = status.canonical_reason().unwrap_or("Unknown Error");
        let mut page = format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{code} {title}</title></head>\n<body>\n<h1>{title}</h1>\n",
            code = status.as_u16(),
            title = title
        );

        if self.config.debug {
            let _ = writeln!(page, "<p>{}</p>", escape_html(&error.to_string()));
            if let Some(structured) = error.downcast_ref::<StructuredError>() {
                let _ = writeln!(
                    page,
                    "<p>{}:{}</p>",
                    escape_html(structured.file()),
                    structured.line()
                );
                page.push_str("<ol>\n");
                for frame in structured.trace().iter().take(self.config.max_trace_size) {
                    let location = match (&frame.file, frame.line) {
                        (Some(file), Some(line)) => format!(" at {}:{}", file, line),
                        _ => String::new(),
                    };
                    let function = match &frame.class {
                        Some(class) => format!("{}::{}", class, frame.function),
                        None => frame.function.clone(),
                    };
                    let _ = writeln!(
                        page,
                        "<li>{}{}</li>",
                        escape_html(&function),
                        escape_html(&location)
                    );
                }
                page.push_str("</ol>\n");
            }
        }

        page.push_str("</body>\n</html>\n");
        (status, Html(page)).into_response()
    }
}

impl ExceptionFilter for ErrorPresenter {
    fn catch(&self, error: &(dyn Error + 'static), headers: &HeaderMap) -> Response {
        self.render(error, headers)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{ArgKey, ArgValue, StackFrame};
    use axum::body::to_bytes;

    fn headers(accept: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        }
        headers
    }

    fn structured() -> StructuredError {
        let frames = (0..15)
            .map(|i| {
                StackFrame::new(format!("step_{}", i))
                    .with_location("src/jobs.rs", 10 + i)
                    .with_args(vec![(ArgKey::Index(0), ArgValue::Str("x".repeat(80)))])
            })
            .collect();
        StructuredError::new("Division by zero", 2, "src/jobs.rs", 42, frames)
    }

    #[test]
    fn test_json_negotiation() {
        let presenter = ErrorPresenter::new(Arc::new(ErrorHandlerConfig::default()));
        assert!(presenter.should_render_as_json(&headers(Some("application/json"))));
        assert!(presenter.should_render_as_json(&headers(Some("Application/JSON"))));
        assert!(!presenter.should_render_as_json(&headers(Some("text/html"))));
        assert!(!presenter.should_render_as_json(&headers(None)));
    }

    #[test]
    fn test_predicate_overrides_header() {
        let always = ErrorPresenter::new(Arc::new(
            ErrorHandlerConfig::default().should_render_as_json(|| true),
        ));
        assert!(always.should_render_as_json(&headers(Some("text/html"))));
        assert!(always.should_render_as_json(&headers(None)));

        let never = ErrorPresenter::new(Arc::new(
            ErrorHandlerConfig::default().should_render_as_json(|| false),
        ));
        assert!(!never.should_render_as_json(&headers(Some("application/json"))));
    }

    #[test]
    fn test_only_an_exact_json_header_renders_json() {
        let presenter = ErrorPresenter::new(Arc::new(ErrorHandlerConfig::default()));
        for accept in [
            "text/html;q=0.8, application/json",
            "application/json, text/html",
            "application/json; charset=utf-8",
            "*/*",
        ] {
            assert!(!presenter.should_render_as_json(&headers(Some(accept))), "{}", accept);
        }
    }

    #[test]
    fn test_payload_without_debug_is_minimal() {
        let presenter = ErrorPresenter::new(Arc::new(ErrorHandlerConfig::default()));
        let payload = presenter.payload(&structured(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload, ErrorPayload::new("Internal Server Error", 500));
    }

    #[test]
    fn test_payload_with_debug_bounds_trace() {
        let presenter = ErrorPresenter::new(Arc::new(
            ErrorHandlerConfig::default().debug(true).max_trace_size(3),
        ));
        let payload = presenter.payload(&structured(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(payload.message.as_deref(), Some("Division by zero"));
        assert_eq!(payload.file.as_deref(), Some("src/jobs.rs"));
        assert_eq!(payload.line, Some(42));
        let traces = payload.traces.unwrap();
        assert_eq!(traces.len(), 3);
        assert_eq!(
            traces[0].args.as_deref(),
            Some(format!("'{}...'", "x".repeat(64)).as_str())
        );
    }

    #[tokio::test]
    async fn test_json_response() {
        let presenter = ErrorPresenter::new(Arc::new(ErrorHandlerConfig::default()));
        let response = presenter.render(&structured(), &headers(Some("application/json")));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Internal Server Error","code":500}"#);
    }

    #[tokio::test]
    async fn test_html_response_escapes_message() {
        let presenter =
            ErrorPresenter::new(Arc::new(ErrorHandlerConfig::default().debug(true)));
        let error = StructuredError::new("<script>", 2, "src/a.rs", 1, vec![]);
        let response = presenter.render(&error, &headers(Some("text/html")));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
