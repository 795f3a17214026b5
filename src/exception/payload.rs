use crate::trace::SimplifiedStackFrame;
use serde::Serialize;

/// Body of a JSON error response.
///
/// Outside debug mode only `error` and `code` are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<SimplifiedStackFrame>>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            message: None,
            file: None,
            line: None,
            traces: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_shape() {
        let payload = ErrorPayload::new("Internal Server Error", 500);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "error": "Internal Server Error", "code": 500 })
        );
    }
}
