use crate::severity;
use crate::trace::StackFrame;
use thiserror::Error;

/// A runtime error signal such as a warning or notice, as raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeErrorSignal {
    pub severity: i32,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl RuntimeErrorSignal {
    pub fn new(
        severity: impl Into<i32>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            severity: severity.into(),
            message: message.into(),
            file: file.into(),
            line,
        }
    }
}

/// A runtime error signal promoted to a catchable error.
///
/// The trace is the call chain at the point the signal was raised,
/// innermost frame first.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StructuredError {
    message: String,
    severity: i32,
    file: String,
    line: u32,
    trace: Vec<StackFrame>,
}

impl StructuredError {
    pub fn new(
        message: impl Into<String>,
        severity: i32,
        file: impl Into<String>,
        line: u32,
        trace: Vec<StackFrame>,
    ) -> Self {
        Self {
            message: message.into(),
            severity,
            file: file.into(),
            line,
            trace,
        }
    }

    pub fn from_signal(signal: &RuntimeErrorSignal, trace: Vec<StackFrame>) -> Self {
        Self::new(
            signal.message.clone(),
            signal.severity,
            signal.file.clone(),
            signal.line,
            trace,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> i32 {
        self.severity
    }

    /// Error code, equal to the severity.
    pub fn code(&self) -> i32 {
        self.severity
    }

    pub fn severity_name(&self) -> &'static str {
        severity::name_of(self.severity)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn trace(&self) -> &[StackFrame] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;

    #[test]
    fn test_from_signal() {
        let signal = RuntimeErrorSignal::new(Severity::Notice, "Undefined index: id", "src/a.rs", 7);
        let error = StructuredError::from_signal(&signal, vec![StackFrame::new("lookup")]);

        assert_eq!(error.to_string(), "Undefined index: id");
        assert_eq!(error.code(), 8);
        assert_eq!(error.severity_name(), "Notice");
        assert_eq!(error.file(), "src/a.rs");
        assert_eq!(error.line(), 7);
        assert_eq!(error.trace()[0].function, "lookup");
    }
}
