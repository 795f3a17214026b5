use super::value::Arguments;
use serde::Serialize;

/// Function name recorded for string-conversion (`Display::fmt`) frames.
pub const DISPLAY_FN: &str = "fmt";

/// One captured call frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub function: String,
    /// Type the function was called on, for methods.
    pub class: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub args: Option<Arguments>,
}

impl StackFrame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            class: None,
            file: None,
            line: None,
            args: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_args(mut self, args: Arguments) -> Self {
        self.args = Some(args);
        self
    }

    /// Whether this frame is a textual conversion of a value.
    pub fn is_string_conversion(&self) -> bool {
        self.function == DISPLAY_FN
    }
}

/// A [`StackFrame`] with its arguments rendered to a single summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedStackFrame {
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}
