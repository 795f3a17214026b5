use super::frame::{SimplifiedStackFrame, StackFrame};
use super::simplify::simplify_arguments;

/// Default number of frames kept by [`TraceFilter`].
pub const DEFAULT_MAX_TRACE_SIZE: usize = 10;

/// Creates a bounded, simplified representation of a stack trace.
///
/// # Example
///
/// ```
/// use faultline::trace::{StackFrame, TraceFilter};
///
/// let trace = vec![StackFrame::new("load"), StackFrame::new("main")];
/// let simplified = TraceFilter::new(1).filter(&trace);
/// assert_eq!(simplified.len(), 1);
/// assert_eq!(simplified[0].function, "load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFilter {
    /// Maximum number of frames in the output.
    pub max_trace_size: usize,
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACE_SIZE)
    }
}

impl TraceFilter {
    pub fn new(max_trace_size: usize) -> Self {
        Self { max_trace_size }
    }

    /// Keeps the first `max_trace_size` frames and renders their arguments.
    /// Frames beyond the limit are dropped silently.
    pub fn filter(&self, trace: &[StackFrame]) -> Vec<SimplifiedStackFrame> {
        trace
            .iter()
            .take(self.max_trace_size)
            .map(Self::simplify_entry)
            .collect()
    }

    /// Simplifies one frame. Frames without arguments keep `args` absent.
    pub fn simplify_entry(frame: &StackFrame) -> SimplifiedStackFrame {
        SimplifiedStackFrame {
            function: frame.function.clone(),
            class: frame.class.clone(),
            file: frame.file.clone(),
            line: frame.line,
            args: frame.args.as_deref().map(simplify_arguments),
        }
    }
}
