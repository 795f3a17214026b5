//! Call stack capture and simplification.
//!
//! Frames are pushed by instrumented code (see [`stack`] and the `#[traced]`
//! attribute), captured when a runtime signal is raised, and reduced by
//! [`TraceFilter`] before they are shown to anyone.

pub mod filter;
pub mod frame;
pub mod simplify;
pub mod stack;
pub mod value;

pub use filter::{DEFAULT_MAX_TRACE_SIZE, TraceFilter};
pub use frame::{SimplifiedStackFrame, StackFrame};
pub use simplify::{simplify_argument, simplify_arguments};
pub use value::{ArgKey, ArgValue, Arguments, TraceArg, short_type_name};
