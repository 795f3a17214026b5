use proc_macro::TokenStream;

mod trace_arg;
mod traced;

/// Records a call frame, with the function's arguments, for as long as the
/// function runs.
///
/// Every argument bound to a plain identifier must implement
/// `faultline::trace::TraceArg`. `self` receivers are not recorded.
///
/// # Example
/// ```ignore
/// use faultline::traced;
///
/// #[traced]
/// fn import_rows(path: &str, limit: usize) -> Result<(), StructuredError> {
///     // frames captured in here include `import_rows('rows.csv', 100)`
/// }
///
/// impl Importer {
///     #[traced(class = "Importer", name = "run")]
///     fn run(&self, dry_run: bool) { /* ... */ }
/// }
/// ```
#[proc_macro_attribute]
pub fn traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    traced::traced_attribute(attr, item)
}

/// Derive macro capturing a type as an object argument: it renders as its
/// type name, never its contents.
///
/// # Example
/// ```ignore
/// use faultline::TraceArg;
///
/// #[derive(TraceArg)]
/// pub struct Credentials {
///     password: String,
/// }
/// ```
#[proc_macro_derive(TraceArg)]
pub fn derive_trace_arg(input: TokenStream) -> TokenStream {
    trace_arg::derive_trace_arg(input)
}
