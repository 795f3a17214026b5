use faultline::config::ErrorHandlerConfig;
use faultline::severity::{self, Severity};
use faultline::trace::{ArgKey, ArgValue, StackFrame, TraceFilter, stack};
use faultline::{Runtime, StructuredError, TraceArg, traced};
use faultline_testing::{ErrorHandlerHarness, RecordedError};
use std::fmt;

#[test]
fn test_convert_error_to_exception() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    let result = harness.with_error_handler(|runtime| {
        runtime.trigger_error("Test message", Severity::UserWarning)
    });

    let error = result.unwrap_err();
    assert_eq!(error.message(), "Test message");
    assert_eq!(error.code(), Severity::UserWarning.code());

    let trace = error.trace();
    assert_eq!(trace[0].function, "trigger_error");
    assert!(!trace[0].args.as_ref().unwrap().is_empty());
    assert!(harness.exceptions().is_empty());
}

#[test]
fn test_every_reported_severity_converts() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    for severity in [
        Severity::UserError,
        Severity::UserWarning,
        Severity::UserNotice,
        Severity::UserDeprecated,
    ] {
        let error = harness
            .with_error_handler(|runtime| runtime.trigger_error("converted", severity))
            .unwrap_err();
        assert_eq!(error.severity(), severity.code());
        assert_eq!(error.severity_name(), severity.to_string());
    }
}

#[test]
fn test_masked_severities_are_suppressed() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    let result = harness.with_error_handler(|runtime| {
        runtime.set_error_reporting(severity::ALL & !Severity::UserDeprecated.code());
        runtime.trigger_error("old api", Severity::UserDeprecated)
    });

    assert!(result.is_ok());
    assert!(harness.fallback_calls().is_empty());
    assert!(harness.exceptions().is_empty());
}

#[test]
fn test_disabled_conversion_uses_fallback() {
    let harness =
        ErrorHandlerHarness::new(ErrorHandlerConfig::default().convert_error_to_exception(false));

    let line = line!() + 2;
    let result =
        harness.with_error_handler(|runtime| runtime.trigger_error("legacy", Severity::UserError));

    assert!(result.is_ok());
    assert_eq!(
        harness.fallback_calls(),
        vec![RecordedError {
            code: Severity::UserError.code(),
            message: "legacy".to_string(),
            file: file!().to_string(),
            line,
        }]
    );
}

#[test]
fn test_handlers_are_restored_after_failure() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    let _ = harness.with_error_handler(|runtime| runtime.trigger_error("first", Severity::Warning));

    assert_eq!(harness.runtime().error_handler_depth(), 0);
    assert_eq!(harness.runtime().exception_handler_depth(), 0);
    assert!(harness
        .runtime()
        .trigger_error("after", Severity::Warning)
        .is_ok());
}

#[derive(TraceArg)]
struct Credentials {
    password: String,
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "password={}", self.password)
    }
}

#[traced]
fn authenticate(
    runtime: &Runtime,
    user: &str,
    credentials: &Credentials,
    attempts: u32,
) -> Result<(), StructuredError> {
    if attempts > 3 {
        runtime.trigger_error(format!("Too many attempts for {}", user), Severity::UserNotice)?;
    }
    Ok(())
}

#[test]
fn test_traced_arguments_are_captured_and_bounded() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());
    let credentials = Credentials {
        password: "hunter2".to_string(),
    };
    assert_eq!(credentials.to_string(), "password=hunter2");

    let error = harness
        .with_error_handler(|runtime| authenticate(runtime, "alice", &credentials, 5))
        .unwrap_err();

    let trace = error.trace();
    assert_eq!(trace[0].function, "trigger_error");
    assert_eq!(trace[1].function, "authenticate");
    assert_eq!(
        trace[1].args.as_ref().unwrap()[2].1,
        ArgValue::object("Credentials")
    );

    let simplified = TraceFilter::default().filter(trace);
    let args = simplified[1].args.as_deref().unwrap();
    assert_eq!(args, "Runtime, 'alice', Credentials, 5");
    assert!(!args.contains("hunter2"));
}

struct Invoice<'a> {
    runtime: &'a Runtime,
    total: Option<u32>,
}

impl fmt::Display for Invoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let _frame = stack::enter_display::<Self>();
        if self.total.is_none() {
            self.runtime
                .trigger_error("Undefined total", Severity::Warning)
                .map_err(|_| fmt::Error)?;
        }
        write!(f, "invoice: {}", self.total.unwrap_or_default())
    }
}

#[test]
fn test_error_inside_display_reaches_exception_handler() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    let rendered = harness.with_error_handler(|runtime| {
        Invoice {
            runtime,
            total: None,
        }
        .to_string()
    });

    assert_eq!(rendered, "invoice: 0");
    let exceptions = harness.exceptions();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].message(), "Undefined total");
    assert!(exceptions[0].trace().iter().any(StackFrame::is_string_conversion));
}

#[test]
fn test_error_inside_display_raises_when_supported() {
    let harness =
        ErrorHandlerHarness::new(ErrorHandlerConfig::default().raise_in_display_supported(true));

    let result = harness.with_error_handler(|runtime| {
        let _frame = stack::enter_display::<Invoice>();
        runtime.trigger_error("Undefined total", Severity::Warning)
    });

    assert!(result.is_err());
    assert!(harness.exceptions().is_empty());
}

#[traced]
fn export(runtime: &Runtime, (width, height): (u32, u32), format: &str) -> Result<(), StructuredError> {
    if width * height == 0 {
        runtime.trigger_error(format!("Empty {} export", format), Severity::UserWarning)?;
    }
    Ok(())
}

#[test]
fn test_destructured_parameters_keep_argument_positions() {
    let harness = ErrorHandlerHarness::new(ErrorHandlerConfig::default());

    let error = harness
        .with_error_handler(|runtime| export(runtime, (0, 10), "png"))
        .unwrap_err();

    let args = error.trace()[1].args.as_ref().unwrap();
    assert_eq!(
        args.iter().map(|(key, _)| key.clone()).collect::<Vec<_>>(),
        vec![ArgKey::Index(0), ArgKey::Index(2)]
    );
    assert_eq!(args[1].1, ArgValue::Str("png".to_string()));
}
