use crate::error::{FaultlineError, Result};
use crate::trace::DEFAULT_MAX_TRACE_SIZE;
use dashmap::DashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const CONVERT_ERRORS_KEY: &str = "FAULTLINE_CONVERT_ERRORS";
pub const MAX_TRACE_SIZE_KEY: &str = "FAULTLINE_MAX_TRACE_SIZE";
pub const DEBUG_KEY: &str = "FAULTLINE_DEBUG";
pub const RAISE_IN_DISPLAY_KEY: &str = "FAULTLINE_RAISE_IN_DISPLAY";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Creates a service seeded from the process environment.
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Reads a boolean, accepting `1/0`, `true/false`, `yes/no`, `on/off`.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(FaultlineError::invalid_config(key, raw, "expected a boolean")),
            })
            .transpose()
    }

    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| FaultlineError::invalid_config(key, raw.clone(), e.to_string()))
            })
            .transpose()
    }
}

/// Predicate deciding whether errors render as JSON.
pub type RenderAsJsonPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Error handling options, fixed at composition time.
#[derive(Clone)]
pub struct ErrorHandlerConfig {
    /// Promote runtime error signals to [`StructuredError`](crate::runtime::StructuredError)s.
    pub convert_error_to_exception: bool,
    /// Frames shown in debug output.
    pub max_trace_size: usize,
    /// Include message, location and trace in rendered errors.
    pub debug: bool,
    /// Whether an error may be raised from inside `Display::fmt`. When false
    /// such errors go to the active exception handler instead.
    pub raise_in_display_supported: bool,
    /// Overrides `Accept` based content negotiation when set.
    pub should_render_as_json: Option<RenderAsJsonPredicate>,
}

impl Default for ErrorHandlerConfig {
    fn default() -> Self {
        Self {
            convert_error_to_exception: true,
            max_trace_size: DEFAULT_MAX_TRACE_SIZE,
            debug: false,
            raise_in_display_supported: false,
            should_render_as_json: None,
        }
    }
}

impl fmt::Debug for ErrorHandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlerConfig")
            .field("convert_error_to_exception", &self.convert_error_to_exception)
            .field("max_trace_size", &self.max_trace_size)
            .field("debug", &self.debug)
            .field("raise_in_display_supported", &self.raise_in_display_supported)
            .field(
                "should_render_as_json",
                &self.should_render_as_json.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

impl ErrorHandlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `FAULTLINE_*` keys, keeping defaults for missing ones.
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            convert_error_to_exception: config
                .get_bool(CONVERT_ERRORS_KEY)?
                .unwrap_or(defaults.convert_error_to_exception),
            max_trace_size: config
                .get_parsed(MAX_TRACE_SIZE_KEY)?
                .unwrap_or(defaults.max_trace_size),
            debug: config.get_bool(DEBUG_KEY)?.unwrap_or(defaults.debug),
            raise_in_display_supported: config
                .get_bool(RAISE_IN_DISPLAY_KEY)?
                .unwrap_or(defaults.raise_in_display_supported),
            should_render_as_json: None,
        })
    }

    pub fn convert_error_to_exception(mut self, enabled: bool) -> Self {
        self.convert_error_to_exception = enabled;
        self
    }

    pub fn max_trace_size(mut self, size: usize) -> Self {
        self.max_trace_size = size;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn raise_in_display_supported(mut self, supported: bool) -> Self {
        self.raise_in_display_supported = supported;
        self
    }

    pub fn should_render_as_json<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.should_render_as_json = Some(Arc::new(predicate));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ErrorHandlerConfig::default();
        assert!(config.convert_error_to_exception);
        assert_eq!(config.max_trace_size, 10);
        assert!(!config.debug);
        assert!(!config.raise_in_display_supported);
        assert!(config.should_render_as_json.is_none());
    }

    #[test]
    fn test_from_config() {
        let service = ConfigService::default();
        service.set(CONVERT_ERRORS_KEY, "off");
        service.set(MAX_TRACE_SIZE_KEY, " 3 ");
        service.set(DEBUG_KEY, "TRUE");

        let config = ErrorHandlerConfig::from_config(&service).unwrap();
        assert!(!config.convert_error_to_exception);
        assert_eq!(config.max_trace_size, 3);
        assert!(config.debug);
        assert!(!config.raise_in_display_supported);
    }

    #[test]
    fn test_invalid_values() {
        let service = ConfigService::default();
        service.set(MAX_TRACE_SIZE_KEY, "ten");
        assert!(matches!(
            ErrorHandlerConfig::from_config(&service),
            Err(FaultlineError::InvalidConfig { .. })
        ));

        let service = ConfigService::default();
        service.set(DEBUG_KEY, "maybe");
        assert!(ErrorHandlerConfig::from_config(&service).is_err());
    }
}
