use super::{ErrorInterceptor, FallbackHandler};
use crate::config::ErrorHandlerConfig;
use crate::lifecycle::{LifecycleError, OnModuleDestroy, OnModuleInit};
use crate::runtime::{ExceptionHandler, Runtime};
use async_trait::async_trait;
use std::sync::Arc;

/// Installs an [`ErrorInterceptor`] into a [`Runtime`] at startup and
/// restores the previous handlers at shutdown.
///
/// The interceptor is registered for the severities reported when the
/// component initializes.
pub struct ErrorHandlerComponent {
    runtime: Arc<Runtime>,
    interceptor: ErrorInterceptor,
    exception_handler: Option<Arc<dyn ExceptionHandler>>,
    /// Handler stack depths recorded at init.
    installed_at: Option<(usize, Option<usize>)>,
}

impl ErrorHandlerComponent {
    pub fn new(runtime: Arc<Runtime>, config: Arc<ErrorHandlerConfig>) -> Self {
        Self {
            runtime,
            interceptor: ErrorInterceptor::new(config),
            exception_handler: None,
            installed_at: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackHandler>) -> Self {
        let config = Arc::new(self.interceptor.config().clone());
        self.interceptor = ErrorInterceptor::with_fallback(config, fallback);
        self
    }

    /// Also installs `handler` as the runtime's exception handler.
    pub fn with_exception_handler(mut self, handler: Arc<dyn ExceptionHandler>) -> Self {
        self.exception_handler = Some(handler);
        self
    }

    pub fn is_installed(&self) -> bool {
        self.installed_at.is_some()
    }
}

#[async_trait]
impl OnModuleInit for ErrorHandlerComponent {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError> {
        if self.is_installed() {
            return Err(LifecycleError::init_failed("error handler already installed"));
        }

        let levels = self.runtime.error_reporting();
        let error_depth = self
            .runtime
            .install_error_handler_at(self.interceptor.clone(), levels);
        let exception_depth = self
            .exception_handler
            .as_ref()
            .map(|handler| self.runtime.install_shared_exception_handler_at(Arc::clone(handler)));
        self.installed_at = Some((error_depth, exception_depth));

        tracing::info!("Runtime error handler installed (levels {:#06x})", levels);
        Ok(())
    }
}

#[async_trait]
impl OnModuleDestroy for ErrorHandlerComponent {
    async fn on_module_destroy(&mut self) -> Result<(), LifecycleError> {
        let Some((error_depth, exception_depth)) = self.installed_at.take() else {
            return Ok(());
        };

        // Handlers installed after this component are removed with it.
        self.runtime
            .restore_error_handler_at(error_depth)
            .map_err(|e| LifecycleError::shutdown_failed(e.to_string()))?;
        if let Some(depth) = exception_depth {
            self.runtime
                .restore_exception_handler_at(depth)
                .map_err(|e| LifecycleError::shutdown_failed(e.to_string()))?;
        }

        tracing::info!("Runtime error handler restored");
        Ok(())
    }
}
