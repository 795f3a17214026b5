//! Lifecycle hook traits

use super::LifecycleError;
use async_trait::async_trait;

/// Called once at startup, before requests are served.
///
/// Components acquiring process-wide state (installing a runtime error
/// handler, for instance) do it here.
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError>;
}

/// Called once at shutdown.
///
/// Components are destroyed in **reverse order** of registration, so state
/// acquired in [`OnModuleInit`] is released last-in, first-out.
#[async_trait]
pub trait OnModuleDestroy: Send + Sync {
    async fn on_module_destroy(&mut self) -> Result<(), LifecycleError>;
}
