//! Lifecycle Hooks Module
//!
//! Startup and shutdown hooks for components that hold process-wide state,
//! such as the runtime error handler registration.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Configuration Loading
//!    ↓
//! 2. Runtime Creation
//!    ↓
//! 3. OnModuleInit (each component)     ← installs handlers
//!    ↓
//! [Serving requests...]
//!    ↓
//! 4. OnModuleDestroy (reverse order)   ← restores previous handlers
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use faultline::handler::ErrorHandlerComponent;
//! use faultline::lifecycle::LifecycleManager;
//!
//! let component = Arc::new(RwLock::new(ErrorHandlerComponent::new(runtime, config)));
//!
//! let mut manager = LifecycleManager::new();
//! manager.register_init(Arc::clone(&component), "ErrorHandler");
//! manager.register_destroy(component, "ErrorHandler");
//!
//! manager.call_module_init().await?;
//! // ... serve ...
//! manager.call_module_destroy().await?;
//! ```

mod error;
mod manager;
mod traits;

pub use error::{LifecycleError, Result};
pub use manager::LifecycleManager;
pub use traits::{OnModuleDestroy, OnModuleInit};
