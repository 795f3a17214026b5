//! Lifecycle Manager
//!
//! Manages the registration and execution of lifecycle hooks.

use super::{LifecycleError, OnModuleDestroy, OnModuleInit, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

struct LifecycleHook<T: ?Sized> {
    component: Arc<RwLock<T>>,
    name: String,
}

impl<T: ?Sized> LifecycleHook<T> {
    fn new(component: Arc<RwLock<T>>, name: impl Into<String>) -> Self {
        Self {
            component,
            name: name.into(),
        }
    }
}

/// Runs init hooks in registration order and destroy hooks in reverse.
pub struct LifecycleManager {
    on_init_hooks: Vec<LifecycleHook<dyn OnModuleInit>>,
    on_destroy_hooks: Vec<LifecycleHook<dyn OnModuleDestroy>>,
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            on_init_hooks: Vec::new(),
            on_destroy_hooks: Vec::new(),
        }
    }

    pub fn register_init<T>(&mut self, component: Arc<RwLock<T>>, name: impl Into<String>)
    where
        T: OnModuleInit + 'static,
    {
        self.on_init_hooks.push(LifecycleHook::new(component, name));
    }

    pub fn register_destroy<T>(&mut self, component: Arc<RwLock<T>>, name: impl Into<String>)
    where
        T: OnModuleDestroy + 'static,
    {
        self.on_destroy_hooks
            .push(LifecycleHook::new(component, name));
    }

    /// Execute all OnModuleInit hooks, stopping at the first failure.
    pub async fn call_module_init(&self) -> Result<()> {
        tracing::info!("Calling OnModuleInit hooks...");

        for hook in &self.on_init_hooks {
            tracing::debug!("Initializing: {}", hook.name);
            let mut component = hook.component.write().await;
            component.on_module_init().await.map_err(|e| {
                tracing::error!("OnModuleInit failed for {}: {}", hook.name, e);
                LifecycleError::hook_failed(&hook.name, e.to_string())
            })?;
        }

        tracing::info!(
            "OnModuleInit complete ({} hooks executed)",
            self.on_init_hooks.len()
        );
        Ok(())
    }

    /// Execute all OnModuleDestroy hooks in **reverse order**.
    ///
    /// A failing hook is logged and the remaining hooks still run.
    pub async fn call_module_destroy(&self) -> Result<()> {
        tracing::info!("Calling OnModuleDestroy hooks...");

        for hook in self.on_destroy_hooks.iter().rev() {
            tracing::debug!("Destroying: {}", hook.name);
            let mut component = hook.component.write().await;
            if let Err(e) = component.on_module_destroy().await {
                tracing::error!("OnModuleDestroy failed for {}: {}", hook.name, e);
            }
        }

        tracing::info!(
            "OnModuleDestroy complete ({} hooks executed)",
            self.on_destroy_hooks.len()
        );
        Ok(())
    }

    pub fn init_hook_count(&self) -> usize {
        self.on_init_hooks.len()
    }

    pub fn destroy_hook_count(&self) -> usize {
        self.on_destroy_hooks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_destroy_reverse_order() {
        let order = Arc::new(RwLock::new(Vec::new()));

        struct OrderedComponent {
            id: usize,
            order: Arc<RwLock<Vec<usize>>>,
        }

        #[async_trait::async_trait]
        impl OnModuleDestroy for OrderedComponent {
            async fn on_module_destroy(&mut self) -> Result<()> {
                self.order.write().await.push(self.id);
                Ok(())
            }
        }

        let mut manager = LifecycleManager::new();

        for i in 0..3 {
            let component = Arc::new(RwLock::new(OrderedComponent {
                id: i,
                order: Arc::clone(&order),
            }));
            manager.register_destroy(component, format!("Component{}", i));
        }

        manager.call_module_destroy().await.unwrap();

        let order = order.read().await;
        assert_eq!(*order, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_init_failure_is_reported() {
        struct Broken;

        #[async_trait::async_trait]
        impl OnModuleInit for Broken {
            async fn on_module_init(&mut self) -> Result<()> {
                Err(LifecycleError::init_failed("no runtime"))
            }
        }

        let mut manager = LifecycleManager::new();
        manager.register_init(Arc::new(RwLock::new(Broken)), "Broken");

        let err = manager.call_module_init().await.unwrap_err();
        assert!(matches!(err, LifecycleError::HookFailed { ref component, .. } if component == "Broken"));
    }
}
