//! Minimal typed service container.
//!
//! Services are registered once as `Arc<T>` and fetched by type; every
//! consumer receives a clone of the same `Arc`. Modules are imported first
//! and initialized together by [`ServiceContainer::init`].
//!
//! Key = `type_name::<T>()`, which also works for `T = dyn Trait`.

use crate::error::{CloudinaryError, RegistrationError};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

type Entry = Arc<dyn Any + Send + Sync>;

/// A unit that registers services into a container when initialized.
#[async_trait]
pub trait Module: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Build and register the module's services.
    async fn initialize(
        self: Box<Self>,
        container: &ServiceContainer,
    ) -> Result<(), CloudinaryError>;
}

/// A dependency declared by type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency(&'static str);

impl Dependency {
    /// Dependency on the service registered as `Arc<T>`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Dependency(type_name::<T>())
    }

    /// The type name.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Declared dependencies resolved for an options factory.
#[derive(Clone, Default)]
pub struct Injected {
    entries: HashMap<&'static str, Entry>,
}

impl Injected {
    /// Fetch a declared dependency.
    pub fn get<T>(&self) -> Result<Arc<T>, CloudinaryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast::<T>(self.entries.get(type_name::<T>()))
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was injected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Injected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

fn downcast<T>(entry: Option<&Entry>) -> Result<Arc<T>, CloudinaryError>
where
    T: ?Sized + Send + Sync + 'static,
{
    entry
        .and_then(|e| e.downcast_ref::<Arc<T>>())
        .cloned()
        .ok_or_else(|| RegistrationError::NotRegistered(type_name::<T>()).into())
}

/// Type-keyed registry of shared services.
pub struct ServiceContainer {
    services: RwLock<HashMap<&'static str, Entry>>,
    pending: Mutex<Vec<Box<dyn Module>>>,
    init_lock: AsyncMutex<()>,
}

impl ServiceContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            pending: Mutex::new(Vec::new()),
            init_lock: AsyncMutex::new(()),
        }
    }

    /// Register a service under type `T`, replacing any previous one.
    pub fn register<T>(&self, service: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.services.write().insert(type_name::<T>(), Arc::new(service));
    }

    /// Fetch the service registered under type `T`.
    pub fn get<T>(&self) -> Result<Arc<T>, CloudinaryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast::<T>(self.services.read().get(type_name::<T>()))
    }

    /// Whether a service is registered under type `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_dependency(Dependency::of::<T>())
    }

    /// Whether a declared dependency is registered.
    pub fn contains_dependency(&self, dependency: Dependency) -> bool {
        self.services.read().contains_key(dependency.name())
    }

    /// Resolve declared dependencies, failing on the first missing one.
    pub fn resolve(&self, dependencies: &[Dependency]) -> Result<Injected, CloudinaryError> {
        let services = self.services.read();
        let mut entries = HashMap::with_capacity(dependencies.len());

        for dependency in dependencies {
            let entry = services.get(dependency.name()).ok_or(RegistrationError::MissingDependency {
                dependency: dependency.name(),
            })?;
            entries.insert(dependency.name(), entry.clone());
        }

        Ok(Injected { entries })
    }

    /// Queue a module for initialization.
    pub fn import(&self, module: impl Module + 'static) {
        self.pending.lock().push(Box::new(module));
    }

    /// Initialize every imported module, in import order.
    ///
    /// Modules are consumed, so calling `init` again only initializes
    /// modules imported since the previous call. Concurrent callers wait
    /// for the initialization in progress to finish. The first failure is
    /// returned and the remaining modules stay unregistered.
    pub async fn init(&self) -> Result<(), CloudinaryError> {
        let _initializing = self.init_lock.lock().await;
        let modules: Vec<Box<dyn Module>> = std::mem::take(&mut *self.pending.lock());

        for module in modules {
            module.initialize(self).await?;
        }

        Ok(())
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    /// True when no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("services", &self.services.read().keys().collect::<Vec<_>>())
            .field("pending_modules", &self.pending.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_register_and_get_trait_object() {
        let container = ServiceContainer::new();
        container.register::<dyn Greeter>(Arc::new(English));

        let a = container.get::<dyn Greeter>().unwrap();
        let b = container.get::<dyn Greeter>().unwrap();

        assert_eq!(a.greet(), "hello");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(container.contains::<dyn Greeter>());
    }

    #[test]
    fn test_missing_service() {
        let container = ServiceContainer::new();
        let err = container.get::<String>().unwrap_err();
        assert!(matches!(
            err,
            CloudinaryError::Registration(RegistrationError::NotRegistered(name))
                if name == type_name::<String>()
        ));
    }

    #[test]
    fn test_resolve_declared_dependencies() {
        let container = ServiceContainer::new();
        container.register(Arc::new(42u32));

        let injected = container.resolve(&[Dependency::of::<u32>()]).unwrap();
        assert_eq!(*injected.get::<u32>().unwrap(), 42);
        assert!(injected.get::<String>().is_err());

        let err = container
            .resolve(&[Dependency::of::<u32>(), Dependency::of::<String>()])
            .unwrap_err();
        assert!(matches!(
            err,
            CloudinaryError::Registration(RegistrationError::MissingDependency { .. })
        ));
    }

    struct Counting(Arc<std::sync::atomic::AtomicUsize>);

    #[async_trait]
    impl Module for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn initialize(
            self: Box<Self>,
            container: &ServiceContainer,
        ) -> Result<(), CloudinaryError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            container.register(Arc::new("ready".to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_init_consumes_modules() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let container = ServiceContainer::new();
        container.import(Counting(calls.clone()));

        container.init().await.unwrap();
        container.init().await.unwrap();

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(*container.get::<String>().unwrap(), "ready");
    }
}
