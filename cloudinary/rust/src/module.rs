//! Registration of the Cloudinary gateway in a [`ServiceContainer`].
//!
//! Two modes:
//!
//! - [`CloudinaryModule::for_root`] takes options directly.
//! - [`CloudinaryModule::for_root_async`] takes an async options factory
//!   plus the dependencies it needs. The factory runs once, when the
//!   container is initialized, never at registration.
//!
//! Either way exactly one [`CloudinaryService`] is built and registered,
//! and every consumer shares it.

use crate::client::CloudinaryService;
use crate::config::{CloudinaryConfig, CloudinaryOptions};
use crate::container::{Dependency, Injected, Module, ServiceContainer};
use crate::error::{CloudinaryError, RegistrationError};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

type OptionsFuture = BoxFuture<'static, anyhow::Result<CloudinaryOptions>>;
type OptionsFactory = Box<dyn FnOnce(Injected) -> OptionsFuture + Send>;

/// Deferred options: a factory and the dependencies it receives.
pub struct AsyncOptions {
    factory: OptionsFactory,
    inject: Vec<Dependency>,
}

impl AsyncOptions {
    /// Wrap an async factory producing the module options.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: FnOnce(Injected) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<CloudinaryOptions>> + Send + 'static,
    {
        Self {
            factory: Box::new(move |injected| factory(injected).boxed()),
            inject: Vec::new(),
        }
    }

    /// Declare a dependency the factory receives, registered as `Arc<T>`.
    pub fn inject<T: ?Sized + 'static>(mut self) -> Self {
        self.inject.push(Dependency::of::<T>());
        self
    }

    /// Declared dependencies.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.inject
    }
}

impl std::fmt::Debug for AsyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncOptions")
            .field("inject", &self.inject)
            .finish_non_exhaustive()
    }
}

enum ConfigProvider {
    Value(CloudinaryConfig),
    Factory(AsyncOptions),
}

/// The Cloudinary module.
pub struct CloudinaryModule {
    provider: ConfigProvider,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl CloudinaryModule {
    /// Register with options known up front.
    pub fn for_root(options: CloudinaryOptions) -> Self {
        Self {
            provider: ConfigProvider::Value(options.resolve()),
            transport: None,
        }
    }

    /// Register with options produced later by an async factory.
    pub fn for_root_async(options: AsyncOptions) -> Self {
        Self {
            provider: ConfigProvider::Factory(options),
            transport: None,
        }
    }

    /// Build the gateway over this transport instead of reqwest.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// True for modules registered with [`for_root_async`](Self::for_root_async).
    pub fn is_deferred(&self) -> bool {
        matches!(self.provider, ConfigProvider::Factory(_))
    }

    async fn resolve_config(
        provider: ConfigProvider,
        container: &ServiceContainer,
    ) -> Result<CloudinaryConfig, CloudinaryError> {
        match provider {
            ConfigProvider::Value(config) => Ok(config),
            ConfigProvider::Factory(options) => {
                let injected = container.resolve(&options.inject)?;
                debug!(dependencies = injected.len(), "Running Cloudinary options factory");

                let resolved = (options.factory)(injected)
                    .await
                    .map_err(|source| RegistrationError::FactoryFailed { source })?;
                Ok(resolved.resolve())
            }
        }
    }
}

impl std::fmt::Debug for CloudinaryModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryModule")
            .field("deferred", &self.is_deferred())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

#[async_trait]
impl Module for CloudinaryModule {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn initialize(
        self: Box<Self>,
        container: &ServiceContainer,
    ) -> Result<(), CloudinaryError> {
        let CloudinaryModule { provider, transport } = *self;
        let deferred = matches!(provider, ConfigProvider::Factory(_));

        let config = Self::resolve_config(provider, container).await?;
        let cloud_name = config.cloud_name.clone();

        let service = match transport {
            Some(transport) => CloudinaryService::with_transport(config.clone(), transport),
            None => CloudinaryService::new(config.clone())?,
        };

        container.register(Arc::new(config));
        container.register(Arc::new(service));

        info!(cloud_name = %cloud_name, deferred, "Cloudinary module initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockTransport, TestFixtures};

    #[tokio::test]
    async fn test_for_root_registers_service_and_config() {
        let container = ServiceContainer::new();
        container.import(
            CloudinaryModule::for_root(TestFixtures::options().with_cname("media.example.com"))
                .with_transport(Arc::new(MockTransport::new())),
        );

        assert!(!container.contains::<CloudinaryService>());
        container.init().await.unwrap();

        let service = container.get::<CloudinaryService>().unwrap();
        let config = container.get::<CloudinaryConfig>().unwrap();
        assert_eq!(service.config(), config.as_ref());
        assert_eq!(config.cname.as_deref(), Some("media.example.com"));
        assert!(config.secure);
    }

    #[tokio::test]
    async fn test_factory_receives_injected_dependency() {
        struct Vault(String);

        let container = ServiceContainer::new();
        container.register(Arc::new(Vault("vault-secret".to_string())));
        container.import(
            CloudinaryModule::for_root_async(
                AsyncOptions::new(|deps: Injected| async move {
                    let vault = deps.get::<Vault>()?;
                    Ok::<_, anyhow::Error>(CloudinaryOptions::new("demo", "key", vault.0.clone()))
                })
                .inject::<Vault>(),
            )
            .with_transport(Arc::new(MockTransport::new())),
        );

        container.init().await.unwrap();

        let config = container.get::<CloudinaryConfig>().unwrap();
        assert_eq!(secrecy::ExposeSecret::expose_secret(&config.api_secret), "vault-secret");
    }

    #[tokio::test]
    async fn test_missing_injected_dependency() {
        struct NeverRegistered;

        let container = ServiceContainer::new();
        container.import(CloudinaryModule::for_root_async(
            AsyncOptions::new(|_| async { Ok::<_, anyhow::Error>(TestFixtures::options()) })
                .inject::<NeverRegistered>(),
        ));

        let err = container.init().await.unwrap_err();
        assert!(matches!(
            err,
            CloudinaryError::Registration(RegistrationError::MissingDependency { .. })
        ));
        assert!(!container.contains::<CloudinaryService>());
    }

    #[tokio::test]
    async fn test_factory_error_is_propagated() {
        let container = ServiceContainer::new();
        container.import(CloudinaryModule::for_root_async(AsyncOptions::new(|_| async {
            Err::<CloudinaryOptions, _>(anyhow::anyhow!("secret store unavailable"))
        })));

        let err = container.init().await.unwrap_err();
        match err {
            CloudinaryError::Registration(RegistrationError::FactoryFailed { source }) => {
                assert_eq!(source.to_string(), "secret store unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
