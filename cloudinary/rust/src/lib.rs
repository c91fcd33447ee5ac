//! Cloudinary Integration Module
//!
//! Typed client for the Cloudinary media API, packaged as a module that
//! registers one shared gateway in a service container.
//!
//! # Features
//!
//! - **Upload API**: uploads from files, buffers and remote URLs; destroy
//! - **Admin API**: resource listing and lookup, bulk delete
//! - **Delivery URLs**: transformations, private CDN, CNAME, signed URLs
//! - **Registration**: immediate options or an async options factory
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cloudinary_media::{
//!     CloudinaryModule, CloudinaryOptions, CloudinaryService, ServiceContainer,
//! };
//! use cloudinary_media::types::{TransformationOptions, UploadOptions, UrlOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cloudinary_media::Result<()> {
//!     let container = ServiceContainer::new();
//!     container.import(CloudinaryModule::for_root(CloudinaryOptions::from_env()?));
//!     container.init().await?;
//!
//!     let cloudinary: Arc<CloudinaryService> = container.get()?;
//!     let uploaded = cloudinary
//!         .upload("./photos/cat.jpg", Some(UploadOptions::new().folder("pets")))
//!         .await?;
//!
//!     let thumb = UrlOptions::with_transformation(
//!         TransformationOptions::new().width(150).height(150).crop("thumb"),
//!     );
//!     println!("{}", cloudinary.url(&uploaded.public_id, Some(&thumb)));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod container;
pub mod error;
pub mod mocks;
pub mod module;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::CloudinaryService;
pub use config::{resolve_options, CloudinaryConfig, CloudinaryOptions, SignatureAlgorithm};
pub use container::{Dependency, Injected, Module, ServiceContainer};
pub use error::{
    ApiError, CloudinaryError, ConfigurationError, NetworkError, RegistrationError, RequestError,
    ResponseError,
};
pub use module::{AsyncOptions, CloudinaryModule};
pub use services::{AdminService, UploaderService, UrlBuilder};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    DeleteOptions, DeleteResponse, Resource, ResourceLookupOptions, ResourceOptions,
    ResourceResponse, ResourceType, TransformationOptions, UploadOptions, UploadResponse,
    UploadSource, UrlOptions,
};

/// Create a gateway from environment variables.
///
/// Reads `CLOUDINARY_URL`, or `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`
/// and `CLOUDINARY_API_SECRET`.
///
/// ```rust,no_run
/// let cloudinary = cloudinary_media::create_service_from_env()?;
/// # Ok::<(), cloudinary_media::CloudinaryError>(())
/// ```
pub fn create_service_from_env() -> Result<CloudinaryService> {
    create_service(CloudinaryOptions::from_env()?)
}

/// Create a gateway from explicit options.
pub fn create_service(options: CloudinaryOptions) -> Result<CloudinaryService> {
    CloudinaryService::new(options.resolve())
}

/// Result type alias for Cloudinary operations.
pub type Result<T> = std::result::Result<T, CloudinaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        let _ = std::any::type_name::<CloudinaryError>();
        let _ = std::any::type_name::<CloudinaryConfig>();
        let _ = std::any::type_name::<CloudinaryModule>();
        let _ = std::any::type_name::<UploadOptions>();
        let _ = std::any::type_name::<UrlOptions>();
    }

    #[test]
    fn test_create_service() {
        let service = create_service(CloudinaryOptions::new("demo", "key", "secret")).unwrap();
        assert_eq!(service.config().cloud_name, "demo");
        assert!(service.config().secure);
    }
}
