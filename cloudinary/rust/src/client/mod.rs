//! The Cloudinary media gateway.
//!
//! [`CloudinaryService`] forwards each operation to the matching API
//! service. It adds no retry, caching or pagination: one call is one
//! transport round trip, and whatever the API or transport returns is
//! handed back unchanged.

pub mod executor;

use crate::config::CloudinaryConfig;
use crate::error::CloudinaryError;
use crate::services::{AdminService, UploaderService, UrlBuilder};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    DeleteOptions, DeleteResponse, Resource, ResourceLookupOptions, ResourceOptions,
    ResourceResponse,
    UploadOptions, UploadResponse, UploadSource, UrlOptions,
};
use executor::RequestExecutor;
use std::sync::Arc;

/// Media gateway bound to one account configuration.
pub struct CloudinaryService {
    config: Arc<CloudinaryConfig>,
    uploader: UploaderService,
    admin: AdminService,
    urls: UrlBuilder,
}

impl CloudinaryService {
    /// Create a gateway using the default reqwest transport.
    pub fn new(config: CloudinaryConfig) -> Result<Self, CloudinaryError> {
        let transport = ReqwestTransport::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a gateway over a custom transport.
    pub fn with_transport(config: CloudinaryConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        let executor = Arc::new(RequestExecutor::new(config.clone(), transport));

        Self {
            uploader: UploaderService::new(config.clone(), executor.clone()),
            admin: AdminService::new(executor),
            urls: UrlBuilder::new(config.clone()),
            config,
        }
    }

    /// Upload a local file path, byte buffer or remote URL.
    pub async fn upload(
        &self,
        source: impl Into<UploadSource>,
        options: Option<UploadOptions>,
    ) -> Result<UploadResponse, CloudinaryError> {
        self.uploader.upload(source.into(), options).await
    }

    /// Upload an asset the API fetches from `url`.
    pub async fn upload_from_url(
        &self,
        url: &str,
        options: Option<UploadOptions>,
    ) -> Result<UploadResponse, CloudinaryError> {
        self.uploader.upload_from_url(url, options).await
    }

    /// Delete an asset by public id.
    pub async fn delete(
        &self,
        public_id: &str,
        options: Option<DeleteOptions>,
    ) -> Result<DeleteResponse, CloudinaryError> {
        self.uploader.destroy(public_id, options).await
    }

    /// List one page of resources.
    pub async fn get_resources(
        &self,
        options: Option<ResourceOptions>,
    ) -> Result<ResourceResponse, CloudinaryError> {
        self.admin.resources(options).await
    }

    /// Look up a single resource.
    pub async fn get_resource(
        &self,
        public_id: &str,
        options: Option<ResourceLookupOptions>,
    ) -> Result<Resource, CloudinaryError> {
        self.admin.resource(public_id, options).await
    }

    /// Delivery URL for an asset. No network access.
    pub fn url(&self, public_id: &str, options: Option<&UrlOptions>) -> String {
        self.urls.build(public_id, options)
    }

    /// Delivery URL for a video.
    ///
    /// Built exactly like [`url`](Self::url); pass
    /// `resource_type: Some(ResourceType::Video)` in the options to address
    /// the video store.
    pub fn video_url(&self, public_id: &str, options: Option<&UrlOptions>) -> String {
        self.urls.build(public_id, options)
    }

    /// The Upload API service.
    pub fn uploader(&self) -> &UploaderService {
        &self.uploader
    }

    /// The Admin API service.
    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    /// The delivery URL builder.
    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    /// The resolved configuration.
    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }
}

impl std::fmt::Debug for CloudinaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
