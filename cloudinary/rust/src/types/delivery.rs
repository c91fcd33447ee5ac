//! Delivery URL options.

use super::common::{DeliveryType, ResourceType};
use super::transformation::TransformationOptions;
use serde::{Deserialize, Serialize};

/// Options for building a delivery URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlOptions {
    /// The final transformation.
    #[serde(flatten)]
    pub transformation: TransformationOptions,
    /// Transformations applied before `transformation`, in order.
    pub transformations: Vec<TransformationOptions>,
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<ResourceType>,
    /// Delivery type. Defaults to `upload`.
    #[serde(rename = "type")]
    pub delivery_type: Option<DeliveryType>,
    /// Asset version (`v{version}`).
    pub version: Option<u64>,
    /// Add `v1` to ids in folders when no version is given. Defaults to true.
    pub force_version: Option<bool>,
    /// File extension appended to the public id.
    pub format: Option<String>,
    /// Overrides the configured `secure` flag.
    pub secure: Option<bool>,
    /// Add an `s--signature--` component.
    pub sign_url: bool,
}

impl UrlOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with only a transformation set.
    pub fn with_transformation(transformation: TransformationOptions) -> Self {
        Self {
            transformation,
            ..Self::default()
        }
    }

    /// Append a transformation applied before the final one.
    pub fn chain(mut self, transformation: TransformationOptions) -> Self {
        self.transformations.push(transformation);
        self
    }

    /// Set the resource type.
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set the delivery type.
    pub fn delivery_type(mut self, delivery_type: DeliveryType) -> Self {
        self.delivery_type = Some(delivery_type);
        self
    }

    /// Set the version.
    pub fn version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the file extension.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Force `https` or `http`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sign the URL.
    pub fn sign_url(mut self, sign_url: bool) -> Self {
        self.sign_url = sign_url;
        self
    }
}

impl From<TransformationOptions> for UrlOptions {
    fn from(transformation: TransformationOptions) -> Self {
        UrlOptions::with_transformation(transformation)
    }
}
