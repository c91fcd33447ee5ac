//! Admin API request and response types.

use super::common::{DeliveryType, Direction, ResourceType};
use super::upload::{EagerResult, ParamWriter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Options for deleting an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteOptions {
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<ResourceType>,
    /// Delivery type. Defaults to `upload`.
    #[serde(rename = "type")]
    pub delivery_type: Option<DeliveryType>,
    /// Invalidate CDN cached copies.
    pub invalidate: Option<bool>,
    /// Keep the original, delete only derived assets (bulk delete).
    pub keep_original: Option<bool>,
    /// Continue a partial bulk delete.
    pub next_cursor: Option<String>,
}

impl DeleteOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `resource_type`.
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set `delivery_type`.
    pub fn delivery_type(mut self, delivery_type: DeliveryType) -> Self {
        self.delivery_type = Some(delivery_type);
        self
    }

    /// Set `invalidate`.
    pub fn invalidate(mut self, invalidate: bool) -> Self {
        self.invalidate = Some(invalidate);
        self
    }

    /// API parameters, excluding `resource_type`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = ParamWriter::default();
        params.opt("type", &self.delivery_type.map(|t| t.as_str()));
        params.opt("invalidate", &self.invalidate);
        params.opt("keep_original", &self.keep_original);
        params.opt("next_cursor", &self.next_cursor);
        params.finish()
    }
}

/// Response to a destroy or bulk delete.
///
/// Destroy answers `{"result": "ok"}` (or `"not found"`); bulk delete
/// answers with the `deleted` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    /// `ok` or `not found` for a destroy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Per public id deletion status.
    pub deleted: HashMap<String, String>,
    /// True when more assets remain to delete.
    pub partial: bool,
    /// Original and derived counts per public id.
    pub deleted_counts: HashMap<String, serde_json::Value>,
    /// Cursor for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeleteResponse {
    /// True when destroy reported `ok`.
    pub fn is_ok(&self) -> bool {
        self.result.as_deref() == Some("ok")
    }
}

/// Query for listing resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<ResourceType>,
    /// Restrict to one delivery type.
    #[serde(rename = "type")]
    pub delivery_type: Option<DeliveryType>,
    /// Public id prefix filter.
    pub prefix: Option<String>,
    /// Include tags.
    pub tags: Option<bool>,
    /// Include contextual metadata.
    pub context: Option<bool>,
    /// Include structured metadata.
    pub metadata: Option<bool>,
    /// Include moderation status.
    pub moderations: Option<bool>,
    /// Page size.
    pub max_results: Option<u32>,
    /// Cursor for the next page.
    pub next_cursor: Option<String>,
    /// List resources created after this time.
    pub start_at: Option<String>,
    /// Sort direction.
    pub direction: Option<Direction>,
    /// Restrict returned fields.
    pub fields: Vec<String>,
}

impl ResourceOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `resource_type`.
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set `delivery_type`.
    pub fn delivery_type(mut self, delivery_type: DeliveryType) -> Self {
        self.delivery_type = Some(delivery_type);
        self
    }

    /// Set `prefix`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set `max_results`.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Set `next_cursor`.
    pub fn next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Set `direction`.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Query parameters, excluding the path segments.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = ParamWriter::default();
        params.opt("prefix", &self.prefix);
        params.opt("tags", &self.tags);
        params.opt("context", &self.context);
        params.opt("metadata", &self.metadata);
        params.opt("moderations", &self.moderations);
        params.opt("max_results", &self.max_results);
        params.opt("next_cursor", &self.next_cursor);
        params.opt("start_at", &self.start_at);
        params.opt("direction", &self.direction.map(|d| d.as_str()));
        if !self.fields.is_empty() {
            params.put("fields", self.fields.join(","));
        }
        params.finish()
    }
}

/// A stored asset as described by the Admin API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// Immutable asset id.
    pub asset_id: Option<String>,
    /// Public id of the asset.
    pub public_id: String,
    /// File format.
    pub format: Option<String>,
    /// Asset version.
    pub version: u64,
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<String>,
    /// Delivery type (`upload`, `private`, ...).
    #[serde(rename = "type")]
    pub delivery_type: Option<String>,
    /// Creation time, RFC 3339.
    pub created_at: Option<String>,
    /// Size in bytes.
    pub bytes: u64,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Folder the asset lives in.
    pub folder: Option<String>,
    /// Access mode.
    pub access_mode: Option<String>,
    /// HTTP delivery URL.
    pub url: Option<String>,
    /// HTTPS delivery URL.
    pub secure_url: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Contextual metadata.
    pub context: Option<serde_json::Value>,
    /// Structured metadata.
    pub metadata: Option<serde_json::Value>,
    /// Derived assets.
    pub derived: Vec<EagerResult>,
    /// Cursor into the derived assets.
    pub next_cursor: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of a resource listing.
///
/// The rate-limit figures come from the response headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceResponse {
    /// Resources on this page.
    pub resources: Vec<Resource>,
    /// Cursor for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Hourly Admin API quota.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_allowed: Option<u64>,
    /// When the quota resets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset_at: Option<String>,
    /// Calls left in the quota.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_remaining: Option<u64>,
}

/// Options for a single resource lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLookupOptions {
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<ResourceType>,
    /// Delivery type. Defaults to `upload`.
    #[serde(rename = "type")]
    pub delivery_type: Option<DeliveryType>,
    /// Include color histogram.
    pub colors: Option<bool>,
    /// Include detected faces.
    pub faces: Option<bool>,
    /// Include image metadata.
    pub image_metadata: Option<bool>,
    /// Include Exif data.
    pub exif: Option<bool>,
    /// Include the page count.
    pub pages: Option<bool>,
    /// Include the perceptual hash.
    pub phash: Option<bool>,
    /// Include custom and face coordinates.
    pub coordinates: Option<bool>,
    /// Include quality analysis.
    pub quality_analysis: Option<bool>,
    /// Include accessibility analysis.
    pub accessibility_analysis: Option<bool>,
    /// Include cinemagraph analysis.
    pub cinemagraph_analysis: Option<bool>,
    /// Include backed-up versions.
    pub versions: Option<bool>,
    /// Maximum derived assets returned.
    pub max_results: Option<u32>,
    /// Cursor into the derived assets.
    pub derived_next_cursor: Option<String>,
    /// Additional query parameters forwarded verbatim.
    pub extra: BTreeMap<String, String>,
}

impl ResourceLookupOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `resource_type`.
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set `colors`.
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Set `faces`.
    pub fn faces(mut self, faces: bool) -> Self {
        self.faces = Some(faces);
        self
    }

    /// Add a parameter forwarded verbatim.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Query parameters, excluding the path segments.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = ParamWriter::default();
        params.opt("colors", &self.colors);
        params.opt("faces", &self.faces);
        params.opt("image_metadata", &self.image_metadata);
        params.opt("exif", &self.exif);
        params.opt("pages", &self.pages);
        params.opt("phash", &self.phash);
        params.opt("coordinates", &self.coordinates);
        params.opt("quality_analysis", &self.quality_analysis);
        params.opt("accessibility_analysis", &self.accessibility_analysis);
        params.opt("cinemagraph_analysis", &self.cinemagraph_analysis);
        params.opt("versions", &self.versions);
        params.opt("max_results", &self.max_results);
        params.opt("derived_next_cursor", &self.derived_next_cursor);
        for (key, value) in &self.extra {
            params.put(key, value.clone());
        }
        params.finish()
    }
}
