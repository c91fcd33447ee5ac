//! Upload sources, options and responses.

use super::common::{AccessMode, DeliveryType, ResourceType};
use super::transformation::{join_transformations, TransformationOptions};
use crate::error::{CloudinaryError, RequestError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// URL schemes the API fetches remotely when given as the `file` parameter.
const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "ftp://", "s3://", "gs://", "data:"];

/// What to upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    /// In-memory file content.
    Bytes {
        /// Content.
        data: Bytes,
        /// File name sent with the multipart part.
        filename: Option<String>,
    },
    /// A file on the local filesystem.
    Path(PathBuf),
    /// A remote URL or data URI the API fetches itself.
    Remote(String),
}

impl UploadSource {
    /// In-memory content with a file name.
    pub fn bytes(data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        UploadSource::Bytes {
            data: data.into(),
            filename: Some(filename.into()),
        }
    }

    /// True when the string is passed to the API as a URL.
    pub fn is_remote(value: &str) -> bool {
        REMOTE_PREFIXES.iter().any(|p| value.starts_with(p))
    }
}

impl From<&str> for UploadSource {
    fn from(value: &str) -> Self {
        if UploadSource::is_remote(value) {
            UploadSource::Remote(value.to_string())
        } else {
            UploadSource::Path(PathBuf::from(value))
        }
    }
}

impl From<String> for UploadSource {
    fn from(value: String) -> Self {
        if UploadSource::is_remote(&value) {
            UploadSource::Remote(value)
        } else {
            UploadSource::Path(PathBuf::from(value))
        }
    }
}

impl From<PathBuf> for UploadSource {
    fn from(value: PathBuf) -> Self {
        UploadSource::Path(value)
    }
}

impl From<&std::path::Path> for UploadSource {
    fn from(value: &std::path::Path) -> Self {
        UploadSource::Path(value.to_path_buf())
    }
}

impl From<Bytes> for UploadSource {
    fn from(data: Bytes) -> Self {
        UploadSource::Bytes { data, filename: None }
    }
}

impl From<Vec<u8>> for UploadSource {
    fn from(data: Vec<u8>) -> Self {
        UploadSource::Bytes {
            data: Bytes::from(data),
            filename: None,
        }
    }
}

/// Access control rule for `access_control`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlRule {
    /// `token` or `anonymous`.
    pub access_type: String,
    /// Start of the access window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End of the access window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Options for upload requests.
///
/// Every field is optional and forwarded as an API parameter. Parameters
/// without a typed field go in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Public id to assign. Generated when unset.
    pub public_id: Option<String>,
    /// Folder to place the asset in.
    pub folder: Option<String>,
    /// Asset folder in dynamic folder mode.
    pub asset_folder: Option<String>,
    /// Display name in dynamic folder mode.
    pub display_name: Option<String>,
    /// Prefix for generated public ids.
    pub public_id_prefix: Option<String>,
    /// Path segment, not a signed parameter.
    pub resource_type: Option<ResourceType>,
    /// Delivery type to store under.
    #[serde(rename = "type")]
    pub delivery_type: Option<DeliveryType>,
    /// Access mode to store with.
    pub access_mode: Option<AccessMode>,
    /// Convert to this format before storing.
    pub format: Option<String>,
    /// Tags to attach.
    pub tags: Vec<String>,
    /// Contextual metadata, sent as `k=v|k=v`.
    pub context: BTreeMap<String, String>,
    /// Structured metadata values by field id.
    pub metadata: BTreeMap<String, String>,
    /// Incoming transformation applied before storing.
    pub transformation: Option<TransformationOptions>,
    /// Derived assets to generate at upload time.
    pub eager: Vec<TransformationOptions>,
    /// Generate eager transformations in the background.
    pub eager_async: Option<bool>,
    /// Notified when eager transformations finish.
    pub eager_notification_url: Option<String>,
    /// Notified when the upload finishes.
    pub notification_url: Option<String>,
    /// Replace an asset with the same public id.
    pub overwrite: Option<bool>,
    /// Append a random suffix to the file name.
    pub unique_filename: Option<bool>,
    /// Use the file name as the public id.
    pub use_filename: Option<bool>,
    /// File name to use instead of the uploaded one.
    pub filename_override: Option<String>,
    /// Invalidate CDN copies when overwriting.
    pub invalidate: Option<bool>,
    /// Keep a backup copy.
    pub backup: Option<bool>,
    /// Do not store the original file name.
    pub discard_original_filename: Option<bool>,
    /// Quality for the stored asset (`80`, `auto:good`).
    pub quality: Option<String>,
    /// Return a quality score.
    pub quality_analysis: Option<bool>,
    /// Return accessibility scores.
    pub accessibility_analysis: Option<bool>,
    /// Return a cinemagraph score.
    pub cinemagraph_analysis: Option<bool>,
    /// Return the color histogram.
    pub colors: Option<bool>,
    /// Return detected face coordinates.
    pub faces: Option<bool>,
    /// Return image metadata.
    pub image_metadata: Option<bool>,
    /// Return media metadata.
    pub media_metadata: Option<bool>,
    /// Return the perceptual hash.
    pub phash: Option<bool>,
    /// Object detection add-on.
    pub detection: Option<String>,
    /// OCR add-on.
    pub ocr: Option<String>,
    /// Categorization add-on.
    pub categorization: Option<String>,
    /// Confidence threshold for automatic tags.
    pub auto_tagging: Option<f64>,
    /// Background removal add-on.
    pub background_removal: Option<String>,
    /// Conversion add-on for raw files.
    pub raw_convert: Option<String>,
    /// Moderation add-on or `manual`.
    pub moderation: Option<String>,
    /// Responsive breakpoint settings, sent as JSON.
    pub responsive_breakpoints: Option<serde_json::Value>,
    /// Access windows, sent as JSON.
    pub access_control: Vec<AccessControlRule>,
    /// Upload preset. Falls back to the configured preset.
    pub upload_preset: Option<String>,
    /// Redirect URL for browser uploads.
    pub callback: Option<String>,
    /// Process the upload in the background (`async`).
    #[serde(rename = "async")]
    pub async_processing: Option<bool>,
    /// Additional parameters forwarded verbatim.
    pub extra: BTreeMap<String, String>,
}

impl UploadOptions {
    /// Create empty upload options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `public_id`.
    pub fn public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    /// Set `folder`.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set `resource_type`.
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set the tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add a context entry.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Set `transformation`.
    pub fn transformation(mut self, transformation: TransformationOptions) -> Self {
        self.transformation = Some(transformation);
        self
    }

    /// Add an eager transformation.
    pub fn eager(mut self, transformation: TransformationOptions) -> Self {
        self.eager.push(transformation);
        self
    }

    /// Set `eager_async`.
    pub fn eager_async(mut self, eager_async: bool) -> Self {
        self.eager_async = Some(eager_async);
        self
    }

    /// Set `overwrite`.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    /// Set `upload_preset`.
    pub fn upload_preset(mut self, preset: impl Into<String>) -> Self {
        self.upload_preset = Some(preset.into());
        self
    }

    /// Add a parameter forwarded verbatim.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// API parameters for these options, excluding `resource_type`.
    pub fn to_params(&self) -> Result<Vec<(String, String)>, CloudinaryError> {
        let mut params = ParamWriter::default();

        params.opt("public_id", &self.public_id);
        params.opt("folder", &self.folder);
        params.opt("asset_folder", &self.asset_folder);
        params.opt("display_name", &self.display_name);
        params.opt("public_id_prefix", &self.public_id_prefix);
        params.opt("type", &self.delivery_type.map(|t| t.as_str()));
        params.opt("access_mode", &self.access_mode.map(|m| m.as_str()));
        params.opt("format", &self.format);
        if !self.tags.is_empty() {
            params.put("tags", self.tags.join(","));
        }
        if !self.context.is_empty() {
            params.put("context", encode_context(&self.context));
        }
        if !self.metadata.is_empty() {
            params.put("metadata", encode_context(&self.metadata));
        }
        if let Some(t) = &self.transformation {
            params.put("transformation", t.to_transformation_string());
        }
        if !self.eager.is_empty() {
            params.put("eager", join_transformations(&self.eager));
        }
        params.opt("eager_async", &self.eager_async);
        params.opt("eager_notification_url", &self.eager_notification_url);
        params.opt("notification_url", &self.notification_url);
        params.opt("overwrite", &self.overwrite);
        params.opt("unique_filename", &self.unique_filename);
        params.opt("use_filename", &self.use_filename);
        params.opt("filename_override", &self.filename_override);
        params.opt("invalidate", &self.invalidate);
        params.opt("backup", &self.backup);
        params.opt("discard_original_filename", &self.discard_original_filename);
        params.opt("quality", &self.quality);
        params.opt("quality_analysis", &self.quality_analysis);
        params.opt("accessibility_analysis", &self.accessibility_analysis);
        params.opt("cinemagraph_analysis", &self.cinemagraph_analysis);
        params.opt("colors", &self.colors);
        params.opt("faces", &self.faces);
        params.opt("image_metadata", &self.image_metadata);
        params.opt("media_metadata", &self.media_metadata);
        params.opt("phash", &self.phash);
        params.opt("detection", &self.detection);
        params.opt("ocr", &self.ocr);
        params.opt("categorization", &self.categorization);
        params.opt("auto_tagging", &self.auto_tagging);
        params.opt("background_removal", &self.background_removal);
        params.opt("raw_convert", &self.raw_convert);
        params.opt("moderation", &self.moderation);
        if let Some(breakpoints) = &self.responsive_breakpoints {
            params.json("responsive_breakpoints", breakpoints)?;
        }
        if !self.access_control.is_empty() {
            params.json("access_control", &self.access_control)?;
        }
        params.opt("upload_preset", &self.upload_preset);
        params.opt("callback", &self.callback);
        params.opt("async", &self.async_processing);

        for (key, value) in &self.extra {
            params.put(key, value.clone());
        }

        Ok(params.finish())
    }
}

/// `k=v|k=v` encoding used for `context` and `metadata`.
fn encode_context(values: &BTreeMap<String, String>) -> String {
    values
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.replace('|', "\\|").replace('=', "\\=")))
        .collect::<Vec<_>>()
        .join("|")
}

#[derive(Default)]
pub(crate) struct ParamWriter {
    params: Vec<(String, String)>,
}

impl ParamWriter {
    /// Empty values are never sent.
    pub(crate) fn put(&mut self, key: &str, value: String) {
        if value.is_empty() {
            return;
        }
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value));
    }

    pub(crate) fn opt<T: ToString>(&mut self, key: &str, value: &Option<T>) {
        if let Some(v) = value {
            self.put(key, v.to_string());
        }
    }

    pub(crate) fn json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), CloudinaryError> {
        let encoded = serde_json::to_string(value).map_err(|e| RequestError::Encoding {
            name: key.to_string(),
            message: e.to_string(),
        })?;
        self.put(key, encoded);
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<(String, String)> {
        self.params
    }
}

/// An eager transformation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EagerResult {
    /// The transformation applied.
    pub transformation: Option<String>,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Size in bytes.
    pub bytes: Option<u64>,
    /// File format.
    pub format: Option<String>,
    /// HTTP delivery URL.
    pub url: Option<String>,
    /// HTTPS delivery URL.
    pub secure_url: Option<String>,
    /// Processing status for asynchronous eager results.
    pub status: Option<String>,
    /// Batch id for asynchronous processing.
    pub batch_id: Option<String>,
}

/// Upload API response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    /// Immutable asset id.
    pub asset_id: Option<String>,
    /// Public id of the asset.
    pub public_id: String,
    /// Asset version.
    pub version: u64,
    /// Version id.
    pub version_id: Option<String>,
    /// Response signature.
    pub signature: Option<String>,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// File format.
    pub format: Option<String>,
    /// Asset kind. Defaults to `image`.
    pub resource_type: Option<String>,
    /// Creation time, RFC 3339.
    pub created_at: Option<String>,
    /// Tags attached.
    pub tags: Vec<String>,
    /// Number of pages.
    pub pages: Option<u32>,
    /// Size in bytes.
    pub bytes: u64,
    /// Delivery type (`upload`, `private`, ...).
    #[serde(rename = "type")]
    pub delivery_type: Option<String>,
    /// Content hash.
    pub etag: Option<String>,
    /// True for placeholder assets.
    pub placeholder: Option<bool>,
    /// HTTP delivery URL.
    pub url: String,
    /// HTTPS delivery URL.
    pub secure_url: String,
    /// Folder the asset lives in.
    pub folder: Option<String>,
    /// Access mode.
    pub access_mode: Option<String>,
    /// Name of the uploaded file.
    pub original_filename: Option<String>,
    /// True when an existing asset was replaced.
    pub overwritten: Option<bool>,
    /// True when an identical asset already existed.
    pub existing: Option<bool>,
    /// Eager transformation results.
    pub eager: Vec<EagerResult>,
    /// Duration in seconds for audio and video.
    pub duration: Option<f64>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
