//! Delivery URL construction.
//!
//! No network access: URLs are assembled from the config and options as
//!
//! ```text
//! {host}/{resource_type}/{type}/[signature/][transformations/][v{version}/]
//!     {public_id}[.{format}]
//! ```

use crate::config::{CloudinaryConfig, SHARED_CDN_HOST};
use crate::signing::RequestSigner;
use crate::types::{DeliveryType, ResourceType, UrlOptions};
use percent_encoding::{
    percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Characters escaped in public ids: everything outside the URI-component
/// unreserved set, except `/` as the folder separator and `:`.
const PUBLIC_ID_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'/')
    .remove(b':');

/// Characters escaped in fetched remote URLs.
const FETCH_URL_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']');

/// Number of `res-N` CDN shards.
const CDN_SHARDS: u32 = 5;

/// Builds delivery URLs for stored assets.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    config: Arc<CloudinaryConfig>,
    signer: RequestSigner,
}

impl UrlBuilder {
    /// Create a URL builder.
    pub fn new(config: Arc<CloudinaryConfig>) -> Self {
        let signer = RequestSigner::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.signature_algorithm,
        );
        Self { config, signer }
    }

    /// Delivery URL for `public_id`.
    pub fn build(&self, public_id: &str, options: Option<&UrlOptions>) -> String {
        let default_options = UrlOptions::default();
        let options = options.unwrap_or(&default_options);

        let resource_type = options.resource_type.unwrap_or(ResourceType::Image);
        let delivery_type = options.delivery_type.unwrap_or(DeliveryType::Upload);
        let is_remote = public_id.starts_with("http://") || public_id.starts_with("https://");

        if is_remote && delivery_type == DeliveryType::Upload {
            return public_id.to_string();
        }

        let transformation = self.transformation_path(options);

        let source = if delivery_type == DeliveryType::Fetch {
            utf8_percent_encode(public_id, FETCH_URL_ESCAPE).to_string()
        } else {
            let escaped = escape_public_id(public_id);
            match options.format.as_deref().filter(|f| !f.is_empty()) {
                Some(format) => format!("{}.{}", escaped, format),
                None => escaped,
            }
        };

        let force_version = options.force_version.unwrap_or(true);
        let version = options.version.or_else(|| {
            let needs_default = force_version
                && !is_remote
                && public_id.contains('/')
                && !has_version_prefix(public_id);
            needs_default.then_some(1)
        });

        let signature = options.sign_url.then(|| {
            let to_sign = [transformation.as_str(), source.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("/");
            self.signer.url_signature(&to_sign)
        });

        let secure = options.secure.unwrap_or(self.config.secure);
        let mut parts = vec![
            self.host(public_id, secure),
            resource_type.as_str().to_string(),
            delivery_type.as_str().to_string(),
        ];
        parts.extend(signature);
        if !transformation.is_empty() {
            parts.push(transformation);
        }
        if let Some(version) = version {
            parts.push(format!("v{}", version));
        }
        parts.push(source);

        parts.join("/")
    }

    /// Chained transformations first, then the final one, `/` separated.
    fn transformation_path(&self, options: &UrlOptions) -> String {
        options
            .transformations
            .iter()
            .chain(std::iter::once(&options.transformation))
            .map(|t| t.to_transformation_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Scheme, host and (for shared hosts) the cloud name.
    fn host(&self, public_id: &str, secure: bool) -> String {
        let config = &self.config;
        let private_cdn = config.uses_private_cdn();
        let sharded = config.cdn_subdomain.unwrap_or(false);

        let prefix = if secure {
            let host = match config.secure_distribution.as_deref().filter(|h| !h.is_empty()) {
                Some(host) => host.to_string(),
                None if private_cdn => format!("{}-{}", config.cloud_name, SHARED_CDN_HOST),
                None => SHARED_CDN_HOST.to_string(),
            };
            format!("https://{}", host)
        } else if let Some(cname) = config.cname.as_deref().filter(|c| !c.is_empty()) {
            if sharded {
                format!("http://a{}.{}", shard(public_id), cname)
            } else {
                format!("http://{}", cname)
            }
        } else {
            let cdn_part = if private_cdn {
                format!("{}-", config.cloud_name)
            } else {
                String::new()
            };
            let shard_part = if sharded {
                format!("-{}", shard(public_id))
            } else {
                String::new()
            };
            format!("http://{}res{}.cloudinary.com", cdn_part, shard_part)
        };

        if private_cdn {
            prefix
        } else {
            format!("{}/{}", prefix, config.cloud_name)
        }
    }
}

/// Decodes any existing escapes first so ids are never double-encoded.
fn escape_public_id(public_id: &str) -> String {
    let decoded = percent_decode_str(public_id)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(public_id));
    utf8_percent_encode(&decoded, PUBLIC_ID_ESCAPE).to_string()
}

/// Shard number in `1..=5` for a public id.
fn shard(public_id: &str) -> u32 {
    crc32fast::hash(public_id.as_bytes()) % CDN_SHARDS + 1
}

/// Ids starting with `v` and a digit already carry a version.
fn has_version_prefix(public_id: &str) -> bool {
    public_id
        .strip_prefix('v')
        .and_then(|rest| rest.bytes().next())
        .map_or(false, |b| b.is_ascii_digit())
}
