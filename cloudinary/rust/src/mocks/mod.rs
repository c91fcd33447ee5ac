//! Mock implementations for testing.
//!
//! [`MockTransport`] records every request and replays queued responses or
//! errors; [`TestFixtures`] holds canned Cloudinary payloads.

mod transport;

pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

use crate::config::{CloudinaryConfig, CloudinaryOptions};
use serde_json::{json, Value};

const DELIVERY_PATH: &str = "res.cloudinary.com/demo/image/upload";

/// Test fixtures for Cloudinary operations.
pub struct TestFixtures;

impl TestFixtures {
    /// Options for the `demo` cloud with fixed credentials.
    pub fn options() -> CloudinaryOptions {
        CloudinaryOptions::new("demo", "1234567890", "test-secret")
    }

    /// Resolved config for the `demo` cloud.
    pub fn config() -> CloudinaryConfig {
        Self::options().resolve()
    }

    /// Upload API success body.
    pub fn upload_json(public_id: &str) -> Value {
        json!({
            "asset_id": "3515c6000a548515f1134043f9785c2f",
            "public_id": public_id,
            "version": 1312461204,
            "version_id": "7d2cc533bee9ff39f7da7414b61fce7e",
            "signature": "abcdefgc024acceb1c5baa8dca46797137fa5ae0c3",
            "width": 864,
            "height": 576,
            "format": "jpg",
            "resource_type": "image",
            "created_at": "2024-01-15T10:30:00Z",
            "tags": ["sample"],
            "bytes": 120253,
            "type": "upload",
            "etag": "3c33e9e3e2f8a1b8f2bb7e9c3d1f0a11",
            "placeholder": false,
            "url": format!("http://{}/v1312461204/{}.jpg", DELIVERY_PATH, public_id),
            "secure_url": format!("https://{}/v1312461204/{}.jpg", DELIVERY_PATH, public_id),
            "original_filename": "sample"
        })
    }

    /// One page of a resource listing.
    pub fn resources_json(next_cursor: Option<&str>) -> Value {
        let mut body = json!({
            "resources": [
                Self::resource_json("products/shoe"),
                Self::resource_json("products/hat"),
            ]
        });
        if let Some(cursor) = next_cursor {
            body["next_cursor"] = Value::String(cursor.to_string());
        }
        body
    }

    /// A single resource descriptor.
    pub fn resource_json(public_id: &str) -> Value {
        json!({
            "asset_id": "b5e6d2b39ba3e0869d67141ba7dba6cf",
            "public_id": public_id,
            "format": "jpg",
            "version": 1719307544,
            "resource_type": "image",
            "type": "upload",
            "created_at": "2024-06-25T09:25:44Z",
            "bytes": 1024,
            "width": 640,
            "height": 480,
            "url": format!("http://{}/v1719307544/{}.jpg", DELIVERY_PATH, public_id),
            "secure_url": format!("https://{}/v1719307544/{}.jpg", DELIVERY_PATH, public_id)
        })
    }

    /// Destroy success body.
    pub fn destroy_json() -> Value {
        json!({"result": "ok"})
    }

    /// Cloudinary error body.
    pub fn error_json(message: &str) -> Value {
        json!({"error": {"message": message}})
    }

    /// Admin API rate-limit headers.
    pub fn rate_limit_headers() -> Vec<(&'static str, &'static str)> {
        vec![
            ("X-FeatureRateLimit-Limit", "500"),
            ("X-FeatureRateLimit-Remaining", "499"),
            ("X-FeatureRateLimit-Reset", "Mon, 19 Oct 2026 12:00:00 GMT"),
        ]
    }
}
