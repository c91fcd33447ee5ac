//! Error types for the Cloudinary integration.
//!
//! Errors are grouped by where they originate. Remote rejections are never
//! reclassified: an [`ApiError`] carries the HTTP status and the response
//! body exactly as Cloudinary returned them.

mod mapping;

pub use mapping::{map_api_error, CloudinaryErrorBody, CLD_ERROR_HEADER};

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the Cloudinary integration.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Module registration errors.
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Local request preparation errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Rejection returned by the Cloudinary API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Response parsing errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl CloudinaryError {
    /// Returns the HTTP status code of a remote rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CloudinaryError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns the remote error message, if the error came from the API.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            CloudinaryError::Api(e) => Some(&e.message),
            _ => None,
        }
    }

    /// Returns true for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, CloudinaryError::Network(_))
    }
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Credentials could not be found where they were requested from.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A `CLOUDINARY_URL` value could not be parsed.
    #[error("Invalid CLOUDINARY_URL: {0}")]
    InvalidCloudinaryUrl(String),

    /// Invalid API base URL.
    #[error("Invalid API base URL '{url}': {details}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Errors raised while the container initializes a module.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The asynchronous options factory failed.
    #[error("options factory failed: {source}")]
    FactoryFailed {
        /// The error produced by the factory, untouched.
        #[source]
        source: anyhow::Error,
    },

    /// A dependency declared in `inject` is not registered in the container.
    #[error("missing dependency '{dependency}' required by the options factory")]
    MissingDependency {
        /// Type name of the missing dependency.
        dependency: &'static str,
    },

    /// A service was requested from the container but never registered.
    #[error("service '{0}' is not registered")]
    NotRegistered(&'static str),
}

/// Local request preparation errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A local file passed as an upload source could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The endpoint URL could not be built.
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        /// Details about the failure.
        message: String,
    },

    /// Options could not be encoded into request parameters.
    #[error("Failed to encode parameter '{name}': {message}")]
    Encoding {
        /// Parameter name.
        name: String,
        /// Details about the failure.
        message: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Connection could not be established or was dropped.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Details about the failure.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout that elapsed.
        duration: Duration,
    },

    /// TLS setup or handshake failure.
    #[error("TLS error: {message}")]
    TlsError {
        /// Details about the failure.
        message: String,
    },
}

/// A rejection returned by the Cloudinary API, carried verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("HTTP {status}: {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the error body or the `X-Cld-Error` header.
    pub message: String,
    /// The response body as returned by the API.
    pub body: serde_json::Value,
}

impl ApiError {
    /// Authentication or signature rejected.
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Rate limit reached.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 420 || self.status == 429
    }

    /// Resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Malformed request rejected by the API.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }
}

/// Response parsing errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A successful response body did not match the expected shape.
    #[error("Failed to deserialize response: {message}")]
    Deserialization {
        /// Parser message.
        message: String,
        /// The raw body.
        body: String,
    },
}
