//! Cloudinary service implementations.
//!
//! - Uploader: signed Upload API calls (upload, destroy)
//! - Admin: Basic-auth Admin API calls (listing, lookup, bulk delete)
//! - Url: delivery URL construction, no network access

mod admin;
mod uploader;
mod url_builder;

pub use admin::AdminService;
pub use uploader::UploaderService;
pub use url_builder::UrlBuilder;
