//! Request and response types for Cloudinary operations.

mod admin;
mod common;
mod delivery;
mod transformation;
mod upload;

pub use admin::*;
pub use common::*;
pub use delivery::*;
pub use transformation::*;
pub use upload::{AccessControlRule, EagerResult, UploadOptions, UploadResponse, UploadSource};
