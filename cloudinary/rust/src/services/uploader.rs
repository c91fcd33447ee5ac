//! Upload API: upload, upload from URL, destroy.

use crate::client::executor::{FilePart, RequestExecutor};
use crate::config::CloudinaryConfig;
use crate::error::{CloudinaryError, RequestError};
use crate::types::{
    DeleteOptions, DeleteResponse, ResourceType, UploadOptions, UploadResponse, UploadSource,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Service for the signed Upload API.
pub struct UploaderService {
    config: Arc<CloudinaryConfig>,
    executor: Arc<RequestExecutor>,
}

impl UploaderService {
    /// Create a new uploader service.
    pub fn new(config: Arc<CloudinaryConfig>, executor: Arc<RequestExecutor>) -> Self {
        Self { config, executor }
    }

    /// Upload a file, byte buffer or remote URL.
    ///
    /// Local files and byte buffers are sent as multipart form data; remote
    /// URLs are passed as the `file` parameter for the API to fetch.
    pub async fn upload(
        &self,
        source: UploadSource,
        options: Option<UploadOptions>,
    ) -> Result<UploadResponse, CloudinaryError> {
        let options = options.unwrap_or_default();
        let path = upload_path(&options);
        let params = self.upload_params(&options)?;

        let response = match source {
            UploadSource::Remote(url) => {
                debug!(endpoint = %path, "Uploading from remote URL");
                let mut params = params;
                params.push(("file".to_string(), url));
                self.executor.post_signed_form(&path, params).await?
            }
            UploadSource::Bytes { data, filename } => {
                let filename = filename.unwrap_or_else(|| "file".to_string());
                debug!(endpoint = %path, bytes = data.len(), "Uploading buffer");
                let file = FilePart {
                    content_type: content_type_for(&filename),
                    filename,
                    content: data,
                };
                self.executor.post_signed_multipart(&path, params, file).await?
            }
            UploadSource::Path(local) => {
                let file = read_file(&local).await?;
                debug!(endpoint = %path, bytes = file.content.len(), "Uploading local file");
                self.executor.post_signed_multipart(&path, params, file).await?
            }
        };

        RequestExecutor::parse(&response)
    }

    /// Upload from a remote URL.
    pub async fn upload_from_url(
        &self,
        url: &str,
        options: Option<UploadOptions>,
    ) -> Result<UploadResponse, CloudinaryError> {
        self.upload(UploadSource::Remote(url.to_string()), options).await
    }

    /// Delete an asset (`destroy`).
    pub async fn destroy(
        &self,
        public_id: &str,
        options: Option<DeleteOptions>,
    ) -> Result<DeleteResponse, CloudinaryError> {
        let options = options.unwrap_or_default();
        let resource_type = options.resource_type.unwrap_or(ResourceType::Image);
        let path = format!("{}/destroy", resource_type.as_str());

        let mut params = vec![("public_id".to_string(), public_id.to_string())];
        params.extend(options.to_params());

        let response = self.executor.post_signed_form(&path, params).await?;
        RequestExecutor::parse(&response)
    }

    fn upload_params(
        &self,
        options: &UploadOptions,
    ) -> Result<Vec<(String, String)>, CloudinaryError> {
        let mut params = options.to_params()?;
        if options.upload_preset.is_none() {
            if let Some(preset) = &self.config.upload_preset {
                params.push(("upload_preset".to_string(), preset.clone()));
            }
        }
        Ok(params)
    }
}

impl std::fmt::Debug for UploaderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderService")
            .field("cloud_name", &self.config.cloud_name)
            .finish_non_exhaustive()
    }
}

fn upload_path(options: &UploadOptions) -> String {
    let resource_type = options.resource_type.unwrap_or(ResourceType::Image);
    format!("{}/upload", resource_type.as_str())
}

fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

async fn read_file(path: &Path) -> Result<FilePart, CloudinaryError> {
    let content = tokio::fs::read(path).await.map_err(|source| RequestError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    Ok(FilePart {
        content_type: content_type_for(&filename),
        filename,
        content: content.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn uploader(transport: Arc<MockTransport>, config: CloudinaryConfig) -> UploaderService {
        let config = Arc::new(config);
        let executor = Arc::new(RequestExecutor::new(config.clone(), transport));
        UploaderService::new(config, executor)
    }

    #[tokio::test]
    async fn test_remote_upload_is_form_encoded() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
            TestFixtures::upload_json("remote"),
        )));
        let service = uploader(transport.clone(), TestFixtures::config());

        let response = service
            .upload_from_url("https://example.com/cat.jpg", None)
            .await
            .unwrap();

        assert_eq!(response.public_id, "remote");
        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.cloudinary.com/v1_1/demo/image/upload");
        assert_eq!(
            request.get_header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert!(request.body_text().contains("file=https%3A%2F%2Fexample.com%2Fcat.jpg"));
    }

    #[tokio::test]
    async fn test_buffer_upload_is_multipart() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
            TestFixtures::upload_json("buffer"),
        )));
        let service = uploader(transport.clone(), TestFixtures::config());

        let options = UploadOptions::new().resource_type(ResourceType::Image).public_id("buffer");
        service
            .upload(UploadSource::bytes(vec![0x89, 0x50, 0x4e, 0x47], "pixel.png"), Some(options))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.cloudinary.com/v1_1/demo/image/upload");
        assert!(request
            .get_header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        let body = request.body_text();
        assert!(body.contains("filename=\"pixel.png\""));
        assert!(body.contains("Content-Type: image/png"));
        assert!(body.contains("name=\"public_id\"\r\n\r\nbuffer\r\n"));
        assert!(!body.contains("name=\"resource_type\""));
    }

    #[tokio::test]
    async fn test_configured_preset_is_applied() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
            TestFixtures::upload_json("x"),
        )));
        let config = TestFixtures::options().with_upload_preset("team_default").resolve();
        let service = uploader(transport.clone(), config);

        service.upload_from_url("https://example.com/x.jpg", None).await.unwrap();
        assert!(transport
            .last_request()
            .unwrap()
            .body_text()
            .contains("upload_preset=team_default"));

        let options = UploadOptions::new().upload_preset("override");
        service
            .upload_from_url("https://example.com/x.jpg", Some(options))
            .await
            .unwrap();
        let body = transport.last_request().unwrap().body_text();
        assert!(body.contains("upload_preset=override"));
        assert!(!body.contains("team_default"));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let transport = Arc::new(MockTransport::new());
        let service = uploader(transport.clone(), TestFixtures::config());

        let err = service
            .upload(UploadSource::from("/definitely/not/here.png"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CloudinaryError::Request(RequestError::FileRead { .. })));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_destroy() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
            TestFixtures::destroy_json(),
        )));
        let service = uploader(transport.clone(), TestFixtures::config());

        let options = DeleteOptions::new().resource_type(ResourceType::Video).invalidate(true);
        let response = service.destroy("clips/intro", Some(options)).await.unwrap();

        assert!(response.is_ok());
        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.cloudinary.com/v1_1/demo/video/destroy");
        let body = request.body_text();
        assert!(body.contains("public_id=clips%2Fintro"));
        assert!(body.contains("invalidate=true"));
    }
}
