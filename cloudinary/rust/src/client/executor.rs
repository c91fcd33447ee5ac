//! Request executor: credentials, one transport round trip, error mapping.

use crate::config::CloudinaryConfig;
use crate::error::{map_api_error, CloudinaryError, RequestError, ResponseError, CLD_ERROR_HEADER};
use crate::signing::RequestSigner;
use crate::transport::{
    encode_form, encode_query, HttpRequest, HttpResponse, HttpTransport, MultipartForm,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Sends requests to the Cloudinary API.
///
/// Upload API calls are signed with the account secret; Admin API calls
/// use HTTP Basic auth. Every call is a single transport round trip.
pub struct RequestExecutor {
    config: Arc<CloudinaryConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: RequestSigner,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(config: Arc<CloudinaryConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = RequestSigner::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.signature_algorithm,
        );

        Self {
            config,
            transport,
            signer,
        }
    }

    /// The signer bound to the account credentials.
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Builds the absolute URL for an account-scoped path.
    pub fn endpoint(&self, path: &str) -> Result<String, CloudinaryError> {
        let url = self.config.api_url(path);
        Url::parse(&url).map_err(|e| RequestError::InvalidUrl {
            message: format!("{}: {}", url, e),
        })?;
        Ok(url)
    }

    /// Signs `params` and posts them as a url-encoded form.
    pub async fn post_signed_form(
        &self,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<HttpResponse, CloudinaryError> {
        self.signer.sign(&mut params);

        let request = HttpRequest::new("POST", self.endpoint(path)?)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(encode_form(&params));

        self.send(request).await
    }

    /// Signs `params` and posts them with a file part as multipart form data.
    pub async fn post_signed_multipart(
        &self,
        path: &str,
        mut params: Vec<(String, String)>,
        file: FilePart,
    ) -> Result<HttpResponse, CloudinaryError> {
        self.signer.sign(&mut params);

        let form = MultipartForm::new()
            .texts(params)
            .file("file", file.filename, file.content_type, file.content);

        let request = HttpRequest::new("POST", self.endpoint(path)?)
            .with_header("Content-Type", form.content_type_header())
            .with_body(form.to_bytes());

        self.send(request).await
    }

    /// Admin API call with Basic auth and query parameters.
    pub async fn admin(
        &self,
        method: &str,
        path: &str,
        query: &[(String, String)],
    ) -> Result<HttpResponse, CloudinaryError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(query));
        }

        let request =
            HttpRequest::new(method, url).with_header("Authorization", self.signer.basic_auth());

        self.send(request).await
    }

    /// Sends a request and maps non-2xx responses to [`CloudinaryError::Api`].
    ///
    /// Transport errors are returned unchanged.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CloudinaryError> {
        let request = request.with_header("User-Agent", self.config.user_agent.clone());
        let method = request.method.clone();
        let endpoint = request.url.split('?').next().unwrap_or_default().to_string();

        debug!(method = %method, endpoint = %endpoint, "Cloudinary request");

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let error = map_api_error(
                response.status,
                response.get_header(CLD_ERROR_HEADER),
                &response.body,
            );
            warn!(
                method = %method,
                endpoint = %endpoint,
                status = error.status,
                message = %error.message,
                "Cloudinary request rejected"
            );
            return Err(CloudinaryError::Api(error));
        }

        Ok(response)
    }

    /// Deserializes a successful response body.
    pub fn parse<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, CloudinaryError> {
        serde_json::from_slice(&response.body).map_err(|e| {
            CloudinaryError::Response(ResponseError::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&response.body).into_owned(),
            })
        })
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("cloud_name", &self.config.cloud_name)
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}

/// File content for a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// File name reported to the API.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Content.
    pub content: bytes::Bytes,
}
