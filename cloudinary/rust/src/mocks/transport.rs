//! Mock HTTP transport for testing.

use crate::error::{CloudinaryError, NetworkError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Create a successful response with empty body.
    pub fn ok() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a successful JSON response.
    pub fn ok_json(body: serde_json::Value) -> Self {
        Self::ok_with_body(body.to_string()).with_header("content-type", "application/json")
    }

    /// Create an error response.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers to the response.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

enum MockReply {
    Response(MockResponse),
    Error(CloudinaryError),
}

/// Builder for mock transports.
pub struct MockResponseBuilder {
    replies: Vec<MockReply>,
}

impl MockResponseBuilder {
    /// Create a new mock response builder.
    pub fn new() -> Self {
        Self { replies: Vec::new() }
    }

    /// Add a response to return.
    pub fn respond(mut self, response: MockResponse) -> Self {
        self.replies.push(MockReply::Response(response));
        self
    }

    /// Add a transport failure to return.
    pub fn fail(mut self, error: CloudinaryError) -> Self {
        self.replies.push(MockReply::Error(error));
        self
    }

    /// Build the mock transport.
    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }
}

impl Default for MockResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock HTTP transport for testing.
///
/// Replies are consumed in order; once the queue is empty the default
/// response (if any) is returned for every request.
pub struct MockTransport {
    replies: Mutex<Vec<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        MockResponseBuilder::new().build()
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        responses
            .into_iter()
            .fold(MockResponseBuilder::new(), MockResponseBuilder::respond)
            .build()
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Create a mock transport whose first request fails with `error`.
    pub fn failing(error: CloudinaryError) -> Self {
        MockResponseBuilder::new().fail(error).build()
    }

    /// Create a builder for the mock transport.
    pub fn builder() -> MockResponseBuilder {
        MockResponseBuilder::new()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.replies.lock().push(MockReply::Response(response));
    }

    /// Queue a transport failure.
    pub fn queue_error(&self, error: CloudinaryError) {
        self.replies.lock().push(MockReply::Error(error));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CloudinaryError> {
        self.requests.lock().push(request);

        let reply = {
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                self.default_response.clone().map(MockReply::Response)
            } else {
                Some(replies.remove(0))
            }
        };

        match reply {
            Some(MockReply::Response(mock)) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            Some(MockReply::Error(error)) => Err(error),
            None => Err(CloudinaryError::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_replies", &self.replies.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}
