//! Admin API: resource listing, lookup and bulk delete.

use crate::client::executor::RequestExecutor;
use crate::error::CloudinaryError;
use crate::transport::HttpResponse;
use crate::types::{
    DeleteOptions, DeleteResponse, DeliveryType, Resource, ResourceLookupOptions, ResourceOptions,
    ResourceResponse,
    ResourceType,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

const RATE_LIMIT_HEADER: &str = "x-featureratelimit-limit";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-featureratelimit-remaining";
const RATE_LIMIT_RESET_HEADER: &str = "x-featureratelimit-reset";

/// Public ids keep `/`, `-`, `_` and `.` unescaped in Admin API paths.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.');

/// Service for the Basic-auth Admin API.
#[derive(Debug)]
pub struct AdminService {
    executor: Arc<RequestExecutor>,
}

impl AdminService {
    /// Create a new admin service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// List one page of resources.
    ///
    /// `next_cursor` is returned as received; callers request the next
    /// page themselves.
    pub async fn resources(
        &self,
        options: Option<ResourceOptions>,
    ) -> Result<ResourceResponse, CloudinaryError> {
        let options = options.unwrap_or_default();
        let resource_type = options.resource_type.unwrap_or(ResourceType::Image);

        let path = match options.delivery_type {
            Some(delivery_type) => format!("resources/{}/{}", resource_type, delivery_type),
            None => format!("resources/{}", resource_type),
        };

        let response = self.executor.admin("GET", &path, &options.to_query()).await?;
        let mut page: ResourceResponse = RequestExecutor::parse(&response)?;
        apply_rate_limits(&mut page, &response);
        Ok(page)
    }

    /// Look up a single resource.
    pub async fn resource(
        &self,
        public_id: &str,
        options: Option<ResourceLookupOptions>,
    ) -> Result<Resource, CloudinaryError> {
        let options = options.unwrap_or_default();
        let resource_type = options.resource_type.unwrap_or(ResourceType::Image);
        let delivery_type = options.delivery_type.unwrap_or(DeliveryType::Upload);

        let path = format!(
            "resources/{}/{}/{}",
            resource_type,
            delivery_type,
            utf8_percent_encode(public_id, PATH_SEGMENT)
        );

        let response = self.executor.admin("GET", &path, &options.to_query()).await?;
        RequestExecutor::parse(&response)
    }

    /// Delete several resources by public id.
    pub async fn delete_resources(
        &self,
        public_ids: &[&str],
        options: Option<DeleteOptions>,
    ) -> Result<DeleteResponse, CloudinaryError> {
        let options = options.unwrap_or_default();
        let resource_type = options.resource_type.unwrap_or(ResourceType::Image);
        let delivery_type = options.delivery_type.unwrap_or(DeliveryType::Upload);
        let path = format!("resources/{}/{}", resource_type, delivery_type);

        let mut query: Vec<(String, String)> = public_ids
            .iter()
            .map(|id| ("public_ids[]".to_string(), id.to_string()))
            .collect();
        query.extend(options.to_params().into_iter().filter(|(k, _)| k != "type"));

        let response = self.executor.admin("DELETE", &path, &query).await?;
        RequestExecutor::parse(&response)
    }
}

fn apply_rate_limits(page: &mut ResourceResponse, response: &HttpResponse) {
    page.rate_limit_allowed = response.header_u64(RATE_LIMIT_HEADER);
    page.rate_limit_remaining = response.header_u64(RATE_LIMIT_REMAINING_HEADER);
    page.rate_limit_reset_at = response.get_header(RATE_LIMIT_RESET_HEADER).map(String::from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};
    use crate::types::Direction;

    fn admin(transport: Arc<MockTransport>) -> AdminService {
        let config = Arc::new(TestFixtures::config());
        AdminService::new(Arc::new(RequestExecutor::new(config, transport)))
    }

    #[tokio::test]
    async fn test_resources_single_page_with_rate_limits() {
        let mut response = MockResponse::ok_json(TestFixtures::resources_json(Some("cursor-2")));
        for (name, value) in TestFixtures::rate_limit_headers() {
            response = response.with_header(name, value);
        }
        let transport = Arc::new(MockTransport::with_responses(vec![response]));
        let service = admin(transport.clone());

        let options = ResourceOptions::new()
            .delivery_type(DeliveryType::Upload)
            .prefix("products/")
            .max_results(2)
            .direction(Direction::Desc);
        let page = service.resources(Some(options)).await.unwrap();

        assert_eq!(page.resources.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
        assert_eq!(page.rate_limit_allowed, Some(500));
        assert_eq!(page.rate_limit_remaining, Some(499));
        assert_eq!(page.rate_limit_reset_at.as_deref(), Some("Mon, 19 Oct 2026 12:00:00 GMT"));
        assert_eq!(transport.request_count(), 1);

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url,
            concat!(
                "https://api.cloudinary.com/v1_1/demo/resources/image/upload",
                "?prefix=products%2F&max_results=2&direction=desc"
            )
        );
    }

    #[tokio::test]
    async fn test_resource_lookup_path() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
            TestFixtures::resource_json("products/shoe"),
        )));
        let service = admin(transport.clone());

        let resource = service
            .resource("products/shoe", Some(ResourceLookupOptions::new().faces(true)))
            .await
            .unwrap();

        assert_eq!(resource.public_id, "products/shoe");
        assert_eq!(resource.width, Some(640));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.cloudinary.com/v1_1/demo/resources/image/upload/products/shoe?faces=true"
        );
    }

    #[tokio::test]
    async fn test_delete_resources() {
        let body = serde_json::json!({
            "deleted": {"a": "deleted", "b": "not_found"},
            "partial": false
        });
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(body)));
        let service = admin(transport.clone());

        let response = service.delete_resources(&["a", "b"], None).await.unwrap();

        assert_eq!(response.deleted.len(), 2);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, "DELETE");
        assert_eq!(
            request.url,
            concat!(
                "https://api.cloudinary.com/v1_1/demo/resources/image/upload",
                "?public_ids%5B%5D=a&public_ids%5B%5D=b"
            )
        );
    }
}
