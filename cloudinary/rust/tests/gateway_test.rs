//! Integration tests for the media gateway over the mock transport.

use cloudinary_media::mocks::{MockResponse, MockTransport, TestFixtures};
use cloudinary_media::types::{
    DeleteOptions, ResourceOptions, TransformationOptions, UploadOptions, UrlOptions,
};
use cloudinary_media::{
    CloudinaryError, CloudinaryService, NetworkError, RequestError, ResourceType,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn gateway(transport: Arc<MockTransport>) -> CloudinaryService {
    CloudinaryService::with_transport(TestFixtures::config(), transport)
}

#[test]
fn test_thumbnail_url_is_built_locally() {
    let transport = Arc::new(MockTransport::new());
    let cloudinary = gateway(transport.clone());

    let options = UrlOptions::with_transformation(
        TransformationOptions::new()
            .width(150)
            .height(150)
            .crop("thumb")
            .gravity("face"),
    );
    let url = cloudinary.url("sample", Some(&options));

    assert!(url.contains("c_thumb,g_face,h_150,w_150"), "{}", url);
    assert!(url.ends_with("/sample"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_returned_unchanged() {
    let transport = Arc::new(MockTransport::failing(
        NetworkError::Timeout {
            duration: Duration::from_secs(30),
        }
        .into(),
    ));
    let cloudinary = gateway(transport.clone());

    let err = cloudinary.upload_from_url("https://example.com/cat.jpg", None).await.unwrap_err();

    match err {
        CloudinaryError::Network(NetworkError::Timeout { duration }) => {
            assert_eq!(duration, Duration::from_secs(30));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_each_operation_passes_transport_errors_through() {
    let transport = Arc::new(MockTransport::new());
    let cloudinary = gateway(transport.clone());
    let failure = || -> CloudinaryError {
        NetworkError::ConnectionFailed {
            message: "connection reset by peer".to_string(),
        }
        .into()
    };

    transport.queue_error(failure());
    let upload = cloudinary.upload(bytes::Bytes::from_static(b"GIF89a"), None).await;
    transport.queue_error(failure());
    let delete = cloudinary.delete("sample", None).await;
    transport.queue_error(failure());
    let list = cloudinary.get_resources(None).await;
    transport.queue_error(failure());
    let lookup = cloudinary.get_resource("sample", None).await;

    for err in [
        upload.unwrap_err(),
        delete.unwrap_err(),
        list.unwrap_err(),
        lookup.unwrap_err(),
    ] {
        assert_eq!(err.to_string(), failure().to_string());
    }
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_api_rejection_carries_remote_body() {
    let body = TestFixtures::error_json("Invalid image file");
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        400,
        body.to_string(),
    )
    .with_header("X-Cld-Error", "Invalid image file")]));
    let cloudinary = gateway(transport);

    let err = cloudinary
        .upload(cloudinary_media::UploadSource::bytes(&b"not an image"[..], "bad.jpg"), None)
        .await
        .unwrap_err();

    match err {
        CloudinaryError::Api(api) => {
            assert_eq!(api.status, 400);
            assert!(api.is_bad_request());
            assert_eq!(api.message, "Invalid image file");
            assert_eq!(api.body, body);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_listing_returns_one_page_with_cursor() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::ok_json(
        TestFixtures::resources_json(Some("8edbc61040178db60b0973ca9494bf3a")),
    )));
    let cloudinary = gateway(transport.clone());

    let page = cloudinary
        .get_resources(Some(ResourceOptions::new().prefix("products/").max_results(2)))
        .await
        .unwrap();

    assert_eq!(page.resources.len(), 2);
    assert_eq!(page.next_cursor.as_deref(), Some("8edbc61040178db60b0973ca9494bf3a"));
    assert_eq!(transport.request_count(), 1);

    let next = cloudinary
        .get_resources(Some(ResourceOptions::new().next_cursor("8edbc61040178db60b0973ca9494bf3a")))
        .await
        .unwrap();
    assert_eq!(next.resources.len(), 2);
    assert_eq!(transport.request_count(), 2);
    assert!(transport
        .last_request()
        .unwrap()
        .url
        .contains("next_cursor=8edbc61040178db60b0973ca9494bf3a"));
}

#[tokio::test]
async fn test_upload_local_file() {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(b"\x89PNG\r\n\x1a\nfake").unwrap();

    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_json(
        TestFixtures::upload_json("pets/cat"),
    )]));
    let cloudinary = gateway(transport.clone());

    let uploaded = cloudinary
        .upload(
            file.path(),
            Some(UploadOptions::new().folder("pets").tags(["cat", "pet"])),
        )
        .await
        .unwrap();

    assert_eq!(uploaded.public_id, "pets/cat");

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "https://api.cloudinary.com/v1_1/demo/image/upload");
    assert!(request
        .get_header("Content-Type")
        .unwrap()
        .starts_with("multipart/form-data; boundary="));

    let body = request.body_text();
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains("name=\"folder\"\r\n\r\npets\r\n"));
    assert!(body.contains("name=\"tags\"\r\n\r\ncat,pet\r\n"));
    assert!(body.contains("name=\"api_key\"\r\n\r\n1234567890\r\n"));
    assert!(body.contains("name=\"signature\""));
}

#[tokio::test]
async fn test_upload_missing_file_makes_no_request() {
    let transport = Arc::new(MockTransport::new());
    let cloudinary = gateway(transport.clone());

    let err = cloudinary
        .upload(std::path::Path::new("/definitely/not/here.jpg"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudinaryError::Request(RequestError::FileRead { .. })));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_delete_video_asset() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_json(
        TestFixtures::destroy_json(),
    )]));
    let cloudinary = gateway(transport.clone());

    let response = cloudinary
        .delete(
            "clips/intro",
            Some(DeleteOptions::new().resource_type(ResourceType::Video).invalidate(true)),
        )
        .await
        .unwrap();

    assert!(response.is_ok());
    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://api.cloudinary.com/v1_1/demo/video/destroy");
    let body = request.body_text();
    assert!(body.contains("public_id=clips%2Fintro"));
    assert!(body.contains("invalidate=true"));
}

#[tokio::test]
async fn test_get_resource_returns_descriptor() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_json(
        TestFixtures::resource_json("sample"),
    )]));
    let cloudinary = gateway(transport.clone());

    let resource = cloudinary.get_resource("sample", None).await.unwrap();

    assert_eq!(resource.public_id, "sample");
    assert_eq!(resource.width, Some(640));
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert!(request.get_header("Authorization").unwrap().starts_with("Basic "));
}
