//! Delivery URL tables.

use cloudinary_media::config::CloudinaryOptions;
use cloudinary_media::mocks::{MockTransport, TestFixtures};
use cloudinary_media::types::{DeliveryType, TransformationOptions, UrlOptions};
use cloudinary_media::{CloudinaryService, ResourceType};
use std::sync::Arc;
use test_case::test_case;

fn gateway(options: CloudinaryOptions) -> CloudinaryService {
    CloudinaryService::with_transport(options.resolve(), Arc::new(MockTransport::new()))
}

#[test_case(TransformationOptions::new().width(300), "w_300" ; "width only")]
#[test_case(
    TransformationOptions::new().width(150).height(150).crop("thumb").gravity("face"),
    "c_thumb,g_face,h_150,w_150" ;
    "thumbnail"
)]
#[test_case(
    TransformationOptions::new().width(200).height(100), "h_100,w_200" ; "size without crop"
)]
#[test_case(
    TransformationOptions::new().effect("sepia").radius("max"),
    "e_sepia,r_max" ;
    "effect and radius"
)]
#[test_case(
    TransformationOptions::new().quality("auto").fetch_format("auto"),
    "f_auto,q_auto" ;
    "automatic quality and format"
)]
#[test_case(TransformationOptions::new().start_offset(2).end_offset(5), "eo_5,so_2" ; "video trim")]
#[test_case(
    TransformationOptions::new().named("profile_card"), "t_profile_card" ; "named transformation"
)]
#[test_case(
    TransformationOptions::new().width(100).raw_transformation("e_grayscale"),
    "w_100,e_grayscale" ;
    "raw appended last"
)]
fn test_transformation_component(transformation: TransformationOptions, expected: &str) {
    let cloudinary = gateway(TestFixtures::options());
    let url = cloudinary.url("sample", Some(&UrlOptions::with_transformation(transformation)));

    assert_eq!(url, format!("https://res.cloudinary.com/demo/image/upload/{}/sample", expected));
}

#[test]
fn test_long_form_wins_over_shorthand() {
    let mut transformation = TransformationOptions::new().width(400).crop("fill");
    transformation.w = Some(100.into());
    transformation.c = Some("scale".to_string());
    transformation.g = Some("north".to_string());

    assert_eq!(transformation.to_transformation_string(), "c_fill,g_north,w_400");
}

#[test_case(
    CloudinaryOptions::new("demo", "k", "s"),
    "https://res.cloudinary.com/demo/image/upload/sample" ;
    "shared cdn"
)]
#[test_case(
    CloudinaryOptions::new("acme", "k", "s").with_private_cdn(true),
    "https://acme-res.cloudinary.com/image/upload/sample" ;
    "private cdn"
)]
#[test_case(
    CloudinaryOptions::new("acme", "k", "s").with_secure_distribution("cdn.acme.com"),
    "https://cdn.acme.com/acme/image/upload/sample" ;
    "secure distribution"
)]
#[test_case(
    CloudinaryOptions::new("acme", "k", "s").with_secure(false),
    "http://res.cloudinary.com/acme/image/upload/sample" ;
    "insecure"
)]
#[test_case(
    CloudinaryOptions::new("acme", "k", "s").with_secure(false).with_cname("img.acme.com"),
    "http://img.acme.com/acme/image/upload/sample" ;
    "cname"
)]
fn test_host_selection(options: CloudinaryOptions, expected: &str) {
    assert_eq!(gateway(options).url("sample", None), expected);
}

#[test]
fn test_video_url_with_video_resource_type() {
    let cloudinary = gateway(TestFixtures::options());
    let transformation = TransformationOptions::new().width(640).video_codec("h264");
    let options = UrlOptions::with_transformation(transformation)
        .resource_type(ResourceType::Video)
        .format("mp4");

    assert_eq!(
        cloudinary.video_url("clips/intro", Some(&options)),
        "https://res.cloudinary.com/demo/video/upload/vc_h264,w_640/v1/clips/intro.mp4"
    );
}

#[test]
fn test_video_url_without_options_matches_url() {
    let cloudinary = gateway(TestFixtures::options());
    assert_eq!(cloudinary.video_url("intro", None), cloudinary.url("intro", None));
}

#[test]
fn test_chained_transformations() {
    let cloudinary = gateway(TestFixtures::options());
    let options = UrlOptions::new()
        .chain(TransformationOptions::new().width(500).crop("limit"))
        .chain(TransformationOptions::new().effect("blur:300"));

    assert_eq!(
        cloudinary.url("sample", Some(&options)),
        "https://res.cloudinary.com/demo/image/upload/c_limit,w_500/e_blur:300/sample"
    );
}

#[test]
fn test_signed_url_is_stable() {
    let cloudinary = gateway(TestFixtures::options());
    let options =
        UrlOptions::with_transformation(TransformationOptions::new().width(300)).sign_url(true);

    let first = cloudinary.url("sample", Some(&options));
    let second = cloudinary.url("sample", Some(&options));

    assert_eq!(first, second);
    let signature = first
        .strip_prefix("https://res.cloudinary.com/demo/image/upload/")
        .and_then(|rest| rest.split('/').next())
        .unwrap();
    assert!(signature.starts_with("s--") && signature.ends_with("--"));
    assert_eq!(signature.len(), 13);
}

#[test]
fn test_fetch_delivery() {
    let cloudinary = gateway(TestFixtures::options());
    let options = UrlOptions::new().delivery_type(DeliveryType::Fetch);

    assert_eq!(
        cloudinary.url("https://example.com/dog.jpg", Some(&options)),
        "https://res.cloudinary.com/demo/image/fetch/https://example.com/dog.jpg"
    );
}

#[test_case("my photo?.jpg", "my%20photo%3F.jpg" ; "space and question mark")]
#[test_case("my%20photo", "my%20photo" ; "already escaped")]
#[test_case("a&b+c,d", "a%26b%2Bc%2Cd" ; "reserved separators")]
#[test_case("x;y@z$", "x%3By%40z%24" ; "more reserved characters")]
#[test_case("folder/name:tag", "v1/folder/name:tag" ; "slash and colon kept")]
#[test_case("caf\u{e9}", "caf%C3%A9" ; "non ascii")]
fn test_public_id_escaping(public_id: &str, expected: &str) {
    let cloudinary = gateway(TestFixtures::options());
    assert_eq!(
        cloudinary.url(public_id, None),
        format!("https://res.cloudinary.com/demo/image/upload/{}", expected)
    );
}

#[test]
fn test_whole_number_dpr_keeps_decimal() {
    let cloudinary = gateway(TestFixtures::options());
    let options = UrlOptions::with_transformation(TransformationOptions::new().width(100).dpr(2));

    assert_eq!(
        cloudinary.url("sample", Some(&options)),
        "https://res.cloudinary.com/demo/image/upload/dpr_2.0,w_100/sample"
    );
}
