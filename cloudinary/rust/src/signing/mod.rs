//! Cloudinary request and delivery-URL signatures.
//!
//! Upload API calls carry a `signature` parameter: every other parameter
//! except `file`, `cloud_name`, `resource_type` and `api_key`, sorted by
//! name and joined as `k=v&k=v`, with the API secret appended, hashed and
//! hex encoded. Delivery URLs use the same hash over the path, base64url
//! encoded and cut to eight characters.

use crate::config::SignatureAlgorithm;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Parameters never included in the string to sign.
pub const UNSIGNED_PARAMS: &[&str] =
    &["file", "cloud_name", "resource_type", "api_key", "signature"];

/// Hash `data` with the given algorithm.
pub fn digest(algorithm: SignatureAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        SignatureAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        SignatureAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
    }
}

/// Build the `k=v&k=v` string that is hashed for a request signature.
pub fn string_to_sign(params: &[(String, String)]) -> String {
    let mut signed: Vec<&(String, String)> = params
        .iter()
        .filter(|(k, v)| !v.is_empty() && !UNSIGNED_PARAMS.contains(&k.as_str()))
        .collect();
    signed.sort_by(|a, b| a.0.cmp(&b.0));

    signed
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the hex signature for upload API parameters.
pub fn api_sign_request(
    params: &[(String, String)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let payload = format!("{}{}", string_to_sign(params), api_secret);
    hex::encode(digest(algorithm, payload.as_bytes()))
}

/// Compute the `s--XXXXXXXX--` component for a signed delivery URL.
pub fn url_signature(to_sign: &str, api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let payload = format!("{}{}", to_sign, api_secret);
    let encoded = URL_SAFE_NO_PAD.encode(digest(algorithm, payload.as_bytes()));
    format!("s--{}--", &encoded[..8])
}

/// `Authorization` header value for the Admin API.
pub fn basic_auth(api_key: &str, api_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", api_key, api_secret)))
}

/// Signs upload API parameters with the account credentials.
#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    api_secret: SecretString,
    algorithm: SignatureAlgorithm,
}

impl RequestSigner {
    /// Create a signer.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: SecretString,
        algorithm: SignatureAlgorithm,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            algorithm,
        }
    }

    /// Add `timestamp`, `signature` and `api_key` using the current time.
    pub fn sign(&self, params: &mut Vec<(String, String)>) {
        self.sign_at(params, chrono::Utc::now().timestamp());
    }

    /// Add `timestamp`, `signature` and `api_key` for a fixed timestamp.
    pub fn sign_at(&self, params: &mut Vec<(String, String)>, timestamp: i64) {
        params.retain(|(k, _)| k != "timestamp" && k != "signature" && k != "api_key");
        params.push(("timestamp".to_string(), timestamp.to_string()));

        let signature = api_sign_request(params, self.api_secret.expose_secret(), self.algorithm);
        params.push(("signature".to_string(), signature));
        params.push(("api_key".to_string(), self.api_key.clone()));
    }

    /// `Authorization` header value for the Admin API.
    pub fn basic_auth(&self) -> String {
        basic_auth(&self.api_key, self.api_secret.expose_secret())
    }

    /// Signature component for a delivery URL.
    pub fn url_signature(&self, to_sign: &str) -> String {
        url_signature(to_sign, self.api_secret.expose_secret(), self.algorithm)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &self.api_key)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_string_to_sign_sorts_and_filters() {
        let params = pairs(&[
            ("timestamp", "1315060510"),
            ("public_id", "sample_image"),
            ("file", "https://example.com/a.jpg"),
            ("api_key", "1234"),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ("tags", ""),
        ]);

        assert_eq!(
            string_to_sign(&params),
            "eager=w_400,h_300,c_pad|w_260,h_200,c_crop&public_id=sample_image&timestamp=1315060510"
        );
    }

    #[test]
    fn test_api_sign_request_documented_example() {
        // Example from the Cloudinary signature documentation.
        let params = pairs(&[
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ("public_id", "sample_image"),
            ("timestamp", "1315060510"),
        ]);

        assert_eq!(
            api_sign_request(&params, "abcd", SignatureAlgorithm::Sha1),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_sha256_signature_length() {
        let params = pairs(&[("public_id", "x"), ("timestamp", "1")]);
        assert_eq!(api_sign_request(&params, "s", SignatureAlgorithm::Sha256).len(), 64);
        assert_eq!(api_sign_request(&params, "s", SignatureAlgorithm::Sha1).len(), 40);
    }

    #[test]
    fn test_signer_adds_credentials() {
        let signer =
            RequestSigner::new("1234", SecretString::new("abcd".into()), SignatureAlgorithm::Sha1);
        let mut params = pairs(&[
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ("public_id", "sample_image"),
        ]);

        signer.sign_at(&mut params, 1315060510);

        let get = |name: &str| params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        assert_eq!(get("timestamp"), Some("1315060510"));
        assert_eq!(get("api_key"), Some("1234"));
        assert_eq!(get("signature"), Some("bfd09f95f331f558cbd1320e67aa8d488770583e"));
    }

    #[test]
    fn test_url_signature_shape() {
        let sig = url_signature("w_300/sample.jpg", "secret", SignatureAlgorithm::Sha1);
        assert!(sig.starts_with("s--"));
        assert!(sig.ends_with("--"));
        assert_eq!(sig.len(), 3 + 8 + 2);
        assert!(!sig[3..11].contains('+') && !sig[3..11].contains('/'));
    }

    #[test]
    fn test_basic_auth() {
        assert_eq!(basic_auth("key", "secret"), "Basic a2V5OnNlY3JldA==");
    }
}
