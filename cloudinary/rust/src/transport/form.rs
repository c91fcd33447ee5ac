//! Request body encoders: url-encoded forms and multipart/form-data.

use bytes::{BufMut, Bytes, BytesMut};

/// Encode parameters as `application/x-www-form-urlencoded`.
pub fn encode_form(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// Encode parameters as a query string (same encoding as forms).
pub fn encode_query(params: &[(String, String)]) -> String {
    encode_form(params)
}

struct FilePart {
    name: String,
    filename: String,
    content_type: String,
    content: Bytes,
}

/// A `multipart/form-data` body.
pub struct MultipartForm {
    boundary: String,
    fields: Vec<(String, String)>,
    file: Option<FilePart>,
}

impl MultipartForm {
    /// Creates an empty form with a random boundary.
    pub fn new() -> Self {
        Self {
            boundary: format!("----cloudinary-{}", uuid::Uuid::new_v4().simple()),
            fields: Vec::new(),
            file: None,
        }
    }

    /// Adds a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds every parameter as a text field.
    pub fn texts(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.fields.extend(params);
        self
    }

    /// Sets the file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        self.file = Some(FilePart {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        });
        self
    }

    /// The boundary string.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value.
    pub fn content_type_header(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serializes the form.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for (name, value) in &self.fields {
            buf.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
            buf.put_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            );
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }

        if let Some(file) = &self.file {
            buf.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
            buf.put_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    file.name,
                    file.filename.replace('"', "")
                )
                .as_bytes(),
            );
            buf.put_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
            buf.put_slice(&file.content);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf.freeze()
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_form() {
        let params = vec![
            ("public_id".to_string(), "folder/my image".to_string()),
            ("tags".to_string(), "a,b".to_string()),
        ];
        assert_eq!(encode_form(&params), "public_id=folder%2Fmy+image&tags=a%2Cb");
    }

    #[test]
    fn test_multipart_layout() {
        let form = MultipartForm::new()
            .text("timestamp", "1700000000")
            .file("file", "cat.png", "image/png", Bytes::from_static(b"PNGDATA"));

        let body = String::from_utf8_lossy(&form.to_bytes()).into_owned();
        let boundary = form.boundary().to_string();

        assert!(form.content_type_header().ends_with(&boundary));
        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.contains("name=\"timestamp\"\r\n\r\n1700000000\r\n"));
        assert!(body.contains("name=\"file\"; filename=\"cat.png\""));
        assert!(body.contains("Content-Type: image/png\r\n\r\nPNGDATA\r\n"));
        assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
    }

    #[test]
    fn test_boundaries_are_unique() {
        assert_ne!(MultipartForm::new().boundary(), MultipartForm::new().boundary());
    }
}
