// Vision models and upload validation
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, SchedulerError};
use bytes::Bytes;

pub const INVALID_FILE_TYPE_MESSAGE: &str = "Invalid file type. Please upload an image.";

/// An uploaded image with its declared media type.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    media_type: String,
    data: Bytes,
    file_name: Option<String>,
}

impl ImageUpload {
    /// Accept an upload only if its declared content type is `image/*` and
    /// it fits within `max_bytes`.
    pub fn new(
        content_type: Option<&str>,
        data: Bytes,
        file_name: Option<String>,
        max_bytes: usize,
    ) -> Result<Self> {
        let media_type = content_type
            .filter(|ct| is_image_media_type(ct))
            .ok_or_else(|| SchedulerError::InvalidRequest(INVALID_FILE_TYPE_MESSAGE.to_string()))?;

        validate_image_size(data.len(), max_bytes).map_err(SchedulerError::InvalidRequest)?;

        Ok(Self {
            media_type: media_type.to_string(),
            data,
            file_name,
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

/// Whether a declared content type names an image.
pub fn is_image_media_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Validate image data size
pub fn validate_image_size(data_len: usize, max_bytes: usize) -> std::result::Result<(), String> {
    if data_len > max_bytes {
        return Err(format!(
            "Image size {} bytes exceeds maximum of {} bytes",
            data_len, max_bytes
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    #[test]
    fn test_image_content_types() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("IMAGE/JPEG"));
        assert!(is_image_media_type("image/heic"));
        assert!(!is_image_media_type("application/pdf"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("image"));
        assert!(!is_image_media_type(""));
    }

    #[test]
    fn test_non_image_upload_rejected() {
        let err = ImageUpload::new(
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.7"),
            Some("scan.pdf".to_string()),
            LIMIT,
        )
        .unwrap_err();

        assert!(matches!(err, SchedulerError::InvalidRequest(_)));
        assert_eq!(err.to_string(), INVALID_FILE_TYPE_MESSAGE);
    }

    #[test]
    fn test_missing_content_type_rejected() {
        let result = ImageUpload::new(None, Bytes::from_static(b"\x89PNG"), None, LIMIT);
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let data = Bytes::from(vec![0u8; LIMIT + 1]);
        let err = ImageUpload::new(Some("image/png"), data, None, LIMIT).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_valid_upload_keeps_metadata() {
        let upload = ImageUpload::new(
            Some("image/jpeg"),
            Bytes::from_static(b"\xFF\xD8\xFF\xE0"),
            Some("card.jpg".to_string()),
            LIMIT,
        )
        .unwrap();

        assert_eq!(upload.media_type(), "image/jpeg");
        assert_eq!(upload.data(), b"\xFF\xD8\xFF\xE0");
        assert_eq!(upload.file_name(), Some("card.jpg"));
    }
}
