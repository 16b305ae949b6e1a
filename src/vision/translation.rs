// Vision translation logic
// Author: kelexine (https://github.com/kelexine)

use super::models::ImageUpload;
use crate::models::gemini::InlineData;
use base64::Engine;

/// Encoded form of an uploaded image, ready to be placed in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub media_type: String,
    pub base64: String,
}

/// Base64-encode an upload, keeping its declared media type.
pub fn encode_image(upload: &ImageUpload) -> EncodedImage {
    EncodedImage {
        media_type: upload.media_type().to_string(),
        base64: base64::engine::general_purpose::STANDARD.encode(upload.data()),
    }
}

/// Gemini expects base64 data as-is (no `data:` prefix) next to its MIME type.
pub fn to_inline_data(image: &EncodedImage) -> InlineData {
    InlineData {
        mime_type: image.media_type.clone(),
        data: image.base64.clone(),
    }
}
