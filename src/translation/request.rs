// Request translation (prompt envelope → Gemini)
// Author: kelexine (https://github.com/kelexine)

use crate::config::GeminiConfig;
use crate::models::gemini::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::translation::prompt::{PromptEnvelope, PromptPart};
use crate::vision::to_inline_data;
use tracing::debug;

/// Translate a prompt envelope into a single-turn Gemini request.
pub fn translate_request(envelope: &PromptEnvelope, config: &GeminiConfig) -> GenerateContentRequest {
    let parts: Vec<Part> = envelope
        .parts()
        .iter()
        .map(|part| match part {
            PromptPart::Instructions(text) | PromptPart::UserText(text) => Part::text(text.clone()),
            PromptPart::Image(image) => Part::InlineData {
                inline_data: to_inline_data(image),
            },
        })
        .collect();

    debug!(
        "Translated request: {} parts, image: {}",
        parts.len(),
        envelope.has_image()
    );

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        generation_config: Some(GenerationConfig {
            temperature: Some(config.temperature),
            response_mime_type: Some(config.response_mime_type.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentRequest;
    use crate::vision::ImageUpload;
    use bytes::Bytes;
    use chrono::NaiveDate;

    #[test]
    fn test_translate_preserves_part_order() {
        let upload = ImageUpload::new(Some("image/webp"), Bytes::from_static(b"RIFF0000WEBP"), None, 1024).unwrap();
        let request = AppointmentRequest::new(Some("cardiology next monday 10am".to_string()), Some(upload)).unwrap();
        let envelope = PromptEnvelope::build(
            &request,
            NaiveDate::from_ymd_opt(2025, 9, 26).unwrap(),
            "Asia/Kolkata",
        );

        let gemini_req = translate_request(&envelope, &GeminiConfig::default());
        assert_eq!(gemini_req.contents.len(), 1);

        let content = &gemini_req.contents[0];
        assert_eq!(content.role, "user");
        assert_eq!(content.parts.len(), 3);
        assert!(content.parts[0].as_answer_text().unwrap().contains("2025-09-26"));
        assert_eq!(
            content.parts[1].as_answer_text(),
            Some("User's request: 'cardiology next monday 10am'")
        );
        match &content.parts[2] {
            Part::InlineData { inline_data } => assert_eq!(inline_data.mime_type, "image/webp"),
            other => panic!("expected inline data, got {:?}", other),
        }
    }

    #[test]
    fn test_generation_config_is_deterministic_json() {
        let request = AppointmentRequest::new(Some("x".to_string()), None).unwrap();
        let envelope = PromptEnvelope::build(
            &request,
            NaiveDate::from_ymd_opt(2025, 9, 26).unwrap(),
            "Asia/Kolkata",
        );

        let gemini_req = translate_request(&envelope, &GeminiConfig::default());
        let config = gemini_req.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
    }
}
