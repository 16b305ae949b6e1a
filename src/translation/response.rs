// Response translation (Gemini → appointment result)
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, SchedulerError};
use crate::models::gemini::GenerateContentResponse;
use crate::models::AppointmentResult;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Lazily initialized regex for a Markdown code fence around the whole answer
static CODE_FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the code fence regex
fn get_code_fence_regex() -> &'static Regex {
    CODE_FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A```[\w-]*\s*(.*?)\s*(?:```)?\z").expect("Invalid regex pattern")
    })
}

/// Pull the answer text out of the first candidate.
///
/// Thought parts are skipped. A candidate with no text yields an empty
/// string, which then fails JSON parsing like any other malformed answer.
pub fn extract_text(gemini_resp: &GenerateContentResponse) -> Result<String> {
    let candidate = match gemini_resp.candidates.first() {
        Some(candidate) => candidate,
        None => {
            let reason = gemini_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref());
            return Err(SchedulerError::GeminiApi(match reason {
                Some(reason) => format!("Prompt blocked by Gemini: {}", reason),
                None => "No candidates in Gemini response".to_string(),
            }));
        }
    };

    debug!("Response finish_reason: {:?}", candidate.finish_reason);

    let text: String = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.as_answer_text())
        .collect();

    Ok(text)
}

/// Trim the answer and remove a surrounding ```` ``` ```` / ```` ```json ```` fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    get_code_fence_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

/// Interpret the model's answer.
///
/// Anything that is not one of the three result shapes, including an `ok`
/// result with a malformed date or time, becomes an `error` result carrying
/// the untouched answer in `raw_response`.
pub fn parse_model_output(raw: &str) -> AppointmentResult {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<AppointmentResult>(cleaned) {
        Ok(AppointmentResult::Ok { appointment }) => match appointment.validate() {
            Ok(()) => AppointmentResult::Ok { appointment },
            Err(reason) => {
                warn!("Model returned a malformed appointment: {}", reason);
                AppointmentResult::parse_failure(raw)
            }
        },
        Ok(result) => result,
        Err(e) => {
            warn!("Failed to parse model output as an appointment result: {}", e);
            AppointmentResult::parse_failure(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::PARSE_FAILURE_MESSAGE;
    use crate::models::Appointment;
    use proptest::prelude::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_strip_json_fence() {
        let fenced = "```json\n{\"status\":\"ok\"}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"status\":\"ok\"}");
    }

    #[test]
    fn test_strip_bare_fence_and_whitespace() {
        assert_eq!(strip_code_fence("  ```\n{}\n```  \n"), "{}");
        assert_eq!(strip_code_fence("```json{}```"), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
    }

    #[test]
    fn test_unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("I don't understand"), "I don't understand");
    }

    #[test]
    fn test_parse_clarification_unchanged() {
        let raw = r#"{"status":"needs_clarification","message":"Ambiguous or missing information."}"#;
        let result = parse_model_output(raw);
        assert_eq!(
            result,
            AppointmentResult::NeedsClarification {
                message: "Ambiguous or missing information.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_fenced_success() {
        let raw = "```json\n{\"status\":\"ok\",\"appointment\":{\"department\":\"Dentistry\",\"date\":\"2025-09-27\",\"time\":\"15:00\",\"tz\":\"Asia/Kolkata\"}}\n```";
        let result = parse_model_output(raw);
        assert_eq!(
            result,
            AppointmentResult::Ok {
                appointment: Appointment {
                    department: "Dentistry".to_string(),
                    date: "2025-09-27".to_string(),
                    time: "15:00".to_string(),
                    tz: "Asia/Kolkata".to_string(),
                }
            }
        );
    }

    #[test]
    fn test_parse_non_json_wraps_raw_text() {
        let result = parse_model_output("I don't understand");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": "error",
                "message": PARSE_FAILURE_MESSAGE,
                "raw_response": "I don't understand"
            })
        );
    }

    #[test]
    fn test_parse_unknown_shape_is_error() {
        let result = parse_model_output(r#"{"answer": 42}"#);
        assert_eq!(result.outcome(), "error");

        let result = parse_model_output(r#"{"status":"ok","appointment":{"department":"ENT","date":"tomorrow","time":"15:00","tz":"Asia/Kolkata"}}"#);
        assert_eq!(result, AppointmentResult::parse_failure(
            r#"{"status":"ok","appointment":{"department":"ENT","date":"tomorrow","time":"15:00","tz":"Asia/Kolkata"}}"#
        ));
    }

    #[test]
    fn test_parse_unpadded_date_or_time_is_error() {
        for (date, time) in [("2025-9-5", "09:30"), ("25-09-05", "09:30"), ("2025-09-05", " 9:30")] {
            let raw = json!({
                "status": "ok",
                "appointment": {"department": "Cardiology", "date": date, "time": time, "tz": "Asia/Kolkata"}
            })
            .to_string();
            let result = parse_model_output(&raw);
            assert_eq!(result, AppointmentResult::parse_failure(raw.as_str()));
        }
    }

    #[test]
    fn test_extract_text_concatenates_answer_parts() {
        let resp = response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "pondering", "thought": true},
                    {"text": "{\"status\":"},
                    {"text": "\"ok\"}"}
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_text(&resp).unwrap(), "{\"status\":\"ok\"}");
    }

    #[test]
    fn test_extract_text_without_content_is_empty() {
        let resp = response(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}));
        assert_eq!(extract_text(&resp).unwrap(), "");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let resp = response(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = extract_text(&resp).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    proptest! {
        #[test]
        fn prop_json_fence_round_trip(body in "[a-zA-Z0-9{}\":, \n]{0,64}") {
            let fenced = format!("```json\n{}\n```", body);
            prop_assert_eq!(strip_code_fence(&fenced), body.trim());
        }

        #[test]
        fn prop_unfenced_text_is_trimmed(body in "[a-zA-Z0-9{}\":, \n]{0,64}") {
            prop_assert_eq!(strip_code_fence(&body), body.trim());
        }
    }
}
