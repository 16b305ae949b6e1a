// Prompt construction for appointment extraction
// Author: kelexine (https://github.com/kelexine)

use crate::models::AppointmentRequest;
use crate::vision::{encode_image, EncodedImage};
use chrono::NaiveDate;

/// Instruction block sent ahead of the user's input. `{current_date}` and
/// `{timezone}` are substituted per request.
pub const INSTRUCTION_TEMPLATE: &str = r#"
You are an intelligent scheduling assistant. Extract, normalize, and structure appointment information from the user's request.

**Current Context:**
- Today's Date: {current_date}
- Timezone: {timezone}

**Instructions:**
1. Analyze the user's text and/or image content. If an image is provided, perform OCR on it first.
2. Identify the appointment topic/department, the date, and the time.
3. Normalize the date to "YYYY-MM-DD" and the time to "HH:MM" (24-hour), resolving relative expressions against the current context.
4. Your entire output MUST be a single, valid JSON object and nothing else.

**Guardrail:**
- If the request is ambiguous or key information (topic, date, time) is missing, return exactly this JSON object:
  {"status": "needs_clarification", "message": "Ambiguous or missing information."}

**Success Output Structure:**
- If the information is clear, the JSON object must follow this exact structure:
  {
    "appointment": {
      "department": "Standardized Department Name",
      "date": "YYYY-MM-DD",
      "time": "HH:MM",
      "tz": "{timezone}"
    },
    "status": "ok"
  }
"#;

/// Render the instruction block for a given day and timezone label.
pub fn render_instructions(current_date: NaiveDate, timezone: &str) -> String {
    INSTRUCTION_TEMPLATE
        .replace("{current_date}", &current_date.format("%Y-%m-%d").to_string())
        .replace("{timezone}", timezone)
}

/// One part of the outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Instructions(String),
    UserText(String),
    Image(EncodedImage),
}

/// Ordered message parts: instructions, then user text, then image.
#[derive(Debug, Clone)]
pub struct PromptEnvelope {
    parts: Vec<PromptPart>,
}

impl PromptEnvelope {
    pub fn build(request: &AppointmentRequest, current_date: NaiveDate, timezone: &str) -> Self {
        let mut parts = vec![PromptPart::Instructions(render_instructions(
            current_date,
            timezone,
        ))];

        if let Some(text) = request.text() {
            parts.push(PromptPart::UserText(format!("User's request: '{}'", text)));
        }

        if let Some(upload) = request.image() {
            parts.push(PromptPart::Image(encode_image(upload)));
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    pub fn has_image(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, PromptPart::Image(_)))
    }
}
