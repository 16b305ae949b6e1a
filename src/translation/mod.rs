// Translation module - prompt ↔ Gemini API translation
// Author: kelexine (https://github.com/kelexine)

pub mod prompt;
pub mod request;
pub mod response;

pub use prompt::{render_instructions, PromptEnvelope, PromptPart};
pub use request::translate_request;
pub use response::{extract_text, parse_model_output, strip_code_fence};
