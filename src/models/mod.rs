//! Data models for the appointment parser.
//!
//! This module contains the type definitions used by:
//! - The inbound `/parse/` request and its structured result (`appointment`)
//! - The upstream Google Gemini API (`gemini`)

// Author: kelexine (https://github.com/kelexine)

pub mod appointment;
pub mod gemini;

pub use appointment::{Appointment, AppointmentRequest, AppointmentResult};
pub use gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part};
