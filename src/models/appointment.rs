//! Inbound request and outbound result types for appointment extraction.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{Result, SchedulerError};
use crate::vision::ImageUpload;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MISSING_INPUT_MESSAGE: &str = "Please provide either text or an image.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse the response from the AI model.";

static DATE_SHAPE_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_SHAPE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_date_shape_regex() -> &'static Regex {
    DATE_SHAPE_REGEX.get_or_init(|| Regex::new(r"\A[0-9]{4}-[0-9]{2}-[0-9]{2}\z").expect("Invalid regex pattern"))
}

fn get_time_shape_regex() -> &'static Regex {
    TIME_SHAPE_REGEX.get_or_init(|| Regex::new(r"\A[0-9]{2}:[0-9]{2}\z").expect("Invalid regex pattern"))
}

/// One `/parse/` call: free text, an image, or both.
#[derive(Debug, Clone)]
pub struct AppointmentRequest {
    text: Option<String>,
    image: Option<ImageUpload>,
}

impl AppointmentRequest {
    /// Build a request, rejecting the case where neither input is present.
    /// Empty text counts as absent.
    pub fn new(text: Option<String>, image: Option<ImageUpload>) -> Result<Self> {
        let text = text.filter(|t| !t.is_empty());
        if text.is_none() && image.is_none() {
            return Err(SchedulerError::InvalidRequest(
                MISSING_INPUT_MESSAGE.to_string(),
            ));
        }
        Ok(Self { text, image })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }
}

/// Structured answer returned to the caller, tagged on `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AppointmentResult {
    /// The model had too little to go on.
    NeedsClarification { message: String },

    Ok { appointment: Appointment },

    /// The model answered with something that is not one of the shapes above.
    Error {
        message: String,
        raw_response: String,
    },
}

/// Normalized appointment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    pub department: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub tz: String,
}

impl Appointment {
    /// Check that date and time follow the normalized formats.
    ///
    /// Shape is checked before chrono, whose `%Y`/`%m`/`%H` accept unpadded
    /// and space-padded fields.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !get_date_shape_regex().is_match(&self.date) {
            return Err(format!("invalid date {:?}: expected YYYY-MM-DD", self.date));
        }
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| format!("invalid date {:?}: {}", self.date, e))?;
        if !get_time_shape_regex().is_match(&self.time) {
            return Err(format!("invalid time {:?}: expected HH:MM", self.time));
        }
        chrono::NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|e| format!("invalid time {:?}: {}", self.time, e))?;
        Ok(())
    }
}

impl AppointmentResult {
    pub fn parse_failure(raw_response: impl Into<String>) -> Self {
        AppointmentResult::Error {
            message: PARSE_FAILURE_MESSAGE.to_string(),
            raw_response: raw_response.into(),
        }
    }

    /// Label used for the parse outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            AppointmentResult::NeedsClarification { .. } => "needs_clarification",
            AppointmentResult::Ok { .. } => "ok",
            AppointmentResult::Error { .. } => "error",
        }
    }
}
