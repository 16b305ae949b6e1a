// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{Result, SchedulerError};
use crate::metrics;
use crate::models::{AppointmentRequest, AppointmentResult};
use crate::translation::{extract_text, parse_model_output, translate_request, PromptEnvelope};
use crate::vision::ImageUpload;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info};

pub const PARSE_ENDPOINT: &str = "/parse/";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Reports static configuration only; never calls the model.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    checks.insert(
        "gemini".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "Model {} at {}",
                state.gemini_client.model(),
                state.gemini_client.base_url()
            ),
        },
    );

    let key_configured = state
        .config
        .gemini
        .api_key
        .as_ref()
        .map_or(false, |key| !key.is_empty());
    checks.insert(
        "api_key".to_string(),
        if key_configured {
            HealthCheck {
                status: "ok".to_string(),
                message: "API key configured".to_string(),
            }
        } else {
            HealthCheck {
                status: "error".to_string(),
                message: "No Gemini API key configured".to_string(),
            }
        },
    );

    checks.insert(
        "scheduling".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "Today is {} ({})",
                chrono::Local::now().format("%Y-%m-%d"),
                state.config.scheduling.timezone
            ),
        },
    );

    let status = if key_configured { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for `POST /parse/`
///
/// Accepts a multipart form with optional `input_text` and `file` fields and
/// answers with an appointment result. Malformed model output is reported
/// in-band with status 200; only bad input (400) and upstream failures (500)
/// produce error statuses.
pub async fn parse_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();

    let response = match parse_appointment(&state, multipart).await {
        Ok(result) => {
            metrics::record_parse_outcome(result.outcome());
            Json(result).into_response()
        }
        Err(e) => {
            if e.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
                error!("Appointment extraction failed: {}", e);
            } else {
                info!("Rejected parse request: {}", e);
            }
            e.into_response()
        }
    };

    metrics::record_request(
        PARSE_ENDPOINT,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

async fn parse_appointment(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<AppointmentResult> {
    // 1. Read and validate the form
    let request = read_form(multipart, state.config.limits.max_image_bytes).await?;

    match request.image() {
        Some(image) => info!(
            "Received parse request: text={}, image={} ({}, {} bytes)",
            request.text().is_some(),
            image.file_name().unwrap_or("unnamed"),
            image.media_type(),
            image.data().len()
        ),
        None => info!(
            "Received parse request: text={}, image=none",
            request.text().is_some()
        ),
    }

    // 2. Build the prompt for today
    let today = chrono::Local::now().date_naive();
    let envelope = PromptEnvelope::build(&request, today, &state.config.scheduling.timezone);
    let gemini_req = translate_request(&envelope, &state.config.gemini);

    // 3. Call Gemini
    let gemini_resp = state.gemini_client.generate_content(&gemini_req).await?;

    // 4. Interpret the answer
    let raw = extract_text(&gemini_resp)?;
    let result = parse_model_output(&raw);

    debug!("Extraction outcome: {}", result.outcome());
    Ok(result)
}

/// Collect `input_text` and `file` from the form. A body that is not
/// multipart at all is treated as an empty form.
async fn read_form(
    multipart: std::result::Result<Multipart, MultipartRejection>,
    max_image_bytes: usize,
) -> Result<AppointmentRequest> {
    let mut text: Option<String> = None;
    let mut upload: Option<(Option<String>, Bytes, Option<String>)> = None;

    match multipart {
        Ok(mut multipart) => {
            while let Some(field) = multipart.next_field().await.map_err(malformed_form)? {
                let name = field.name().map(str::to_string);
                match name.as_deref() {
                    Some("input_text") => {
                        text = Some(field.text().await.map_err(malformed_form)?);
                    }
                    Some("file") => {
                        let content_type = field.content_type().map(str::to_string);
                        let file_name = field.file_name().map(str::to_string);
                        let data = field.bytes().await.map_err(malformed_form)?;

                        // Browsers send an empty part for an untouched file input
                        if data.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                            continue;
                        }
                        upload = Some((content_type, data, file_name));
                    }
                    other => debug!("Ignoring unknown form field: {:?}", other),
                }
            }
        }
        Err(rejection) => {
            debug!("Request is not a multipart form: {}", rejection);
        }
    }

    let image = upload
        .map(|(content_type, data, file_name)| {
            ImageUpload::new(content_type.as_deref(), data, file_name, max_image_bytes)
        })
        .transpose()?;

    AppointmentRequest::new(text, image)
}

fn malformed_form(e: axum::extract::multipart::MultipartError) -> SchedulerError {
    SchedulerError::InvalidRequest(format!("Malformed multipart form: {}", e))
}
