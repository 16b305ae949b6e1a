// Gemini API client (API-key authenticated)
// Author: kelexine (https://github.com/kelexine)

use crate::config::{ApiKey, GeminiConfig, API_KEY_ENV};
use crate::error::{Result, SchedulerError};
use crate::metrics;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the public Gemini Generative Language API.
///
/// Built once at startup and shared read-only between requests. Each call is
/// a single `generateContent` round trip: no retries, no streaming.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: ApiKey,
    sanitize_logs: bool,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// Fails if no API key is configured. No timeout of any kind is set
    /// unless `timeout_seconds` is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                SchedulerError::Config(format!(
                    "no Gemini API key configured; set {} or gemini.api_key",
                    API_KEY_ENV
                ))
            })?;

        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls();

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http_client = builder
            .build()
            .map_err(|e| SchedulerError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
            sanitize_logs: true,
        })
    }

    /// Toggle redaction of secrets in logged upstream bodies.
    pub fn with_log_sanitizing(mut self, enabled: bool) -> Self {
        self.sanitize_logs = enabled;
        self
    }

    /// Model used for every call
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn scrub(&self, text: &str) -> String {
        if self.sanitize_logs {
            sanitize(text)
        } else {
            text.to_string()
        }
    }

    /// Call Gemini `generateContent` API.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint();
        let model = self.config.model.as_str();
        debug!("Calling generateContent API for model: {}", model);

        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_gemini_call(model, "transport_error", start.elapsed().as_secs_f64());
                SchedulerError::from(e)
            })?;

        let status = response.status();
        let response_text = response.text().await?;

        metrics::record_gemini_call(model, status.as_str(), start.elapsed().as_secs_f64());

        if !status.is_success() {
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                self.scrub(&response_text)
            );
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            return Err(SchedulerError::GeminiApi(format!("HTTP {}: {}", status, message)));
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            self.scrub(&response_text.chars().take(500).collect::<String>())
        );

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .inspect_err(|e| error!("Failed to parse Gemini response: {}", e))?;

        if let Some(usage) = &gemini_response.usage_metadata {
            metrics::record_tokens(
                model,
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
            );
        }

        Ok(gemini_response)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }
}
