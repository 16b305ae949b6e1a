//! Axum-based HTTP server for the appointment parser.
//!
//! This module sets up the HTTP server, wires the `/parse/` extraction
//! endpoint to the Gemini client, and exposes health and metrics routes.
//!
//! # Components
//!
//! - `handlers`: Endpoint implementations (parse, health, metrics).
//! - `middleware`: Request ID tracking.
//! - `routes`: The router configuration and shared state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthCheck, HealthResponse, PARSE_ENDPOINT};
pub use routes::{create_router, AppState};
