//! HTTP controller endpoints for the Chorus web API.
//!
//! This module contains Axum handlers for chart generation control and for reading
//! generated charts, contribution leaderboards, and listening records. Controllers
//! handle HTTP requests, validate inputs, interact with services, and return
//! appropriate HTTP responses. They use utoipa for OpenAPI documentation.

pub mod chart;
