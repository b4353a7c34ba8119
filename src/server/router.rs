//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates OpenAPI documentation
//! using utoipa. All API endpoints are registered here with their OpenAPI specifications,
//! and Swagger UI is configured to provide interactive API documentation at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// Constructs an Axum router with all chart generation and chart reading endpoints
/// registered. Each endpoint is annotated with OpenAPI specifications via utoipa, which
/// are collected into a unified OpenAPI document. The router includes Swagger UI at
/// `/api/docs` for interactive API exploration and testing.
///
/// # Registered Endpoints
/// - `POST /api/groups/{group_id}/charts/generate` - Start chart generation for a group
/// - `GET /api/groups/{group_id}/charts/status` - Get the generation status of a group
/// - `GET /api/groups/{group_id}/charts/latest` - Get a group's most recent weekly charts
/// - `GET /api/groups/{group_id}/charts` - Get a group's charts for a specific week
/// - `GET /api/groups/{group_id}/contributions` - Get the contribution leaderboard of a group
/// - `GET /api/groups/{group_id}/records` - Get the listening records of a group
/// - `POST /api/groups/{group_id}/stats/rebuild` - Rebuild a group's derived statistics
///
/// # OpenAPI Documentation
/// The OpenAPI specification is available at `/api/docs/openapi.json`; Swagger UI is
/// served at `/api/docs`.
///
/// # Returns
/// An Axum `Router<AppState>` configured with all routes, ready to be merged into the
/// main application router.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Chorus", description = "Chorus API"), tags(
        (name = controller::chart::CHART_TAG, description = "Group chart API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::chart::generate_charts))
        .routes(routes!(controller::chart::get_generation_status))
        .routes(routes!(controller::chart::get_latest_charts))
        .routes(routes!(controller::chart::get_week_charts))
        .routes(routes!(controller::chart::get_contributions))
        .routes(routes!(controller::chart::get_records))
        .routes(routes!(controller::chart::rebuild_stats))
        .split_for_parts();

    let routes = routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api));

    routes
}
