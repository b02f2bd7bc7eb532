// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! HTTP API layer (Axum).
//!
//! Exposes the storage protocol over three endpoints, keyed by the encoded
//! device key in the path. Everything here is marshaling: decoding the key,
//! splitting the multipart body, and mapping core errors to status codes.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    keys::DeviceKey,
    models::{HealthChecks, HealthResponse, ReadyResponse, StoreProvenanceResponse},
    state::AppState,
};

pub mod attachment;
pub mod health;
pub mod provenance;

/// Decode the device key path segment, or fail the request with a 400.
fn decode_key(text: &str) -> Result<DeviceKey, ApiError> {
    DeviceKey::from_encoded(text)
        .map_err(|_| ApiError::bad_request("malformed device key"))
}

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/provenance/{device_key}",
            get(provenance::list_provenance).post(provenance::store_provenance),
        )
        .route(
            "/attachment/{device_key}/{attachment_id}",
            get(attachment::fetch_attachment),
        )
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        provenance::list_provenance,
        provenance::store_provenance,
        attachment::fetch_attachment,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            StoreProvenanceResponse,
            HealthResponse,
            ReadyResponse,
            HealthChecks
        )
    ),
    tags(
        (name = "Provenance", description = "Encrypted provenance record storage"),
        (name = "Attachments", description = "Encrypted attachment retrieval"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[test]
    fn decode_key_rejects_garbage() {
        assert!(decode_key("///not-base64url///").is_err());
        assert!(decode_key("azE").is_ok()); // "k1"
    }
}
