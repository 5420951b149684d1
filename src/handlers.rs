use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::address_service::AddressService;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::AddressResponse;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Service resolving CEPs through the outbound pipeline.
    pub address_service: AddressService,
}

/// Health check endpoint.
///
/// Returns the service status, name, and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-cep-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/address/cep/:cep
///
/// Resolves a Brazilian postal code to an address. The CEP is an opaque path
/// string; no format validation happens here, the upstream is authoritative.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cep` - The postal code to resolve.
///
/// # Returns
///
/// * `Result<Json<AddressResponse>, AppError>` - The resolved address, or an
///   error translated at the boundary into a `{message, traceId}` body.
pub async fn get_address_by_cep(
    State(state): State<Arc<AppState>>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, AppError> {
    tracing::info!("GET /api/address/cep/{}", cep);

    let address = state.address_service.get_address_by_cep(&cep).await?;

    Ok(Json(address))
}

/// Builds the application router with the full middleware stack.
///
/// The trace-id middleware sits outside the panic boundary, so even the
/// panic responder reports the inbound request's trace id.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/address/cep/:cep", get(get_address_by_cep))
        .with_state(state)
        .layer(CatchPanicLayer::custom(crate::errors::handle_panic))
        .layer(middleware::from_fn(crate::request_trace::propagate_trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
