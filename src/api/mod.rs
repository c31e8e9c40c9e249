//! HTTP router for gbp-gateway.
//!
//! - `/`: redirect to the auth URL route
//! - `/google/auth-url`: consent screen URL
//! - `/auth/google/business`: OAuth callback
//! - `/google/...`: accounts, locations, reviews
//! - `/status`: health check

pub mod routes;

use crate::SharedState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
