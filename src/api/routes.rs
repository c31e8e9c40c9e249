//! Route handlers for the gbp-gateway service.
//!
//! All handlers receive `SharedState` via Axum state extraction and are
//! otherwise stateless: data endpoints reload the credential document on
//! every request.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::providers::TokenSet;
use crate::SharedState;

const AUTH_URL_ROUTE: &str = "/google/auth-url";

// =============================================================================
// Router
// =============================================================================

pub fn router(state: SharedState) -> Router {
    Router::new()
        // ── Index & Health ───────────────────────────────────────────────
        .route("/", get(root))
        .route("/status", get(status))
        // ── OAuth ────────────────────────────────────────────────────────
        .route(AUTH_URL_ROUTE, get(auth_url))
        .route("/auth/google/business", get(oauth_callback))
        // ── Business Profile ─────────────────────────────────────────────
        .route("/google/accounts", get(accounts))
        .route("/google/locations/{account_id}", get(locations))
        .route("/google/reviews/{account_id}/{location_id}", get(reviews))
        .with_state(state)
}

// =============================================================================
// Index & Health
// =============================================================================

/// GET /: Send the caller to the auth URL route.
async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, AUTH_URL_ROUTE)])
}

async fn status(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gbp-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "auth_state": state.lifecycle.current(),
    }))
}

// =============================================================================
// OAuth Endpoints
// =============================================================================

/// GET /google/auth-url: Google consent screen URL (offline access, forced consent).
async fn auth_url(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let url = state.provider.authorization_url();
    state.lifecycle.authorization_issued();

    Json(json!({ "auth_url": url }))
}

#[derive(Deserialize)]
struct OAuthCallbackQuery {
    code: Option<String>,
    /// Set by Google instead of `code` when the user denies consent.
    error: Option<String>,
}

/// GET /auth/google/business: Exchange the code and persist the tokens.
async fn oauth_callback(
    State(state): State<SharedState>,
    query: Result<Query<OAuthCallbackQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let Query(q) = query.map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))?;

    if let Some(error) = q.error {
        state.lifecycle.exchange_failed();
        return Err(ServiceError::InvalidRequest(format!(
            "authorization denied by Google: {error}"
        )));
    }

    let code = q
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidRequest("missing OAuth authorization code".into()))?;

    let result = async {
        let tokens = state.provider.exchange_code(&code).await?;
        state.store.save(&tokens).await
    }
    .await;

    match result {
        Ok(()) => {
            state.lifecycle.exchange_succeeded();
            info!("OAuth exchange complete, credentials stored");
            Ok(Json(json!({
                "message": "Authentication successful. Tokens saved."
            })))
        }
        Err(e) => {
            state.lifecycle.exchange_failed();
            Err(e)
        }
    }
}

// =============================================================================
// Business Profile Endpoints
// =============================================================================

/// Load the stored tokens or fail with 401 before any remote call.
async fn require_tokens(state: &SharedState) -> Result<TokenSet, ServiceError> {
    let tokens = state.store.load().await?;
    if tokens.is_expired() {
        warn!("Stored access token has expired; re-authorize via {AUTH_URL_ROUTE}");
    }
    Ok(tokens)
}

/// GET /google/accounts: Accounts of the authorized user.
///
/// `account` is the first account's resource name; callers are assumed to
/// manage a single account.
async fn accounts(
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tokens = require_tokens(&state).await?;
    let accounts = state.remote.list_accounts(&tokens).await?;

    let account = accounts
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();
    info!("Account: {account}");

    Ok(Json(json!({
        "account": account,
        "accounts": accounts,
    })))
}

/// GET /google/locations/{account_id}
async fn locations(
    State(state): State<SharedState>,
    Path(account_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tokens = require_tokens(&state).await?;
    let locations = state.remote.list_locations(&tokens, &account_id).await?;

    Ok(Json(json!({ "locations": locations })))
}

/// GET /google/reviews/{account_id}/{location_id}
async fn reviews(
    State(state): State<SharedState>,
    Path((account_id, location_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tokens = require_tokens(&state).await?;
    let summary = state
        .remote
        .get_reviews(&tokens, &account_id, &location_id)
        .await?;
    info!(
        "Fetched {} reviews for accounts/{account_id}/locations/{location_id}",
        summary.reviews.len()
    );

    Ok(Json(json!({
        "account_id": account_id,
        "location_id": location_id,
        "total_reviews": summary.total_count,
        "averageRating": summary.average_rating,
        "reviews": summary.reviews,
    })))
}
