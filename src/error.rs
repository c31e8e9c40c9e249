use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for the gbp-gateway service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    // ── Caller Errors ───────────────────────────────────────────────────
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication required. Call /google/auth-url first.")]
    NotAuthenticated,

    // ── Provider Errors ─────────────────────────────────────────────────
    #[error("OAuth error: {0}")]
    OAuthExchangeFailed(String),

    #[error("Failed to fetch {resource} for {target}: {reason}")]
    RemoteCallFailed {
        resource: &'static str,
        target: String,
        reason: String,
    },

    // ── Credential Document ─────────────────────────────────────────────
    #[error("Failed to persist credentials: {0}")]
    Persistence(String),

    #[error("Stored credentials are unreadable: {0}")]
    CorruptCredentials(String),

    // ── Internal ────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    pub fn remote(resource: &'static str, target: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::RemoteCallFailed {
            resource,
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::OAuthExchangeFailed(_)
            | ServiceError::RemoteCallFailed { .. }
            | ServiceError::Persistence(_)
            | ServiceError::CorruptCredentials(_)
            | ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }

        let body = json!({ "detail": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::NotAuthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServiceError::OAuthExchangeFailed("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::CorruptCredentials("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Persistence("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_remote_error_names_resource_and_target() {
        let err = ServiceError::remote("reviews", "accounts/1/locations/2", "HTTP 403 Forbidden");
        let msg = err.to_string();
        assert!(msg.contains("reviews"));
        assert!(msg.contains("accounts/1/locations/2"));
        assert!(msg.contains("403"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
