use chrono::Utc;
use serde::Deserialize;

use super::token::TokenSet;
use crate::config::ClientConfig;
use crate::error::ServiceError;

/// Google OAuth 2.0 authorization-code flow.
///
/// Always asks for offline access with a forced consent screen, so every
/// exchange yields a refresh token alongside the access token.
pub struct GoogleProvider {
    client: ClientConfig,
    http: reqwest::Client,
}

// Raw token response from Google's token endpoint
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl GoogleProvider {
    pub fn new(client: ClientConfig, http: reqwest::Client) -> Self {
        Self { client, http }
    }

    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    /// Build the consent-screen URL. Pure: the same config always yields the same URL.
    pub fn authorization_url(&self) -> String {
        let scope_str = self.client.scopes.join(" ");
        format!(
            "{auth_uri}?\
             client_id={client_id}\
             &redirect_uri={redirect_uri}\
             &response_type=code\
             &scope={scope}\
             &access_type=offline\
             &include_granted_scopes=true\
             &prompt=consent",
            auth_uri = self.client.auth_uri,
            client_id = urlencoding(&self.client.client_id),
            redirect_uri = urlencoding(&self.client.redirect_uri),
            scope = urlencoding(&scope_str),
        )
    }

    /// Exchange an authorization code for tokens. Does not persist anything.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, ServiceError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "missing OAuth authorization code".into(),
            ));
        }

        let resp = self
            .http
            .post(&self.client.token_uri)
            .form(&[
                ("code", code),
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
                ("redirect_uri", self.client.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                ServiceError::OAuthExchangeFailed(format!("Token exchange request failed: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<GoogleErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{} ({desc})", err.error),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(ServiceError::OAuthExchangeFailed(format!(
                "Google token exchange failed with {status}: {reason}"
            )));
        }

        let token_resp: GoogleTokenResponse = resp.json().await.map_err(|e| {
            ServiceError::OAuthExchangeFailed(format!("Failed to parse token response: {e}"))
        })?;

        let scopes = match token_resp.scope.as_deref() {
            Some(granted) if !granted.trim().is_empty() => {
                granted.split_whitespace().map(String::from).collect()
            }
            _ => self.client.scopes.clone(),
        };

        let expiry = match token_resp.expires_in {
            Some(secs) => Some(
                chrono::Duration::try_seconds(secs)
                    .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                    .ok_or_else(|| {
                        ServiceError::OAuthExchangeFailed(format!(
                            "invalid expires_in in token response: {secs}"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(TokenSet {
            access_token: token_resp.access_token,
            refresh_token: token_resp.refresh_token,
            token_uri: self.client.token_uri.clone(),
            client_id: self.client.client_id.clone(),
            client_secret: self.client.client_secret.clone(),
            scopes,
            expiry,
        })
    }
}

/// Simple percent-encoding for URL parameters.
fn urlencoding(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::routing::post;
    use axum::Router;
    use tokio::net::TcpListener;

    use super::*;

    fn test_client(token_uri: &str) -> ClientConfig {
        ClientConfig {
            client_id: "client-123.apps.googleusercontent.com".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8000/auth/google/business".into(),
            scopes: vec!["https://www.googleapis.com/auth/business.manage".into()],
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: token_uri.into(),
        }
    }

    /// Token endpoint that answers every POST with a fixed status and body.
    async fn mock_token_server(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let app = Router::new().route(
            "/token",
            post(move |_form: String| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::Relaxed);
                    (
                        axum::http::StatusCode::from_u16(status)
                            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
                        [(axum::http::header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        (addr, calls)
    }

    #[test]
    fn test_authorization_url_requests_offline_consent() {
        let provider = GoogleProvider::new(test_client("unused"), reqwest::Client::new());
        let url = provider.authorization_url();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fauth%2Fgoogle%2Fbusiness"
        ));
        assert!(url.contains(
            "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fbusiness.manage"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[test]
    fn test_authorization_url_is_deterministic() {
        let a = GoogleProvider::new(test_client("unused"), reqwest::Client::new());
        let b = GoogleProvider::new(test_client("unused"), reqwest::Client::new());
        assert_eq!(a.authorization_url(), a.authorization_url());
        assert_eq!(a.authorization_url(), b.authorization_url());
    }

    #[test]
    fn test_authorization_url_joins_scopes_with_spaces() {
        let mut client = test_client("unused");
        client.scopes.push("openid".into());
        let url = GoogleProvider::new(client, reqwest::Client::new()).authorization_url();
        assert!(url.contains("business.manage+openid"));
    }

    #[tokio::test]
    async fn test_exchange_rejects_empty_code_without_network() {
        let (addr, calls) = mock_token_server(200, "{}").await;
        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );

        for code in ["", "   "] {
            let err = provider.exchange_code(code).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidRequest(_)));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_exchange_success() {
        let (addr, calls) = mock_token_server(
            200,
            r#"{
                "access_token": "ya29.fresh",
                "refresh_token": "1//refresh",
                "expires_in": 3599,
                "scope": "https://www.googleapis.com/auth/business.manage",
                "token_type": "Bearer"
            }"#,
        )
        .await;
        let token_uri = format!("http://{addr}/token");
        let provider = GoogleProvider::new(test_client(&token_uri), reqwest::Client::new());

        let tokens = provider.exchange_code("4/0Abc").await.unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(tokens.access_token, "ya29.fresh");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(tokens.token_uri, token_uri);
        assert_eq!(tokens.client_id, "client-123.apps.googleusercontent.com");
        assert_eq!(
            tokens.scopes,
            vec!["https://www.googleapis.com/auth/business.manage".to_string()]
        );
        assert!(tokens.expiry.is_some());
        assert!(!tokens.is_expired());
    }

    #[tokio::test]
    async fn test_exchange_out_of_range_expiry_is_exchange_failure() {
        let (addr, _) = mock_token_server(
            200,
            r#"{"access_token": "t", "expires_in": 9223372036854775807}"#,
        )
        .await;
        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );

        match provider.exchange_code("code").await {
            Err(ServiceError::OAuthExchangeFailed(msg)) => assert!(msg.contains("expires_in")),
            other => panic!("expected OAuthExchangeFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_falls_back_to_configured_scopes() {
        let (addr, _) = mock_token_server(200, r#"{"access_token": "t"}"#).await;
        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );

        let tokens = provider.exchange_code("code").await.unwrap();
        assert_eq!(tokens.scopes, provider.client().scopes);
        assert!(tokens.refresh_token.is_none());
        assert!(tokens.expiry.is_none());
    }

    #[tokio::test]
    async fn test_exchange_provider_error_carries_text() {
        let (addr, _) = mock_token_server(
            400,
            r#"{"error": "invalid_grant", "error_description": "Bad Request"}"#,
        )
        .await;
        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );

        match provider.exchange_code("stale").await {
            Err(ServiceError::OAuthExchangeFailed(msg)) => {
                assert!(msg.contains("invalid_grant"));
                assert!(msg.contains("Bad Request"));
            }
            other => panic!("expected OAuthExchangeFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_unparseable_body() {
        let (addr, _) = mock_token_server(200, "not json").await;
        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );

        let err = provider.exchange_code("code").await.unwrap_err();
        assert!(matches!(err, ServiceError::OAuthExchangeFailed(_)));
    }

    #[tokio::test]
    async fn test_exchange_network_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = GoogleProvider::new(
            test_client(&format!("http://{addr}/token")),
            reqwest::Client::new(),
        );
        let err = provider.exchange_code("code").await.unwrap_err();
        assert!(matches!(err, ServiceError::OAuthExchangeFailed(_)));
    }
}
