use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens returned from Google after a code exchange.
///
/// Serialized in Google's authorized-user document shape so the file can be
/// read by other Google client libraries as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Whether the access token is past its expiry. Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|at| at <= Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_google_authorized_user_document() {
        let raw = r#"{
            "token": "ya29.a0",
            "refresh_token": "1//0g",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "abc.apps.googleusercontent.com",
            "client_secret": "shh",
            "scopes": ["https://www.googleapis.com/auth/business.manage"],
            "universe_domain": "googleapis.com",
            "account": "",
            "expiry": "2030-01-01T10:00:00.123456Z"
        }"#;
        let tokens: TokenSet = serde_json::from_str(raw).unwrap();
        assert_eq!(tokens.access_token, "ya29.a0");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//0g"));
        assert_eq!(tokens.scopes.len(), 1);
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_access_token_is_required() {
        assert!(serde_json::from_str::<TokenSet>(r#"{"refresh_token": "x"}"#).is_err());
    }

    #[test]
    fn test_is_expired() {
        let mut tokens: TokenSet = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert!(!tokens.is_expired());
        tokens.expiry = Some(Utc::now() - chrono::Duration::seconds(5));
        assert!(tokens.is_expired());
    }
}
