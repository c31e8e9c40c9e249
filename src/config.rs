use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/auth/google/business";
pub const BUSINESS_MANAGE_SCOPE: &str = "https://www.googleapis.com/auth/business.manage";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // ── Server ──────────────────────────────────────────────────────────
    pub host: String,
    pub port: u16,

    // ── Files ───────────────────────────────────────────────────────────
    /// Google client-secrets document (read-only).
    pub client_secrets_path: PathBuf,
    /// Where the authorized-user token document is written.
    pub token_path: PathBuf,

    // ── OAuth Client ────────────────────────────────────────────────────
    pub client: ClientConfig,

    // ── Remote APIs ─────────────────────────────────────────────────────
    pub endpoints: ApiEndpoints,
}

/// Static OAuth client configuration. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Base URLs of the Business Profile APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub accounts: String,
    pub information: String,
    pub reviews: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            accounts: "https://mybusinessaccountmanagement.googleapis.com".into(),
            information: "https://mybusinessbusinessinformation.googleapis.com".into(),
            reviews: "https://mybusiness.googleapis.com".into(),
        }
    }
}

// Google ships client secrets as either {"web": {...}} or {"installed": {...}}.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    web: Option<ClientSecretsEntry>,
    installed: Option<ClientSecretsEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ClientSecretsEntry {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let client_secrets_path: PathBuf = std::env::var("CLIENT_SECRETS_PATH")
            .unwrap_or_else(|_| "creds.json".into())
            .into();

        let secrets = match std::fs::read_to_string(&client_secrets_path) {
            Ok(raw) => parse_client_secrets(&raw).with_context(|| {
                format!("Invalid client secrets file {}", client_secrets_path.display())
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ClientSecretsEntry::default(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read {}", client_secrets_path.display())
                })
            }
        };

        let client_id = env_or("GOOGLE_CLIENT_ID", secrets.client_id);
        let client_secret = env_or("GOOGLE_CLIENT_SECRET", secrets.client_secret);
        if client_id.is_empty() || client_secret.is_empty() {
            bail!(
                "Google client id/secret missing: provide {} or set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET",
                client_secrets_path.display()
            );
        }

        let defaults = ApiEndpoints::default();

        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".into())
                .parse()
                .context("Invalid PORT")?,

            client_secrets_path,
            token_path: std::env::var("TOKEN_PATH")
                .unwrap_or_else(|_| "token.json".into())
                .into(),

            client: ClientConfig {
                client_id,
                client_secret,
                redirect_uri: std::env::var("GOOGLE_REDIRECT_URI")
                    .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.into()),
                scopes: parse_scopes(
                    &std::env::var("GOOGLE_SCOPES").unwrap_or_else(|_| BUSINESS_MANAGE_SCOPE.into()),
                ),
                auth_uri: secrets.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.into()),
                token_uri: secrets.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.into()),
            },

            endpoints: ApiEndpoints {
                accounts: env_or("GBP_ACCOUNTS_BASE_URL", defaults.accounts),
                information: env_or("GBP_INFORMATION_BASE_URL", defaults.information),
                reviews: env_or("GBP_REVIEWS_BASE_URL", defaults.reviews),
            },
        })
    }
}

fn env_or(key: &str, fallback: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
}

fn parse_client_secrets(raw: &str) -> Result<ClientSecretsEntry> {
    let file: ClientSecretsFile = serde_json::from_str(raw)?;
    let entry = file
        .web
        .or(file.installed)
        .context("expected a \"web\" or \"installed\" section")?;
    Ok(entry)
}

/// Split a comma or whitespace separated scope list.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
