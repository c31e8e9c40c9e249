//! File-backed credential store. Writes Google's authorized-user JSON document.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::CredentialStore;
use crate::error::ServiceError;
use crate::providers::TokenSet;

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, tokens: &TokenSet) -> Result<(), ServiceError> {
        let doc = serde_json::to_string_pretty(tokens)
            .map_err(|e| ServiceError::Persistence(format!("failed to serialize tokens: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ServiceError::Persistence(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        tokio::fs::write(&self.path, doc).await.map_err(|e| {
            ServiceError::Persistence(format!("failed to write {}: {e}", self.path.display()))
        })?;

        info!("Credentials saved to {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<TokenSet, ServiceError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No credential document at {}", self.path.display());
                return Err(ServiceError::NotAuthenticated);
            }
            Err(e) => {
                return Err(ServiceError::Persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            ServiceError::CorruptCredentials(format!("{}: {e}", self.path.display()))
        })
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}
