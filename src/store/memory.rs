use std::sync::RwLock;

use async_trait::async_trait;

use super::CredentialStore;
use crate::error::ServiceError;
use crate::providers::TokenSet;

/// In-process credential store with the same contract as the file store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tokens: RwLock<Option<TokenSet>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenSet) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, tokens: &TokenSet) -> Result<(), ServiceError> {
        let mut slot = self
            .tokens
            .write()
            .map_err(|_| ServiceError::Persistence("credential lock poisoned".into()))?;
        *slot = Some(tokens.clone());
        Ok(())
    }

    async fn load(&self) -> Result<TokenSet, ServiceError> {
        let slot = self
            .tokens
            .read()
            .map_err(|_| ServiceError::Persistence("credential lock poisoned".into()))?;
        slot.clone().ok_or(ServiceError::NotAuthenticated)
    }

    async fn exists(&self) -> bool {
        self.tokens.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}
