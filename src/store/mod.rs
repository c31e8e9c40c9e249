//! Credential store for the single OAuth token document.
//!
//! `save` always overwrites, `load` fails fast when nothing has been saved.
//! There is no locking: overlapping requests race and the last writer wins.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::providers::TokenSet;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Replace the stored token set.
    async fn save(&self, tokens: &TokenSet) -> Result<(), ServiceError>;

    /// Read the stored token set.
    ///
    /// Returns `NotAuthenticated` when nothing has been saved and
    /// `CorruptCredentials` when the stored document does not parse.
    async fn load(&self) -> Result<TokenSet, ServiceError>;

    /// Whether a credential document is present, without parsing it.
    async fn exists(&self) -> bool;
}
