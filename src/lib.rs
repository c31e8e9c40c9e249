pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod providers;
pub mod remote;
pub mod store;

pub use config::Config;
pub use error::ServiceError;

use std::sync::Arc;

use auth::AuthLifecycle;
use config::{ApiEndpoints, ClientConfig};
use providers::GoogleProvider;
use remote::BusinessClient;
use store::{CredentialStore, FileCredentialStore};

/// Shared application state passed to all API handlers.
pub struct AppState {
    pub provider: GoogleProvider,
    pub store: Box<dyn CredentialStore>,
    pub remote: BusinessClient,
    pub lifecycle: AuthLifecycle,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire up the file-backed store at `config.token_path`.
    pub async fn from_config(config: &Config) -> Self {
        let store = FileCredentialStore::new(config.token_path.clone());
        Self::new(config.client.clone(), config.endpoints.clone(), Box::new(store)).await
    }

    pub async fn new(
        client: ClientConfig,
        endpoints: ApiEndpoints,
        store: Box<dyn CredentialStore>,
    ) -> Self {
        // One connection pool shared by the token exchange and the data calls.
        let http = reqwest::Client::new();
        let lifecycle = AuthLifecycle::new(store.exists().await);

        Self {
            provider: GoogleProvider::new(client, http.clone()),
            store,
            remote: BusinessClient::new(endpoints, http),
            lifecycle,
        }
    }
}
