//! Authentication lifecycle: Unauthenticated -> AwaitingCallback -> Authenticated.
//!
//! Informational only. Data endpoints gate on the credential document itself.

use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Unauthenticated,
    AwaitingCallback,
    Authenticated,
}

pub struct AuthLifecycle {
    state: Mutex<AuthState>,
}

impl AuthLifecycle {
    /// Start `Authenticated` when credentials are already on disk.
    pub fn new(has_credentials: bool) -> Self {
        let initial = if has_credentials {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        Self {
            state: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// An authorization URL was handed out. Allowed from any state.
    pub fn authorization_issued(&self) {
        self.transition(AuthState::AwaitingCallback);
    }

    /// The code was exchanged and the tokens saved.
    pub fn exchange_succeeded(&self) {
        self.transition(AuthState::Authenticated);
    }

    /// The exchange (or saving its result) failed; nothing was stored.
    pub fn exchange_failed(&self) {
        self.transition(AuthState::Unauthenticated);
    }

    fn transition(&self, next: AuthState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != next {
            info!("Auth state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }
}
