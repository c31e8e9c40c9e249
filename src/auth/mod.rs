pub mod lifecycle;

pub use lifecycle::{AuthLifecycle, AuthState};
