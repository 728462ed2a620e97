//! Newsletter Studio
//!
//! Role-gated internal newsletter studio. Teams submit monthly contributions,
//! admins turn them into a deterministic draft and publish it to a scoped
//! feed, super-admins manage users and groups. State lives in a single
//! reducer store that runs either locally or synchronized with a REST backend
//! through a typed gateway.

pub mod config;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{StudioError, GatewayError, Result};

// Re-export main components for easy access
pub use gateway::BackendClient;
pub use services::{DraftComposer, RemoteStudio, ServiceFactory};
pub use state::{Action, StudioStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
