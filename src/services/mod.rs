//! Services module
//!
//! This module contains the studio's business logic: visibility rules, draft
//! composition, the layout editor, participation, directory administration
//! and the backend-backed studio.

pub mod composer;
pub mod directory;
pub mod layout;
pub mod participation;
pub mod remote;
pub mod visibility;

// Re-export commonly used services
pub use composer::{DraftComposer, DraftDocument, DraftSection};
pub use layout::{BlockField, LayoutEditor};
pub use participation::Participation;
pub use remote::RemoteStudio;
pub use visibility::{audience_label, filter_visible, is_visible, Scoped};

use std::path::Path;
use std::sync::Arc;
use tracing::info;
use crate::config::settings::Settings;
use crate::gateway::{BackendClient, FileTokenStore, TokenStore};
use crate::state::{seed, StudioStore};
use crate::utils::errors::Result;

/// Service factory for creating stores and backend-backed services from settings
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    settings: Settings,
}

impl ServiceFactory {
    /// Create a new ServiceFactory from validated settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn composer(&self) -> DraftComposer {
        DraftComposer::new(&self.settings.composer)
    }

    /// Token store persisting to the configured session file
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::new(FileTokenStore::new(Path::new(&self.settings.session.token_path)))
    }

    pub fn backend_client(&self, tokens: Arc<dyn TokenStore>) -> Result<BackendClient> {
        let client = BackendClient::new(&self.settings.backend, tokens)?;
        info!(base_url = %client.base_url(), "Backend client created");
        Ok(client)
    }

    /// Store without a backend
    pub fn local_store(&self) -> StudioStore {
        StudioStore::local(&self.settings)
    }

    /// Local store preloaded with demo data
    pub fn demo_store(&self) -> Result<StudioStore> {
        seed::demo_store(&self.settings)
    }

    /// Studio synchronized with the backend, starting signed out
    pub fn remote_studio(&self, tokens: Arc<dyn TokenStore>) -> Result<RemoteStudio> {
        let client = self.backend_client(tokens)?;
        Ok(RemoteStudio::new(client, StudioStore::remote(&self.settings)))
    }
}
