//! State management module
//!
//! This module holds the session, the collections and the role capability
//! table behind a single reducer store.

pub mod actions;
pub mod busy;
pub mod seed;
pub mod store;
pub mod tabs;

// Re-export commonly used state components
pub use actions::{Action, Panel};
pub use busy::{BusyFlags, BusyGuard, Operation};
pub use store::{Session, StoreMode, StudioEvent, StudioState, StudioStore, View};
pub use tabs::{Tab, DEFAULT_TAB, resolve_tab, visible_tabs};
