//! Data models module
//!
//! This module contains the entity model shared by the store, the services
//! and the backend gateway.

pub mod user;
pub mod group;
pub mod contribution;
pub mod newsletter;
pub mod layout;
pub mod scope;

// Re-export commonly used models
pub use user::{User, Role, GroupMembership, CreateUserRequest};
pub use group::{Group, CreateGroupRequest};
pub use contribution::{Contribution, ContributionStatus, ContributionKind, NewContribution};
pub use newsletter::{Newsletter, NewsletterStatus, Engagement, ReactionKind, Comment, CreateNewsletterRequest};
pub use layout::{LayoutConfig, LayoutBlock, LayoutSection, NewsletterLayout, SectionItem, StoredBlock};
pub use scope::Scope;
