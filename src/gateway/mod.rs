//! Remote data gateway
//!
//! Typed access to the newsletter backend's REST surface.

pub mod client;
pub mod dto;
pub mod token;

pub use client::{BackendClient, LoginOutcome};
pub use dto::{ContributionCreate, NewsletterCreate, NewsletterFilter, UserCreate};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
