//! `werkbank-core` — domain foundation for the Werkbank client.
//!
//! This crate contains **pure domain** primitives (no IO, no async).

pub mod error;
pub mod id;
pub mod profile;
pub mod role;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use profile::UserProfile;
pub use role::Role;
