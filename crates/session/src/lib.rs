//! `werkbank-session` — client-side session/authentication core.
//!
//! Tracks whether a user is signed in, persists the bearer credential across
//! restarts and gates navigation by role. The crate reconciles three
//! independent sources of truth — the persisted credential, in-flight network
//! verification and UI navigation intent — behind a single state machine
//! ([`manager::SessionManager`]).
//!
//! This crate is intentionally decoupled from HTTP and real storage: both
//! boundaries are traits ([`identity::IdentityService`],
//! [`credential::CredentialStore`]) so the machine is testable with in-memory
//! fakes.

pub mod credential;
pub mod guard;
pub mod identity;
pub mod manager;
pub mod state;

pub use credential::{Credential, CredentialStore, InMemoryCredentialStore};
pub use guard::{RouteDecision, authorize_route};
pub use identity::{IdentityError, IdentityService};
pub use manager::{SessionError, SessionManager};
pub use state::{Session, SessionStatus};
