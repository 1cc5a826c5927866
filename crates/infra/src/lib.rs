//! Infrastructure adapters for the Werkbank client: the HTTP identity
//! boundary, durable credential storage and configuration.
//!
//! Everything here implements a trait from `werkbank-session`; the state
//! machine itself never sees reqwest or the filesystem.

pub mod config;
pub mod http_identity;
pub mod token_file;

pub use config::Config;
pub use http_identity::HttpIdentityService;
pub use token_file::FileCredentialStore;
