//! Identity boundary: credential verification and exchange.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use werkbank_core::UserProfile;

use crate::credential::Credential;

/// Failure at the identity boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The presented credential no longer denotes a valid session.
    #[error("credential rejected")]
    Unauthorized,

    /// The identifier/secret pair was rejected during exchange.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The boundary could not be reached, or answered something malformed.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Network boundary to the identity provider.
///
/// The session core treats every non-success from [`verify`] uniformly as
/// "credential invalid", regardless of the underlying cause; the variant
/// distinction only matters for user-visible reporting during login.
///
/// [`verify`]: IdentityService::verify
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Ask whether `credential` still denotes a valid session.
    async fn verify(&self, credential: &Credential) -> Result<UserProfile, IdentityError>;

    /// Exchange an identifier/secret pair for a fresh credential.
    async fn exchange(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Credential, IdentityError>;
}

#[async_trait]
impl<I> IdentityService for Arc<I>
where
    I: IdentityService + ?Sized,
{
    async fn verify(&self, credential: &Credential) -> Result<UserProfile, IdentityError> {
        (**self).verify(credential).await
    }

    async fn exchange(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Credential, IdentityError> {
        (**self).exchange(identifier, secret).await
    }
}
