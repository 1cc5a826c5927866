//! Session snapshot published to consumers.

use werkbank_core::UserProfile;

use crate::credential::Credential;

/// Where the session currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Process start; the credential store has not been consulted yet.
    #[default]
    Unknown,
    /// A verification or login attempt is outstanding.
    Verifying,
    /// A profile was fetched for the held credential.
    Authenticated,
    /// No valid credential is held.
    Anonymous,
}

impl core::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionStatus::Unknown => f.write_str("unknown"),
            SessionStatus::Verifying => f.write_str("verifying"),
            SessionStatus::Authenticated => f.write_str("authenticated"),
            SessionStatus::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// Immutable snapshot of the session.
///
/// Only [`SessionManager`] produces new values; everything else (route guard,
/// UI) reads. State is rebuilt from the credential store on every process
/// start, never the reverse.
///
/// # Invariants
/// - `status == Authenticated` ⇒ `profile` and `credential` are present.
/// - `status == Anonymous` ⇒ `profile` and `credential` are absent.
///
/// [`SessionManager`]: crate::manager::SessionManager
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub status: SessionStatus,
    pub profile: Option<UserProfile>,
    pub credential: Option<Credential>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            profile: None,
            credential: None,
        }
    }

    pub fn verifying(credential: Option<Credential>) -> Self {
        Self {
            status: SessionStatus::Verifying,
            profile: None,
            credential,
        }
    }

    pub fn authenticated(profile: UserProfile, credential: Credential) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            profile: Some(profile),
            credential: Some(credential),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werkbank_core::{Role, UserId};

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(7),
            email: "staff@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: Role::new("Worker"),
            is_superuser: false,
            is_active: true,
        }
    }

    #[test]
    fn constructors_uphold_the_invariants() {
        let anonymous = Session::anonymous();
        assert_eq!(anonymous.status, SessionStatus::Anonymous);
        assert!(anonymous.profile.is_none());
        assert!(anonymous.credential.is_none());

        let authenticated = Session::authenticated(profile(), Credential::new("tok-1"));
        assert!(authenticated.is_authenticated());
        assert!(authenticated.profile.is_some());
        assert!(authenticated.credential.is_some());
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Session::default().status, SessionStatus::Unknown);
    }
}
