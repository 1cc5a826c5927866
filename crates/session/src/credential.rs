//! Opaque bearer credential and its storage contract.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Opaque bearer credential identifying an authenticated session.
///
/// The client never inspects the contents. `Debug` and `Display` redact the
/// value so a token can never end up in logs by accident.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl core::fmt::Display for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Durable storage for the bearer credential.
///
/// Exactly one value lives under a fixed, well-known key; absence means "no
/// credential". Mutations are immediately visible to subsequent `get` calls
/// within the same process. No validation logic lives here — purely storage.
///
/// The surface is infallible: durable backends log IO failures and degrade to
/// "no credential" instead of failing the session machine.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<Credential>;

    fn set(&self, credential: &Credential);

    fn clear(&self);
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn get(&self) -> Option<Credential> {
        (**self).get()
    }

    fn set(&self, credential: &Credential) {
        (**self).set(credential)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// In-memory store for tests and ephemeral processes.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        // A poisoned lock reads as empty; the slot holds plain data, so this
        // only happens if a writer panicked mid-set.
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, credential: &Credential) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(credential.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_visible_to_subsequent_get() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.get(), None);

        store.set(&Credential::new("tok-1"));
        assert_eq!(store.get(), Some(Credential::new("tok-1")));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn debug_and_display_redact_the_token() {
        let credential = Credential::new("super-secret-bearer");
        assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
        assert_eq!(credential.to_string(), "<redacted>");
    }

    #[test]
    fn serde_is_transparent() {
        let credential = Credential::new("tok-1");
        let json = serde_json::to_string(&credential).unwrap();
        assert_eq!(json, "\"tok-1\"");

        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, credential);
    }
}
