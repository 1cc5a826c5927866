//! Session state machine.
//!
//! [`SessionManager`] owns the current [`Session`] snapshot and mediates all
//! transitions:
//!
//! ```text
//! Unknown ──> Verifying ──> { Authenticated, Anonymous }
//! Authenticated ──> Verifying (re-check)   Authenticated ──> Anonymous (logout/expiry)
//! Anonymous ──> Verifying (login attempt)
//! ```
//!
//! Two mechanisms keep the machine race-free under one cooperative scheduler:
//!
//! - **Coalescing**: a `check_session` that arrives while a verification is
//!   outstanding joins the in-flight attempt instead of issuing a duplicate
//!   network call; all callers observe the same settled status.
//! - **Generation filtering**: every attempt captures a generation number,
//!   and `logout`/`login` bump it. A completion whose generation no longer
//!   matches is discarded, so a slow verification can never overwrite a newer
//!   logout or login result.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;

use werkbank_core::UserProfile;

use crate::credential::{Credential, CredentialStore};
use crate::identity::{IdentityError, IdentityService};
use crate::state::{Session, SessionStatus};

/// Error surfaced by user-initiated session operations.
///
/// Passive verification failures (during `check_session`) are recovered
/// locally by demoting to anonymous and never reach a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The identifier/secret pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A held credential no longer denotes a valid session.
    #[error("session expired or invalid")]
    ExpiredOrInvalidSession,

    /// The identity boundary could not be reached.
    #[error("network failure: {0}")]
    Network(String),

    /// A newer login or logout superseded this attempt; its result was
    /// discarded without touching session state or the store.
    #[error("attempt superseded by a newer operation")]
    Superseded,
}

impl From<IdentityError> for SessionError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Unauthorized => SessionError::ExpiredOrInvalidSession,
            IdentityError::InvalidCredentials => SessionError::InvalidCredentials,
            IdentityError::Transport(msg) => SessionError::Network(msg),
        }
    }
}

/// One outstanding verification/login attempt.
///
/// Joiners hold a clone of `outcome` and wait for the leader to publish the
/// settled status. `generation` tags the attempt so a superseded leader does
/// not clear a flight it no longer owns.
struct Flight {
    generation: u64,
    outcome: watch::Receiver<Option<SessionStatus>>,
}

struct Inner {
    generation: u64,
    in_flight: Option<Flight>,
}

enum CheckPath {
    Settled(SessionStatus),
    Join(watch::Receiver<Option<SessionStatus>>),
    Lead {
        generation: u64,
        credential: Credential,
        outcome: watch::Sender<Option<SessionStatus>>,
    },
}

/// The session state machine.
///
/// Constructed explicitly and passed by reference to consumers — no global.
/// All mutation goes through `&self` methods; consumers read immutable
/// [`Session`] snapshots via [`snapshot`](Self::snapshot) or subscribe to
/// changes via [`subscribe`](Self::subscribe).
pub struct SessionManager<I, S> {
    identity: I,
    store: S,
    inner: Mutex<Inner>,
    session: watch::Sender<Session>,
}

impl<I, S> SessionManager<I, S>
where
    I: IdentityService,
    S: CredentialStore,
{
    pub fn new(identity: I, store: S) -> Self {
        let (session, _) = watch::channel(Session::default());
        Self {
            identity,
            store,
            inner: Mutex::new(Inner {
                generation: 0,
                in_flight: None,
            }),
            session,
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Subscribe to session-state changes.
    ///
    /// The receiver observes every settled transition; consumers re-render
    /// from the latest value rather than relying on implicit triggers.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Re-derive the session from the credential store.
    ///
    /// With an empty store this settles to `Anonymous` without any network
    /// call. With a stored credential it verifies against the identity
    /// boundary; any failure (expired, invalid, network) silently demotes to
    /// `Anonymous` and purges the store. Concurrent calls coalesce onto one
    /// verification.
    pub async fn check_session(&self) -> SessionStatus {
        let path = {
            let mut inner = self.lock_inner();

            if let Some(flight) = &inner.in_flight {
                CheckPath::Join(flight.outcome.clone())
            } else {
                match self.store.get() {
                    None => {
                        self.publish(Session::anonymous());
                        CheckPath::Settled(SessionStatus::Anonymous)
                    }
                    Some(credential) => {
                        let (generation, outcome) = self.begin_attempt(&mut inner);
                        self.publish(Session::verifying(Some(credential.clone())));
                        CheckPath::Lead {
                            generation,
                            credential,
                            outcome,
                        }
                    }
                }
            }
        };

        match path {
            CheckPath::Settled(status) => status,
            CheckPath::Join(rx) => self.await_settled(rx).await,
            CheckPath::Lead {
                generation,
                credential,
                outcome,
            } => {
                let status = self.run_verification(generation, &credential).await;
                let _ = outcome.send(Some(status));
                status
            }
        }
    }

    /// Exchange an identifier/secret pair for a credential and authenticate.
    ///
    /// On exchange failure nothing is persisted and the failure is surfaced
    /// to the caller. On success the credential is persisted first, then the
    /// same verification path as [`check_session`](Self::check_session)
    /// populates the profile before the session becomes `Authenticated`.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<UserProfile, SessionError> {
        let (generation, outcome) = {
            let mut inner = self.lock_inner();
            let attempt = self.begin_attempt(&mut inner);
            self.publish(Session::verifying(self.store.get()));
            attempt
        };

        let result = self.run_login(generation, identifier, secret).await;

        // Settle joiners with whatever status the attempt (or a superseding
        // operation) left behind.
        let _ = outcome.send(Some(self.snapshot().status));

        result
    }

    /// Drop the session unconditionally.
    ///
    /// Callable from any state, including mid-verification: the generation
    /// bump makes any outstanding completion stale, so it cannot
    /// re-authenticate a session that was explicitly logged out.
    pub fn logout(&self) {
        let mut inner = self.lock_inner();
        inner.generation += 1;
        inner.in_flight = None;
        self.store.clear();
        self.publish(Session::anonymous());
        tracing::info!("session logged out");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn begin_attempt(
        &self,
        inner: &mut Inner,
    ) -> (u64, watch::Sender<Option<SessionStatus>>) {
        inner.generation += 1;
        let generation = inner.generation;
        let (tx, rx) = watch::channel(None);
        inner.in_flight = Some(Flight {
            generation,
            outcome: rx,
        });
        (generation, tx)
    }

    async fn await_settled(
        &self,
        mut rx: watch::Receiver<Option<SessionStatus>>,
    ) -> SessionStatus {
        match rx.wait_for(Option::is_some).await {
            Ok(settled) => settled.unwrap_or(SessionStatus::Anonymous),
            // Leader dropped without settling (cancelled); read whatever the
            // machine currently says.
            Err(_) => self.snapshot().status,
        }
    }

    async fn run_verification(&self, generation: u64, credential: &Credential) -> SessionStatus {
        let verified = self.identity.verify(credential).await;

        let mut inner = self.lock_inner();
        if inner.generation != generation {
            tracing::debug!(generation, "discarding stale verification result");
            return self.snapshot().status;
        }
        self.end_attempt(&mut inner, generation);

        match verified {
            Ok(profile) => {
                tracing::info!(user = %profile.id, "session verified");
                self.publish(Session::authenticated(profile, credential.clone()));
                SessionStatus::Authenticated
            }
            Err(err) => {
                // Expired, invalid and unreachable all demote the same way;
                // this is an expected condition, not a user-facing error.
                tracing::info!(%err, "verification failed, demoting to anonymous");
                self.store.clear();
                self.publish(Session::anonymous());
                SessionStatus::Anonymous
            }
        }
    }

    async fn run_login(
        &self,
        generation: u64,
        identifier: &str,
        secret: &str,
    ) -> Result<UserProfile, SessionError> {
        let credential = match self.identity.exchange(identifier, secret).await {
            Ok(credential) => credential,
            Err(err) => {
                let mut inner = self.lock_inner();
                if inner.generation != generation {
                    return Err(SessionError::Superseded);
                }
                self.end_attempt(&mut inner, generation);
                // The store stays untouched: no partial credential is ever
                // persisted on a failed login.
                self.publish(Session::anonymous());
                tracing::info!(%err, "login rejected");
                return Err(err.into());
            }
        };

        {
            let mut inner = self.lock_inner();
            if inner.generation != generation {
                // Logged out (or a newer attempt started) while the exchange
                // was outstanding; the fresh credential must not win.
                return Err(SessionError::Superseded);
            }
            self.store.set(&credential);
            self.publish(Session::verifying(Some(credential.clone())));
        }

        let verified = self.identity.verify(&credential).await;

        let mut inner = self.lock_inner();
        if inner.generation != generation {
            return Err(SessionError::Superseded);
        }
        self.end_attempt(&mut inner, generation);

        match verified {
            Ok(profile) => {
                tracing::info!(user = %profile.id, "login succeeded");
                self.publish(Session::authenticated(profile.clone(), credential));
                Ok(profile)
            }
            Err(err) => {
                // Same demotion as check_session, but the caller is actively
                // waiting on a result, so the failure is surfaced too.
                self.store.clear();
                self.publish(Session::anonymous());
                tracing::info!(%err, "post-login verification failed");
                Err(err.into())
            }
        }
    }

    fn end_attempt(&self, inner: &mut Inner, generation: u64) {
        if inner
            .in_flight
            .as_ref()
            .is_some_and(|flight| flight.generation == generation)
        {
            inner.in_flight = None;
        }
    }

    fn publish(&self, session: Session) {
        self.session.send_replace(session);
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        // Inner holds plain bookkeeping data; even after a panic in another
        // thread the values are consistent, so recover instead of unwrapping.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
