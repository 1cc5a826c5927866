//! Role-based route gate.
//!
//! Evaluated by the navigation layer on every navigation. Reads the current,
//! already-settled session snapshot; never triggers network calls.

use werkbank_core::Role;

use crate::state::{Session, SessionStatus};

/// Directive handed back to the navigation layer.
///
/// The core makes no assumption about the routing technology; the navigation
/// layer maps these to actual view rendering or URL redirection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Verification is still outstanding; render nothing definitive yet.
    Pending,
    /// The requested view may render.
    Render,
    /// No session; send the user to the login view.
    RedirectToLogin,
    /// Signed in but not allowed here; send the user home.
    RedirectToHome,
}

/// Decide whether a view gated by `required_roles` may render for `session`.
///
/// Pure and deterministic: no IO, no clock, no network. Rules evaluate in
/// order:
///
/// 1. `Unknown`/`Verifying` → [`Pending`] — never redirect while a
///    verification is outstanding, so a legitimate reload does not flash the
///    login view.
/// 2. `Anonymous` → [`RedirectToLogin`].
/// 3. Role required but not held (and not superuser) → [`RedirectToHome`].
/// 4. Otherwise [`Render`].
///
/// `None` and an empty slice both mean "any authenticated user".
///
/// [`Pending`]: RouteDecision::Pending
/// [`RedirectToLogin`]: RouteDecision::RedirectToLogin
/// [`RedirectToHome`]: RouteDecision::RedirectToHome
/// [`Render`]: RouteDecision::Render
pub fn authorize_route(required_roles: Option<&[Role]>, session: &Session) -> RouteDecision {
    match session.status {
        SessionStatus::Unknown | SessionStatus::Verifying => return RouteDecision::Pending,
        SessionStatus::Anonymous => return RouteDecision::RedirectToLogin,
        SessionStatus::Authenticated => {}
    }

    let Some(profile) = session.profile.as_ref() else {
        // Authenticated without a profile breaks the session invariant;
        // treat it as no session rather than rendering.
        return RouteDecision::RedirectToLogin;
    };

    if let Some(required) = required_roles {
        if !required.is_empty() && !profile.is_superuser && !required.contains(&profile.role) {
            return RouteDecision::RedirectToHome;
        }
    }

    RouteDecision::Render
}
