//! Route guard.
//!
//! Every screen declares a [`RouteSpec`] carrying the set of role
//! strings allowed to open it. [`guard`] is the whole authorization
//! state machine: a pure, synchronous decision over the locally
//! persisted session, taken on every navigation. It performs no
//! network call; token validity is the API layer's problem (a 401
//! anywhere clears the session, after which this function lands in the
//! login redirect on its own).

use crate::Session;
use workdesk_types::Role;

/// Static description of a guarded route.
///
/// # Example
///
/// ```
/// use workdesk_auth::RouteSpec;
/// use workdesk_types::Role;
///
/// const BOQ: RouteSpec = RouteSpec {
///     path: "/projects/boq",
///     title: "Bill of Quantity",
///     allowed_roles: &["engineer", "supervisor", "super_admin"],
/// };
///
/// assert!(BOQ.allows(&Role::new("engineer")));
/// assert!(!BOQ.allows(&Role::new("marketing")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    /// Request path, preserved verbatim for the post-login bounce-back.
    pub path: &'static str,
    /// Menu/screen title.
    pub title: &'static str,
    /// Role strings permitted to render the screen.
    ///
    /// An empty list denies every role (fail-closed); routes that
    /// should be open to all authenticated users list every known
    /// role explicitly.
    pub allowed_roles: &'static [&'static str],
}

impl RouteSpec {
    /// Returns whether the given role is in the allow-list.
    #[must_use]
    pub fn allows(&self, role: &Role) -> bool {
        self.allowed_roles.contains(&role.name())
    }
}

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session is authenticated and authorized; render the screen.
    Render,
    /// No session: go to login, then bounce back to `return_to`.
    RedirectToLogin {
        /// The originally requested path.
        return_to: String,
    },
    /// Authenticated but the role is outside the allow-list.
    RedirectUnauthorized,
}

/// Evaluates the guard for one route.
///
/// An absent session and an expired one are indistinguishable here:
/// both arrive as `None` (the store reports expired entries as absent)
/// and both redirect to login.
///
/// # Example
///
/// ```
/// use workdesk_auth::{guard, GuardDecision, RouteSpec};
///
/// const PHC: RouteSpec = RouteSpec {
///     path: "/phc",
///     title: "Handover Checklists",
///     allowed_roles: &["engineer"],
/// };
///
/// assert_eq!(
///     guard(None, &PHC),
///     GuardDecision::RedirectToLogin { return_to: "/phc".into() }
/// );
/// ```
#[must_use]
pub fn guard(session: Option<&Session>, route: &RouteSpec) -> GuardDecision {
    let Some(session) = session else {
        return GuardDecision::RedirectToLogin {
            return_to: route.path.to_string(),
        };
    };

    if route.allows(&session.user().role) {
        GuardDecision::Render
    } else {
        GuardDecision::RedirectUnauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::{User, UserId};

    const ROUTE: RouteSpec = RouteSpec {
        path: "/status-projects",
        title: "Project Status",
        allowed_roles: &["engineer", "marketing"],
    };

    const LOCKED: RouteSpec = RouteSpec {
        path: "/admin",
        title: "Admin",
        allowed_roles: &[],
    };

    fn session(role: &str) -> Session {
        Session::new(
            User {
                id: UserId(2),
                name: "Budi".into(),
                role: Role::new(role),
            },
            "tok",
        )
    }

    #[test]
    fn no_session_redirects_to_login_with_return_path() {
        assert_eq!(
            guard(None, &ROUTE),
            GuardDecision::RedirectToLogin {
                return_to: "/status-projects".into()
            }
        );
    }

    #[test]
    fn allowed_role_renders() {
        assert_eq!(guard(Some(&session("engineer")), &ROUTE), GuardDecision::Render);
        assert_eq!(guard(Some(&session("marketing")), &ROUTE), GuardDecision::Render);
    }

    #[test]
    fn role_outside_allow_list_is_unauthorized() {
        assert_eq!(
            guard(Some(&session("estimator")), &ROUTE),
            GuardDecision::RedirectUnauthorized
        );
    }

    #[test]
    fn unknown_role_is_unauthorized_not_an_error() {
        assert_eq!(
            guard(Some(&session("auditor_v2")), &ROUTE),
            GuardDecision::RedirectUnauthorized
        );
    }

    #[test]
    fn empty_allow_list_denies_everyone() {
        assert_eq!(
            guard(Some(&session("engineer")), &LOCKED),
            GuardDecision::RedirectUnauthorized
        );
    }
}
