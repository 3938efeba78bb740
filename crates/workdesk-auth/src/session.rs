//! Session type (user profile + bearer token).

use serde::{Deserialize, Serialize};
use workdesk_types::{Capability, User, UserId};

/// An authenticated session.
///
/// Couples the cached user profile with the bearer token issued at
/// login. The two are never stored or cleared independently: a session
/// either exists whole or not at all, which is the invariant the rest
/// of the client leans on when deciding between the login redirect and
/// a rendered screen.
///
/// # Why No Default?
///
/// **DO NOT implement `Default` for Session.** There is no sensible
/// default identity or token. Always construct with [`Session::new`]
/// from a login response.
///
/// # Example
///
/// ```
/// use workdesk_auth::Session;
/// use workdesk_types::{Capability, Role, User, UserId};
///
/// let session = Session::new(
///     User {
///         id: UserId(3),
///         name: "Rina".into(),
///         role: Role::new("engineer"),
///     },
///     "token-abc",
/// );
///
/// assert_eq!(session.user_id(), UserId(3));
/// assert_eq!(session.capability(), Some(Capability::Engineer));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: User,
    token: String,
}

impl Session {
    /// Creates a session from a login response.
    #[must_use]
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    /// Returns the cached user profile.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the user's id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// Returns the bearer token for API calls.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Resolves the session's role to a capability.
    ///
    /// Fail-closed: unknown roles yield `None` and an empty menu.
    #[must_use]
    pub fn capability(&self) -> Option<Capability> {
        self.user.role.capability()
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user.name, self.user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::Role;

    fn session(role: &str) -> Session {
        Session::new(
            User {
                id: UserId(7),
                name: "Adi".into(),
                role: Role::new(role),
            },
            "tok",
        )
    }

    #[test]
    fn capability_follows_role() {
        assert_eq!(session("marketing").capability(), Some(Capability::Marketing));
        assert_eq!(session("engineer").capability(), Some(Capability::Engineer));
        assert_eq!(session("intern").capability(), None);
    }

    #[test]
    fn token_and_user_travel_together() {
        let s = session("engineer");
        let json = serde_json::to_string(&s).expect("serialize");
        let back: Session = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.token(), "tok");
        assert_eq!(back.user_id(), UserId(7));
    }

    #[test]
    fn display_shows_name_and_role() {
        assert_eq!(session("engineer").to_string(), "Adi@engineer");
    }
}
