//! Shared wire records.
//!
//! Records used by more than one layer live here: the authenticated
//! user profile (cached next to the token) and the notification record
//! (returned by the REST API and synthesized from live events).

use crate::{NotificationId, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user profile as cached in the session entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// API-side user id; also names the private realtime channel.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Raw role, resolved to a capability on demand.
    pub role: Role,
}

/// A notification, historical or live.
///
/// Historical entries come from `GET /notifications`; live entries are
/// normalized from realtime events and prepended, so list order is
/// reverse-chronological by arrival rather than strictly by
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    /// Recipients; targeting is enforced client-side.
    pub user_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    /// Set once the user marks the entry read and the API confirms.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Returns whether this notification targets the given user.
    #[must_use]
    pub fn targets(&self, user: UserId) -> bool {
        self.user_ids.contains(&user)
    }

    /// Returns whether the entry has been marked read.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            id: NotificationId(1),
            message: "PHC #12 created".into(),
            user_ids: vec![UserId(5), UserId(9)],
            created_at: Utc::now(),
            read_at: None,
        }
    }

    #[test]
    fn targeting_checks_membership() {
        let n = sample();
        assert!(n.targets(UserId(5)));
        assert!(n.targets(UserId(9)));
        assert!(!n.targets(UserId(7)));
    }

    #[test]
    fn read_state_follows_read_at() {
        let mut n = sample();
        assert!(!n.is_read());
        n.read_at = Some(Utc::now());
        assert!(n.is_read());
    }

    #[test]
    fn missing_read_at_deserializes_as_unread() {
        let json = r#"{
            "id": 3,
            "message": "invoice requested",
            "user_ids": [4],
            "created_at": "2025-03-01T08:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(json).expect("deserialize");
        assert!(!n.is_read());
        assert_eq!(n.user_ids, vec![UserId(4)]);
    }
}
