//! Identifier types for Workdesk.
//!
//! The external API uses integer primary keys, so all identifiers are
//! thin integer newtypes. Wrapping them keeps a user id from being
//! passed where a notification id belongs, which matters for the
//! per-recipient targeting checks in the notify layer.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! int_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            #[must_use]
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

int_id! {
    /// Identifier of a user account on the API side.
    ///
    /// Also names the per-user private realtime channel
    /// (`App.Models.User.{id}`).
    ///
    /// # Example
    ///
    /// ```
    /// use workdesk_types::UserId;
    ///
    /// let id = UserId(9);
    /// assert_eq!(id.value(), 9);
    /// assert_eq!(id.to_string(), "9");
    /// ```
    UserId
}

int_id! {
    /// Identifier of a notification record.
    NotificationId
}

int_id! {
    /// Identifier of an activity-log entry.
    ///
    /// Live `log.created` events carry this id; the notify layer keeps a
    /// session-lifetime set of already-shown log ids to suppress
    /// duplicate deliveries.
    LogId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_transparent_in_serde() {
        let id = UserId(42);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "42");

        let back: UserId = serde_json::from_str("42").expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(LogId(7), LogId::from(7));
        assert_ne!(NotificationId(1), NotificationId(2));
    }

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(NotificationId(15).to_string(), "15");
        assert_eq!(LogId(-1).to_string(), "-1");
    }
}
