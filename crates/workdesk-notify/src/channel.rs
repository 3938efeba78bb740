//! Channel naming.
//!
//! The external service exposes three named public channels plus one
//! private channel per user. Wire names are an external contract and
//! must not drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use workdesk_types::UserId;

/// A named realtime channel.
///
/// # Example
///
/// ```
/// use workdesk_notify::ChannelName;
/// use workdesk_types::UserId;
///
/// assert_eq!(ChannelName::PhcCreated.wire(), "phc.created");
/// assert_eq!(ChannelName::User(UserId(7)).wire(), "App.Models.User.7");
/// assert!(ChannelName::User(UserId(7)).is_private());
/// assert!(!ChannelName::LogCreated.is_private());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelName {
    /// Public: a PHC record was created.
    PhcCreated,
    /// Public: an invoice was requested for a project.
    InvoiceRequested,
    /// Public: an activity-log entry was created.
    LogCreated,
    /// Private, per-user: generic notification delivery plus named
    /// approval events. Requires the broadcast auth handshake.
    User(UserId),
}

impl ChannelName {
    /// Returns the wire name of the channel.
    #[must_use]
    pub fn wire(&self) -> String {
        match self {
            Self::PhcCreated => "phc.created".to_string(),
            Self::InvoiceRequested => "request.invoice.created".to_string(),
            Self::LogCreated => "log.created".to_string(),
            Self::User(id) => format!("App.Models.User.{id}"),
        }
    }

    /// Parses a wire name back into a channel.
    ///
    /// Channels this client does not know yield `None`; inbound frames
    /// on them are dropped.
    #[must_use]
    pub fn from_wire(wire: &str) -> Option<Self> {
        match wire {
            "phc.created" => Some(Self::PhcCreated),
            "request.invoice.created" => Some(Self::InvoiceRequested),
            "log.created" => Some(Self::LogCreated),
            _ => wire
                .strip_prefix("App.Models.User.")
                .and_then(|id| id.parse().ok())
                .map(|id: i64| Self::User(UserId(id))),
        }
    }

    /// Returns whether subscribing requires the auth handshake.
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_the_external_contract() {
        assert_eq!(ChannelName::PhcCreated.wire(), "phc.created");
        assert_eq!(ChannelName::InvoiceRequested.wire(), "request.invoice.created");
        assert_eq!(ChannelName::LogCreated.wire(), "log.created");
        assert_eq!(ChannelName::User(UserId(15)).wire(), "App.Models.User.15");
    }

    #[test]
    fn wire_names_parse_back() {
        for channel in [
            ChannelName::PhcCreated,
            ChannelName::InvoiceRequested,
            ChannelName::LogCreated,
            ChannelName::User(UserId(15)),
        ] {
            assert_eq!(ChannelName::from_wire(&channel.wire()), Some(channel));
        }
    }

    #[test]
    fn unknown_wire_names_parse_to_nothing() {
        assert_eq!(ChannelName::from_wire("presence.lobby"), None);
        assert_eq!(ChannelName::from_wire("App.Models.User.not-a-number"), None);
        assert_eq!(ChannelName::from_wire(""), None);
    }

    #[test]
    fn only_user_channels_are_private() {
        assert!(ChannelName::User(UserId(1)).is_private());
        for public in [
            ChannelName::PhcCreated,
            ChannelName::InvoiceRequested,
            ChannelName::LogCreated,
        ] {
            assert!(!public.is_private(), "{public}");
        }
    }
}
