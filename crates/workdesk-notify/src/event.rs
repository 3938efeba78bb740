//! Inbound event shape.

use crate::ChannelName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workdesk_types::{LogId, Notification, NotificationId, UserId};

/// Named event: a PHC record was created.
pub const EVENT_PHC_CREATED: &str = "phc.created";
/// Named event: an invoice was requested.
pub const EVENT_INVOICE_REQUESTED: &str = "request.invoice.created";
/// Named event: an activity-log entry was created. Carries a `log_id`.
pub const EVENT_LOG_CREATED: &str = "log.created";
/// Named event on the private channel: a log approval changed.
pub const EVENT_LOG_APPROVAL_UPDATED: &str = "log.approval.updated";
/// Generic delivery on the private channel.
///
/// The original client handled this and the named private events with
/// overlapping logic; whether that redundancy was intended is a
/// product question. Here they are distinct event classes sharing one
/// normalization path, so a single inbound payload is never handled
/// twice.
pub const EVENT_NOTIFICATION: &str = "notification";

/// A normalized inbound realtime event.
///
/// The service delivers each event on one channel under one event
/// name; alongside the broadcast the backend persists a notification
/// row, whose id travels with the event so historical and live entries
/// line up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Channel the event arrived on.
    pub channel: ChannelName,
    /// Wire event name (one of the `EVENT_*` constants).
    pub event: String,
    /// Server-assigned id of the persisted notification row.
    pub notification_id: NotificationId,
    /// Human-readable message, shown verbatim in list and toast.
    pub message: String,
    /// Recipients; enforced client-side.
    pub user_ids: Vec<UserId>,
    /// Present only on `log.created` events; drives deduplication.
    #[serde(default)]
    pub log_id: Option<LogId>,
    pub created_at: DateTime<Utc>,
}

impl ChannelEvent {
    /// Returns whether this event targets the given user.
    #[must_use]
    pub fn targets(&self, user: UserId) -> bool {
        self.user_ids.contains(&user)
    }

    /// Normalizes the event into a notification record.
    #[must_use]
    pub fn to_notification(&self) -> Notification {
        Notification {
            id: self.notification_id,
            message: self.message.clone(),
            user_ids: self.user_ids.clone(),
            created_at: self.created_at,
            read_at: None,
        }
    }
}
