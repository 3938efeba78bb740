//! Seams the upper layers depend on.
//!
//! The notify layer must be testable without HTTP, so the two
//! notification operations it needs sit behind a dyn-usable trait that
//! [`ApiClient`](crate::ApiClient) implements and tests mock.

use crate::ApiError;
use async_trait::async_trait;
use workdesk_types::{Notification, NotificationId};

/// Notification operations used by the notification hub.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Fetches the historical notification list.
    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    /// Marks one notification read on the server.
    ///
    /// The caller flips `read_at` locally only when this returns `Ok`;
    /// on error the local list stays untouched (no optimistic update).
    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError>;
}
