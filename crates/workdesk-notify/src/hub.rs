//! The notification hub.
//!
//! Session-lifetime notification state: the in-memory list the
//! notifications screen renders, the set of already-shown log ids, and
//! the toast stream. The hub deliberately outlives any one screen:
//! the dedup set must survive a screen remount so a replayed
//! `log.created` event is still suppressed.

use crate::{ChannelEvent, Toast, ToastSender};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, trace};
use workdesk_api::{ApiError, NotificationApi};
use workdesk_types::{LogId, Notification, NotificationId, UserId};

struct HubState {
    /// Reverse-chronological by arrival: live events prepend.
    list: Vec<Notification>,
    /// Log ids already surfaced this session.
    seen_logs: HashSet<LogId>,
}

/// Session-lifetime notification state.
///
/// # Acceptance Pipeline
///
/// ```text
/// event ──► targets this user? ──► log_id unseen? ──► prepend + toast
///               │ no                   │ no
///               ▼                      ▼
///            dropped                dropped
/// ```
///
/// Accepted events update the list and emit the toast under one lock,
/// so the two are atomic from the UI's point of view.
pub struct NotificationHub {
    user: UserId,
    toasts: ToastSender,
    state: Mutex<HubState>,
}

impl NotificationHub {
    /// Creates an empty hub for the session user.
    #[must_use]
    pub fn new(user: UserId, toasts: ToastSender) -> Self {
        Self {
            user,
            toasts,
            state: Mutex::new(HubState {
                list: Vec::new(),
                seen_logs: HashSet::new(),
            }),
        }
    }

    /// Returns the session user this hub filters for.
    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Seeds the hub with the historical list from the API.
    ///
    /// Entries land behind anything that already arrived live; entries
    /// whose id is already present are skipped.
    pub fn seed(&self, historical: Vec<Notification>) {
        let mut state = self.state.lock();
        for notification in historical {
            if state.list.iter().all(|n| n.id != notification.id) {
                state.list.push(notification);
            }
        }
    }

    /// Runs one inbound event through the acceptance pipeline.
    ///
    /// Returns whether the event became visible. Rejections are
    /// silent by design: wrong-recipient events and replayed log ids
    /// are normal traffic, not errors.
    pub fn accept(&self, event: &ChannelEvent) -> bool {
        if !event.targets(self.user) {
            trace!(user = %self.user, event = %event.event, "event not for this user");
            return false;
        }

        let mut state = self.state.lock();
        if let Some(log_id) = event.log_id {
            if !state.seen_logs.insert(log_id) {
                debug!(%log_id, "duplicate log event dropped");
                return false;
            }
        }

        state.list.insert(0, event.to_notification());
        // Receiver gone means the console is shutting down; the list
        // update above still stands.
        let _ = self.toasts.send(Toast::new(event.message.clone()));
        true
    }

    /// Returns a snapshot of the list, newest arrival first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().list.clone()
    }

    /// Returns the number of unread entries.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.state.lock().list.iter().filter(|n| !n.is_read()).count()
    }

    /// Marks one notification read.
    ///
    /// The API call comes first; `read_at` flips locally only after it
    /// succeeds. On failure the list is left untouched; server and
    /// client may transiently disagree, recoverable by reload. There
    /// is deliberately no optimistic update to roll back.
    pub async fn mark_read(
        &self,
        api: &dyn NotificationApi,
        id: NotificationId,
    ) -> Result<(), ApiError> {
        api.mark_notification_read(id).await?;

        let mut state = self.state.lock();
        if let Some(notification) = state.list.iter_mut().find(|n| n.id == id) {
            notification.read_at = Some(Utc::now());
        }
        Ok(())
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("NotificationHub")
            .field("user", &self.user)
            .field("entries", &state.list.len())
            .field("seen_logs", &state.seen_logs.len())
            .finish()
    }
}
