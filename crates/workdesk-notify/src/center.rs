//! The notification center: one subscriber per session.
//!
//! The original client attached its realtime connection to a global
//! object and re-used it ad hoc. Here the subscriber is an owned
//! value: the app constructs one [`NotificationCenter`] when a session
//! is established, hands it the transport and the hub, and disposes it
//! on logout or screen teardown. Disposal releases every subscription,
//! via [`shutdown`](NotificationCenter::shutdown) when awaited and via
//! `Drop` otherwise.

use crate::{
    ChannelName, NotificationHub, NotifyError, RealtimeTransport, EVENT_INVOICE_REQUESTED,
    EVENT_LOG_APPROVAL_UPDATED, EVENT_LOG_CREATED, EVENT_NOTIFICATION, EVENT_PHC_CREATED,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use workdesk_types::UserId;

/// The fixed set of subscriptions opened for an authenticated session.
///
/// Three public channels, each carrying one named event, plus the
/// user's private channel carrying both the generic `notification`
/// delivery and the named approval event.
#[must_use]
pub fn session_subscriptions(user: UserId) -> Vec<(ChannelName, &'static str)> {
    vec![
        (ChannelName::PhcCreated, EVENT_PHC_CREATED),
        (ChannelName::InvoiceRequested, EVENT_INVOICE_REQUESTED),
        (ChannelName::LogCreated, EVENT_LOG_CREATED),
        (ChannelName::User(user), EVENT_NOTIFICATION),
        (ChannelName::User(user), EVENT_LOG_APPROVAL_UPDATED),
    ]
}

/// Owns the session's open subscriptions and their pump tasks.
///
/// Created once per authenticated session lifetime, never per
/// render. Each subscription is moved into a pump task that feeds the
/// hub; stopping the task drops the subscription, whose guard detaches
/// it from the transport.
#[derive(Debug)]
pub struct NotificationCenter {
    hub: Arc<NotificationHub>,
    pumps: Vec<JoinHandle<()>>,
}

impl NotificationCenter {
    /// Opens the fixed subscription set and starts pumping.
    ///
    /// # Errors
    ///
    /// Fails if any subscription cannot be established (including a
    /// refused private-channel handshake). Subscriptions opened before
    /// the failure are released on the spot: nothing is spawned until
    /// the whole set is open, so the `?` drops them and their guards
    /// detach each one from the transport.
    pub async fn start(
        transport: Arc<dyn RealtimeTransport>,
        hub: Arc<NotificationHub>,
    ) -> Result<Self, NotifyError> {
        let mut subscriptions = Vec::new();
        for (channel, event) in session_subscriptions(hub.user()) {
            subscriptions.push(transport.subscribe(channel, event).await?);
        }

        let pumps = subscriptions
            .into_iter()
            .map(|mut subscription| {
                let hub = Arc::clone(&hub);
                tokio::spawn(async move {
                    while let Some(event) = subscription.recv().await {
                        hub.accept(&event);
                    }
                    // Transport gone; the subscription guard runs on drop.
                })
            })
            .collect::<Vec<_>>();

        debug!(user = %hub.user(), subscriptions = pumps.len(), "notification center started");
        Ok(Self { hub, pumps })
    }

    /// Returns the hub this center feeds.
    #[must_use]
    pub fn hub(&self) -> &Arc<NotificationHub> {
        &self.hub
    }

    /// Stops all pumps and waits until every subscription is released.
    pub async fn shutdown(&mut self) {
        for pump in &self.pumps {
            pump.abort();
        }
        for pump in self.pumps.drain(..) {
            // Cancellation surfaces as JoinError; nothing to report.
            let _ = pump.await;
        }
        debug!(user = %self.hub.user(), "notification center shut down");
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        // Release without awaiting: abort schedules cancellation, and
        // each pump drops its subscription when it unwinds.
        for pump in self.pumps.drain(..) {
            pump.abort();
        }
    }
}
