//! Transport abstraction and the in-memory implementation.
//!
//! The external realtime service is an injected collaborator, never a
//! process-global. A [`RealtimeTransport`] hands out [`Subscription`]s
//! whose release is tied to ownership: dropping a subscription (or its
//! owning task) detaches the receiver from the transport. That is what
//! makes teardown-on-unmount a guarantee instead of a convention: a
//! receiver that outlives its screen would double-deliver after
//! remount.

use crate::{ChannelEvent, ChannelName, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Auth handshake for private channels.
///
/// Implemented in the app layer by delegating to the backend's
/// `/broadcasting/auth` endpoint with the session bearer token; the
/// returned string is the opaque signature the service verifies.
#[async_trait]
pub trait BroadcastAuth: Send + Sync {
    /// Authorizes this connection for one private channel.
    async fn authorize(&self, socket_id: &str, channel: &str) -> Result<String, NotifyError>;
}

/// A realtime connection that can open named subscriptions.
///
/// One subscription targets one named channel and one named event;
/// the fixed per-session set is described by
/// [`session_subscriptions`](crate::session_subscriptions).
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Opens a subscription for `event` on `channel`.
    ///
    /// Private channels perform the auth handshake first.
    async fn subscribe(
        &self,
        channel: ChannelName,
        event: &str,
    ) -> Result<Subscription, NotifyError>;
}

/// One open subscription: a receiver plus its release action.
///
/// Release is guaranteed: it runs on [`unsubscribe`](Self::unsubscribe)
/// or on drop, whichever comes first, exactly once.
pub struct Subscription {
    channel: ChannelName,
    event: String,
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Assembles a subscription from its parts. Intended for transport
    /// implementations.
    #[must_use]
    pub fn new(
        channel: ChannelName,
        event: impl Into<String>,
        rx: mpsc::UnboundedReceiver<ChannelEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            channel,
            event: event.into(),
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// Returns the subscribed channel.
    #[must_use]
    pub fn channel(&self) -> ChannelName {
        self.channel
    }

    /// Returns the subscribed event name.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Awaits the next event; `None` once the transport is gone.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.rx.recv().await
    }

    /// Explicitly releases the subscription.
    ///
    /// Equivalent to dropping, spelled out for teardown paths where
    /// the release should be visible in the code.
    pub fn unsubscribe(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            debug!(channel = %self.channel, event = %self.event, "subscription released");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

type Topic = (String, String);
type Subscribers = HashMap<Uuid, mpsc::UnboundedSender<ChannelEvent>>;

#[derive(Default)]
struct Registry {
    topics: Mutex<HashMap<Topic, Subscribers>>,
}

/// In-process transport backed by per-topic sender maps.
///
/// Used by tests and local demos; it honors the same contract as a
/// networked implementation, including the private-channel handshake
/// when an authorizer is attached, and duplicate delivery to duplicate
/// subscriptions (the failure mode correct teardown exists to avoid).
///
/// # Example
///
/// ```
/// use workdesk_notify::{ChannelName, InMemoryTransport, RealtimeTransport};
/// # use workdesk_notify::{ChannelEvent, EVENT_PHC_CREATED};
/// # use workdesk_types::{NotificationId, UserId};
///
/// # async fn example() {
/// let transport = InMemoryTransport::new();
/// let mut sub = transport
///     .subscribe(ChannelName::PhcCreated, EVENT_PHC_CREATED)
///     .await
///     .expect("subscribe");
///
/// transport.publish(ChannelEvent {
///     channel: ChannelName::PhcCreated,
///     event: EVENT_PHC_CREATED.into(),
///     notification_id: NotificationId(1),
///     message: "PHC #1 created".into(),
///     user_ids: vec![UserId(5)],
///     log_id: None,
///     created_at: chrono::Utc::now(),
/// });
///
/// let event = sub.recv().await.expect("event");
/// assert_eq!(event.message, "PHC #1 created");
/// # }
/// ```
pub struct InMemoryTransport {
    registry: Arc<Registry>,
    socket_id: String,
    auth: Option<Arc<dyn BroadcastAuth>>,
}

impl InMemoryTransport {
    /// Creates a transport without private-channel verification.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            socket_id: Uuid::new_v4().to_string(),
            auth: None,
        }
    }

    /// Creates a transport that performs the handshake for private
    /// channels via the given authorizer.
    #[must_use]
    pub fn with_auth(auth: Arc<dyn BroadcastAuth>) -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            socket_id: Uuid::new_v4().to_string(),
            auth: Some(auth),
        }
    }

    /// Returns this connection's socket id (used in the handshake).
    #[must_use]
    pub fn socket_id(&self) -> &str {
        &self.socket_id
    }

    /// Delivers an event to every live subscriber of its topic.
    ///
    /// Returns the number of receivers the event reached.
    pub fn publish(&self, event: ChannelEvent) -> usize {
        let topic = (event.channel.wire(), event.event.clone());
        let mut delivered = 0;

        let mut topics = self.registry.topics.lock();
        if let Some(subscribers) = topics.get_mut(&topic) {
            subscribers.retain(|_, tx| tx.send(event.clone()).is_ok());
            delivered = subscribers.len();
        }
        delivered
    }

    /// Returns the live subscriber count for one topic.
    #[must_use]
    pub fn subscriber_count(&self, channel: &ChannelName, event: &str) -> usize {
        let topic = (channel.wire(), event.to_string());
        self.registry
            .topics
            .lock()
            .get(&topic)
            .map_or(0, Subscribers::len)
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeTransport for InMemoryTransport {
    async fn subscribe(
        &self,
        channel: ChannelName,
        event: &str,
    ) -> Result<Subscription, NotifyError> {
        if channel.is_private() {
            if let Some(auth) = &self.auth {
                auth.authorize(&self.socket_id, &channel.wire()).await?;
            }
        }

        let topic = (channel.wire(), event.to_string());
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        self.registry
            .topics
            .lock()
            .entry(topic.clone())
            .or_default()
            .insert(id, tx);

        let registry = Arc::clone(&self.registry);
        let release = move || {
            let mut topics = registry.topics.lock();
            if let Some(subscribers) = topics.get_mut(&topic) {
                subscribers.remove(&id);
                if subscribers.is_empty() {
                    topics.remove(&topic);
                }
            }
        };

        Ok(Subscription::new(channel, event, rx, release))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EVENT_LOG_CREATED;
    use chrono::Utc;
    use workdesk_types::{LogId, NotificationId, UserId};

    fn log_event(log_id: i64) -> ChannelEvent {
        ChannelEvent {
            channel: ChannelName::LogCreated,
            event: EVENT_LOG_CREATED.into(),
            notification_id: NotificationId(log_id),
            message: format!("Log #{log_id} created"),
            user_ids: vec![UserId(5)],
            log_id: Some(LogId(log_id)),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let transport = InMemoryTransport::new();
        let mut sub = transport
            .subscribe(ChannelName::LogCreated, EVENT_LOG_CREATED)
            .await
            .expect("subscribe");

        assert_eq!(transport.publish(log_event(1)), 1);
        assert_eq!(sub.recv().await.expect("event").log_id, Some(LogId(1)));
    }

    #[tokio::test]
    async fn publish_to_unsubscribed_topic_reaches_nobody() {
        let transport = InMemoryTransport::new();
        assert_eq!(transport.publish(log_event(1)), 0);
    }

    #[tokio::test]
    async fn drop_releases_the_subscription() {
        let transport = InMemoryTransport::new();
        let sub = transport
            .subscribe(ChannelName::LogCreated, EVENT_LOG_CREATED)
            .await
            .expect("subscribe");
        assert_eq!(transport.subscriber_count(&ChannelName::LogCreated, EVENT_LOG_CREATED), 1);

        drop(sub);
        assert_eq!(transport.subscriber_count(&ChannelName::LogCreated, EVENT_LOG_CREATED), 0);
        assert_eq!(transport.publish(log_event(2)), 0);
    }

    #[tokio::test]
    async fn explicit_unsubscribe_matches_drop() {
        let transport = InMemoryTransport::new();
        let sub = transport
            .subscribe(ChannelName::PhcCreated, "phc.created")
            .await
            .expect("subscribe");

        sub.unsubscribe();
        assert_eq!(transport.subscriber_count(&ChannelName::PhcCreated, "phc.created"), 0);
    }

    #[tokio::test]
    async fn duplicate_subscriptions_double_deliver() {
        // This is the remount bug guaranteed release exists to prevent:
        // two live subscriptions to one topic each get the event.
        let transport = InMemoryTransport::new();
        let mut first = transport
            .subscribe(ChannelName::LogCreated, EVENT_LOG_CREATED)
            .await
            .expect("subscribe");
        let mut second = transport
            .subscribe(ChannelName::LogCreated, EVENT_LOG_CREATED)
            .await
            .expect("subscribe");

        assert_eq!(transport.publish(log_event(3)), 2);
        assert!(first.recv().await.is_some());
        assert!(second.recv().await.is_some());
    }

    struct RecordingAuth {
        calls: Mutex<Vec<String>>,
        deny: bool,
    }

    #[async_trait]
    impl BroadcastAuth for RecordingAuth {
        async fn authorize(&self, _socket_id: &str, channel: &str) -> Result<String, NotifyError> {
            self.calls.lock().push(channel.to_string());
            if self.deny {
                Err(NotifyError::Handshake {
                    channel: channel.to_string(),
                    reason: "denied".into(),
                })
            } else {
                Ok("signature".into())
            }
        }
    }

    #[tokio::test]
    async fn private_channel_performs_handshake() {
        let auth = Arc::new(RecordingAuth {
            calls: Mutex::new(Vec::new()),
            deny: false,
        });
        let transport = InMemoryTransport::with_auth(auth.clone());

        transport
            .subscribe(ChannelName::User(UserId(7)), "notification")
            .await
            .expect("subscribe");
        assert_eq!(auth.calls.lock().as_slice(), ["App.Models.User.7"]);

        // Public channels skip the handshake.
        transport
            .subscribe(ChannelName::PhcCreated, "phc.created")
            .await
            .expect("subscribe");
        assert_eq!(auth.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn denied_handshake_fails_the_subscribe() {
        let auth = Arc::new(RecordingAuth {
            calls: Mutex::new(Vec::new()),
            deny: true,
        });
        let transport = InMemoryTransport::with_auth(auth);

        let err = transport
            .subscribe(ChannelName::User(UserId(7)), "notification")
            .await
            .expect_err("should fail");
        assert!(matches!(err, NotifyError::Handshake { .. }));
        assert_eq!(
            transport.subscriber_count(&ChannelName::User(UserId(7)), "notification"),
            0
        );
    }
}
