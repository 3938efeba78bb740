//! Websocket transport for the broadcast service.
//!
//! Speaks the service's wire protocol over one websocket connection:
//!
//! 1. On connect the service announces a `socket_id` in a
//!    `pusher:connection_established` frame.
//! 2. Channels are joined with `pusher:subscribe` frames; private
//!    channels attach the signature obtained from [`BroadcastAuth`]
//!    (backed by `POST /broadcasting/auth` with the session bearer).
//! 3. Application events arrive as `{event, channel, data}` frames
//!    where `data` is a JSON-encoded string payload.
//!
//! The service is joined once per **channel**; local [`Subscription`]s
//! fan events out per (channel, event) topic. When the last
//! subscription on a channel is released, a `pusher:unsubscribe` frame
//! leaves it. Frames this client cannot decode are dropped, not
//! errors: the service multiplexes traffic for every client version.

use crate::{
    BroadcastAuth, ChannelEvent, ChannelName, NotifyError, RealtimeTransport, Subscription,
};
use async_trait::async_trait;
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use uuid::Uuid;
use workdesk_types::{LogId, NotificationId, UserId};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

const EVENT_CONNECTION_ESTABLISHED: &str = "pusher:connection_established";
const EVENT_SUBSCRIBE: &str = "pusher:subscribe";
const EVENT_UNSUBSCRIBE: &str = "pusher:unsubscribe";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Topic = (String, String);
type Subscribers = HashMap<Uuid, mpsc::UnboundedSender<ChannelEvent>>;

/// Outer shape of every frame on the wire.
#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectionEstablished {
    socket_id: String,
}

/// Inner payload of an application event frame.
#[derive(Debug, Deserialize)]
struct WirePayload {
    notification_id: NotificationId,
    message: String,
    user_ids: Vec<UserId>,
    #[serde(default)]
    log_id: Option<LogId>,
    created_at: chrono::DateTime<chrono::Utc>,
}

fn decode_event(frame: &Frame) -> Option<ChannelEvent> {
    if frame.event.starts_with("pusher:") {
        return None;
    }
    let channel = ChannelName::from_wire(frame.channel.as_deref()?)?;
    let payload: WirePayload = serde_json::from_str(frame.data.as_deref()?).ok()?;

    Some(ChannelEvent {
        channel,
        event: frame.event.clone(),
        notification_id: payload.notification_id,
        message: payload.message,
        user_ids: payload.user_ids,
        log_id: payload.log_id,
        created_at: payload.created_at,
    })
}

fn subscribe_frame(channel: &str, auth: Option<&str>) -> String {
    let mut data = serde_json::json!({ "channel": channel });
    if let Some(signature) = auth {
        data["auth"] = serde_json::Value::String(signature.to_string());
    }
    serde_json::json!({ "event": EVENT_SUBSCRIBE, "data": data }).to_string()
}

fn unsubscribe_frame(channel: &str) -> String {
    serde_json::json!({ "event": EVENT_UNSUBSCRIBE, "data": { "channel": channel } }).to_string()
}

struct Shared {
    /// Local fan-out per (channel, event) topic.
    topics: Mutex<HashMap<Topic, Subscribers>>,
    /// Live subscription count per channel wire name.
    channels: Mutex<HashMap<String, usize>>,
    outbound: mpsc::UnboundedSender<Message>,
}

impl Shared {
    fn send(&self, message: Message) -> Result<(), NotifyError> {
        self.outbound
            .send(message)
            .map_err(|_| NotifyError::TransportClosed)
    }
}

fn dispatch(shared: &Shared, text: &str) {
    let Ok(frame) = serde_json::from_str::<Frame>(text) else {
        debug!("undecodable frame dropped");
        return;
    };
    let Some(event) = decode_event(&frame) else {
        return;
    };

    let topic = (event.channel.wire(), event.event.clone());
    let mut topics = shared.topics.lock();
    if let Some(subscribers) = topics.get_mut(&topic) {
        subscribers.retain(|_, tx| tx.send(event.clone()).is_ok());
    }
}

async fn await_established(source: &mut SplitStream<WsStream>, url: &str) -> Result<String, NotifyError> {
    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(_) => continue,
            Err(err) => {
                return Err(NotifyError::Connect {
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            }
        };
        let Ok(frame) = serde_json::from_str::<Frame>(&text) else {
            continue;
        };
        if frame.event == EVENT_CONNECTION_ESTABLISHED {
            let established: ConnectionEstablished =
                serde_json::from_str(frame.data.as_deref().unwrap_or_default()).map_err(|err| {
                    NotifyError::Connect {
                        url: url.to_string(),
                        reason: format!("bad handshake payload: {err}"),
                    }
                })?;
            return Ok(established.socket_id);
        }
    }
    Err(NotifyError::TransportClosed)
}

/// Transport over a live websocket connection to the broadcast
/// service.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use workdesk_notify::{ChannelName, NotifyError, RealtimeTransport, WebSocketTransport};
///
/// # async fn example() -> Result<(), NotifyError> {
/// let transport = WebSocketTransport::connect("ws://realtime.example.test/app/key", None).await?;
/// let mut sub = transport
///     .subscribe(ChannelName::PhcCreated, "phc.created")
///     .await?;
/// while let Some(event) = sub.recv().await {
///     println!("{}", event.message);
/// }
/// # Ok(())
/// # }
/// ```
pub struct WebSocketTransport {
    shared: Arc<Shared>,
    socket_id: String,
    auth: Option<Arc<dyn BroadcastAuth>>,
}

impl WebSocketTransport {
    /// Dials the service and completes the connection handshake.
    ///
    /// Private channels need `auth`; without it they are refused
    /// locally.
    ///
    /// # Errors
    ///
    /// [`NotifyError::Connect`] when the dial or handshake fails or
    /// times out.
    pub async fn connect(
        url: &str,
        auth: Option<Arc<dyn BroadcastAuth>>,
    ) -> Result<Self, NotifyError> {
        let connect = tokio::time::timeout(HANDSHAKE_TIMEOUT, connect_async(url));
        let (stream, _response) = connect
            .await
            .map_err(|_| NotifyError::Connect {
                url: url.to_string(),
                reason: "connect timed out".into(),
            })?
            .map_err(|err| NotifyError::Connect {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        let (mut sink, mut source) = stream.split();
        let socket_id =
            tokio::time::timeout(HANDSHAKE_TIMEOUT, await_established(&mut source, url))
                .await
                .map_err(|_| NotifyError::Connect {
                    url: url.to_string(),
                    reason: "handshake timed out".into(),
                })??;

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let shared = Arc::new(Shared {
            topics: Mutex::new(HashMap::new()),
            channels: Mutex::new(HashMap::new()),
            outbound,
        });

        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if sink.send(message).await.is_err() {
                    break;
                }
            }
        });

        let reader_shared = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => dispatch(&reader_shared, &text),
                    Ok(Message::Ping(payload)) => {
                        let _ = reader_shared.send(Message::Pong(payload));
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            warn!("realtime connection closed");
            // Dropping the senders ends every subscription's recv().
            reader_shared.topics.lock().clear();
        });

        debug!(%socket_id, "realtime connection established");
        Ok(Self {
            shared,
            socket_id,
            auth,
        })
    }

    /// Returns the socket id announced by the service.
    #[must_use]
    pub fn socket_id(&self) -> &str {
        &self.socket_id
    }

    fn abandon_channel(&self, wire: &str) {
        let mut channels = self.shared.channels.lock();
        if let Some(count) = channels.get_mut(wire) {
            *count -= 1;
            if *count == 0 {
                channels.remove(wire);
            }
        }
    }
}

#[async_trait]
impl RealtimeTransport for WebSocketTransport {
    async fn subscribe(
        &self,
        channel: ChannelName,
        event: &str,
    ) -> Result<Subscription, NotifyError> {
        let wire = channel.wire();

        let signature = if channel.is_private() {
            let auth = self.auth.as_ref().ok_or_else(|| NotifyError::Handshake {
                channel: wire.clone(),
                reason: "no authorizer configured for private channels".into(),
            })?;
            Some(auth.authorize(&self.socket_id, &wire).await?)
        } else {
            None
        };

        // Join the service once per channel; further subscriptions on
        // the same channel fan out locally.
        let first_on_channel = {
            let mut channels = self.shared.channels.lock();
            let count = channels.entry(wire.clone()).or_insert(0);
            *count += 1;
            *count == 1
        };
        if first_on_channel {
            let frame = Message::Text(subscribe_frame(&wire, signature.as_deref()));
            if self.shared.send(frame).is_err() {
                self.abandon_channel(&wire);
                return Err(NotifyError::Subscribe {
                    channel: wire,
                    reason: "connection closed".into(),
                });
            }
        }

        let id = Uuid::new_v4();
        let topic = (wire, event.to_string());
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared
            .topics
            .lock()
            .entry(topic.clone())
            .or_default()
            .insert(id, tx);

        let shared = Arc::clone(&self.shared);
        let release = move || {
            {
                let mut topics = shared.topics.lock();
                if let Some(subscribers) = topics.get_mut(&topic) {
                    subscribers.remove(&id);
                    if subscribers.is_empty() {
                        topics.remove(&topic);
                    }
                }
            }

            let mut channels = shared.channels.lock();
            if let Some(count) = channels.get_mut(&topic.0) {
                *count -= 1;
                if *count == 0 {
                    channels.remove(&topic.0);
                    // Best effort: the connection may already be gone.
                    let _ = shared.send(Message::Text(unsubscribe_frame(&topic.0)));
                }
            }
        };

        Ok(Subscription::new(channel, event, rx, release))
    }
}
