//! Realtime notifications for the Workdesk client.
//!
//! After login the console opens a fixed set of subscriptions against
//! the external realtime channel service and translates inbound events
//! into user-visible notifications. This crate owns that whole path:
//!
//! ```text
//! RealtimeTransport ──► Subscription ──► NotificationCenter (pump)
//!                                             │
//!                                             ▼
//!                                      NotificationHub
//!                                       │          │
//!                             list prepend        Toast
//! ```
//!
//! # Invariants
//!
//! - Subscriptions are opened **once per authenticated session**, not
//!   per render; [`NotificationCenter`] is an owned, injected value
//!   created at login and disposed at logout.
//! - An event is accepted only when the session user's id appears in
//!   its `user_ids` (per-recipient targeting is enforced client-side).
//! - Events carrying a `log_id` are deduplicated against a
//!   session-lifetime set; the set lives in [`NotificationHub`], which
//!   survives screen remounts, so a replayed event after resubscribe
//!   is still dropped.
//! - Every accepted event atomically (from the UI's point of view)
//!   prepends a notification and emits one fixed-duration toast.
//! - Releasing subscriptions on teardown is guaranteed: each
//!   [`Subscription`] carries a guard that detaches it from the
//!   transport on drop. A leaked subscription would double-deliver on
//!   remount, which is a correctness bug, not a cosmetic one.

mod center;
mod channel;
mod error;
mod event;
mod hub;
mod toast;
mod transport;
mod ws;

pub use center::{session_subscriptions, NotificationCenter};
pub use channel::ChannelName;
pub use error::NotifyError;
pub use event::{
    ChannelEvent, EVENT_INVOICE_REQUESTED, EVENT_LOG_APPROVAL_UPDATED, EVENT_LOG_CREATED,
    EVENT_NOTIFICATION, EVENT_PHC_CREATED,
};
pub use hub::NotificationHub;
pub use toast::{toast_channel, Toast, ToastReceiver, ToastSender, TOAST_DURATION};
pub use transport::{BroadcastAuth, InMemoryTransport, RealtimeTransport, Subscription};
pub use ws::WebSocketTransport;
