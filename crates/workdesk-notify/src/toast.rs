//! Transient toasts.
//!
//! A toast is the fire-and-forget half of an accepted event; the
//! durable half is the list entry in the hub. Consumers receive toasts
//! over an unbounded channel and are responsible for the display
//! timer.

use std::time::Duration;
use tokio::sync::mpsc;

/// Fixed display duration for every toast.
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// A transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// Always [`TOAST_DURATION`]; carried so renderers need no import.
    pub duration: Duration,
}

impl Toast {
    /// Creates a toast with the fixed display duration.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: TOAST_DURATION,
        }
    }
}

/// Sending half of the toast stream.
pub type ToastSender = mpsc::UnboundedSender<Toast>;
/// Receiving half of the toast stream.
pub type ToastReceiver = mpsc::UnboundedReceiver<Toast>;

/// Creates the toast stream connecting the hub to the renderer.
#[must_use]
pub fn toast_channel() -> (ToastSender, ToastReceiver) {
    mpsc::unbounded_channel()
}
