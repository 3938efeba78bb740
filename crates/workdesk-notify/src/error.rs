//! Notify layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NotifyError::Connect`] | `NOTIFY_CONNECT` | Yes |
//! | [`NotifyError::Handshake`] | `NOTIFY_HANDSHAKE` | No |
//! | [`NotifyError::Subscribe`] | `NOTIFY_SUBSCRIBE` | Yes |
//! | [`NotifyError::TransportClosed`] | `NOTIFY_TRANSPORT_CLOSED` | Yes |

use thiserror::Error;
use workdesk_types::ErrorCode;

/// Errors raised by the realtime subscription layer.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The connection to the realtime service could not be opened.
    #[error("realtime connect failed for {url}: {reason}")]
    Connect {
        url: String,
        reason: String,
    },

    /// The private-channel auth handshake was refused.
    #[error("broadcast auth handshake failed for {channel}: {reason}")]
    Handshake {
        /// Wire name of the channel that was refused.
        channel: String,
        reason: String,
    },

    /// A subscription could not be established.
    #[error("subscribe failed for {channel}: {reason}")]
    Subscribe {
        channel: String,
        reason: String,
    },

    /// The transport connection went away.
    #[error("realtime transport closed")]
    TransportClosed,
}

impl ErrorCode for NotifyError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "NOTIFY_CONNECT",
            Self::Handshake { .. } => "NOTIFY_HANDSHAKE",
            Self::Subscribe { .. } => "NOTIFY_SUBSCRIBE",
            Self::TransportClosed => "NOTIFY_TRANSPORT_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Connect { .. } => true,
            Self::Handshake { .. } => false,
            Self::Subscribe { .. } => true,
            Self::TransportClosed => true,
        }
    }
}
