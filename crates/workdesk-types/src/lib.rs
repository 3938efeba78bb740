//! Core types for the Workdesk client.
//!
//! This crate is the bottom of the workspace: identifier types, the
//! role/capability model, shared wire records and the [`ErrorCode`]
//! contract implemented by every error enum in the workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! workdesk-cli ──► workdesk-app ──► workdesk-notify
//!                      │                  │
//!                      ▼                  ▼
//!                 workdesk-auth      workdesk-api
//!                      │                  │
//!                      └────► workdesk-types ◄────┘
//! ```
//!
//! # Role vs Capability
//!
//! A [`Role`] is the opaque string the API reports for a user. It is
//! untrusted input: future roles may appear at any time. A
//! [`Capability`] is the closed, client-side enumeration derived from a
//! role that decides which menus and editable fields a session gets.
//! Unknown roles deliberately map to no capability at all (fail-closed).

mod error;
mod id;
mod record;
mod role;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{LogId, NotificationId, UserId};
pub use record::{Notification, User};
pub use role::{Capability, Role};
