//! Application layer of the Workdesk console.
//!
//! Composes the auth, API and notify crates into the pieces screens
//! actually consume:
//!
//! ```text
//!               ┌────────────────┐
//!   store ─────►│ SessionContext │◄──── ApiClient (bearer token)
//!               └───────┬────────┘
//!                       │ watch<Option<Session>>
//!          ┌────────────┼──────────────┐
//!          ▼            ▼              ▼
//!     menu_for    ScreenRegistry   NotificationCenter
//!    (capability)   (guarded)      (via connect_notifications)
//! ```
//!
//! The session is the only cross-screen shared mutable resource; it is
//! read often and written rarely (login, logout, forced logout), which
//! is what the `watch` channel models. Everything else a screen holds
//! is local [`LoadState`]/[`FormState`] plumbing.

mod context;
mod crud;
mod error;
mod menu;
mod realtime;
mod registry;

pub use context::SessionContext;
pub use crud::{boq_update_for, FormState, LoadState, REQUIRED_MESSAGE};
pub use error::AppError;
pub use menu::{menu_for, MenuGroup, MenuItem};
pub use realtime::{connect_notifications, ApiBroadcastAuth};
pub use registry::{Navigation, ScreenRegistry};
