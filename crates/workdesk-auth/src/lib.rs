//! Authentication state for the Workdesk client.
//!
//! This crate owns the three pieces of cross-cutting auth logic:
//!
//! - [`Session`]: the authenticated user profile plus bearer token,
//!   always handled as one unit.
//! - [`SessionStore`]: persisted client storage for the session with a
//!   fixed expiry window ([`FileSessionStore`] on disk,
//!   [`MemorySessionStore`] for tests).
//! - [`guard`]: the per-route authorization decision
//!   ([`GuardDecision`]), a pure synchronous function over the locally
//!   persisted session.
//!
//! # Authorization State Machine
//!
//! ```text
//!                    ┌──────────────────┐
//!   no session ────► │ RedirectToLogin  │  (return_to preserved)
//!                    └──────────────────┘
//!                    ┌──────────────────┐
//!   role not in ───► │ RedirectUnauth.  │
//!   allow-list       └──────────────────┘
//!                    ┌──────────────────┐
//!   otherwise  ────► │     Render       │
//!                    └──────────────────┘
//! ```
//!
//! The guard trusts local state and performs no network call of its
//! own; an expired token is detected by the API layer (HTTP 401), which
//! clears the session and forces the login redirect globally.

mod error;
mod guard;
mod session;
mod store;

pub use error::AuthError;
pub use guard::{guard, GuardDecision, RouteSpec};
pub use session::Session;
pub use store::{default_session_ttl, FileSessionStore, MemorySessionStore, SessionStore};
