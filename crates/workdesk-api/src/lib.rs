//! REST client for the Workdesk backend.
//!
//! The backend owns all business logic; this crate is the thin,
//! well-typed edge the console talks through. It contributes exactly
//! three things:
//!
//! - [`ApiClient`]: endpoint methods with bearer authentication
//! - [`ApiError`]: the error taxonomy every screen handles the same
//!   way (401 forces logout, 422 maps to per-field messages, anything
//!   else degrades to a generic alert)
//! - [`NotificationApi`]: the seam the notify layer mocks in tests
//!
//! # Error Contract
//!
//! | HTTP | Mapped to | Console behavior |
//! |------|-----------|------------------|
//! | 401 | [`ApiError::Unauthorized`] | clear session, redirect to login |
//! | 422 | [`ApiError::Validation`] | per-field messages next to inputs |
//! | other non-2xx | [`ApiError::Status`] | generic alert |
//! | transport | [`ApiError::Network`] | generic alert, no retry |
//! | bad body | [`ApiError::Decode`] | generic alert |

mod client;
mod error;
mod model;
mod traits;

pub use client::{ApiClient, BoqUpdate, BroadcastAuthResponse, ClientPayload};
pub use error::{ApiError, ValidationErrors};
pub use model::{
    BoqItem, ClientRecord, LoginRequest, LoginResponse, OutstandingProject, Phc, PhcStep,
    StatusProject, WorkOrderSummary,
};
pub use traits::NotificationApi;
