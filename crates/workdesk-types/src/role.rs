//! Role and capability model.
//!
//! The API reports a user's role as a bare string. The client never
//! branches on that string directly; it first resolves the role to a
//! [`Capability`], a closed enumeration that drives menu visibility and
//! field-edit rights. The resolution table is static configuration and
//! fails closed: any role it does not know yields no capability, which
//! renders as an empty menu.
//!
//! # Resolution Table
//!
//! | Role string | Capability |
//! |-------------|------------|
//! | `marketing`, `estimator`, `super_admin` | [`Capability::Marketing`] |
//! | `engineer`, `site_engineer`, `supervisor` | [`Capability::Engineer`] |
//! | anything else | none |
//!
//! # Example
//!
//! ```
//! use workdesk_types::{Capability, Role};
//!
//! let role = Role::new("engineer");
//! assert_eq!(role.capability(), Some(Capability::Engineer));
//!
//! // Unknown roles resolve to no capability, never an error.
//! let future = Role::new("auditor_v2");
//! assert_eq!(future.capability(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque role identifier as received from the API.
///
/// Input is untrusted: the server may introduce roles this client has
/// never heard of. Comparison helpers exist for the route guard's
/// allow-lists, but all visibility decisions go through
/// [`capability`](Self::capability).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Creates a role from its wire name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the raw role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Resolves this role to a capability.
    ///
    /// Pure, total and fail-closed: unknown roles return `None` and the
    /// caller renders nothing for them. This function never panics.
    #[must_use]
    pub fn capability(&self) -> Option<Capability> {
        match self.0.as_str() {
            "marketing" | "estimator" | "super_admin" => Some(Capability::Marketing),
            "engineer" | "site_engineer" | "supervisor" => Some(Capability::Engineer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Coarse data-entry capability within shared screens.
///
/// Exactly one of two values; a session with neither sees an empty
/// menu. The capability decides which inline fields are editable:
/// progress fields belong to engineering, monetary-portion fields are
/// recomputed only from marketing edits.
///
/// # Example
///
/// ```
/// use workdesk_types::Capability;
///
/// assert!(Capability::Engineer.can_edit_progress());
/// assert!(!Capability::Engineer.recomputes_monetary());
/// assert!(Capability::Marketing.recomputes_monetary());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Marketing portion: client records, quotations, monetary fields.
    Marketing,
    /// Engineering portion: BOQ progress, PHC, man-power allocation.
    Engineer,
}

impl Capability {
    /// Whether holders may edit progress fields in shared grids.
    #[must_use]
    pub fn can_edit_progress(self) -> bool {
        matches!(self, Self::Engineer)
    }

    /// Whether edits by holders recompute monetary-portion fields.
    #[must_use]
    pub fn recomputes_monetary(self) -> bool {
        matches!(self, Self::Marketing)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Marketing => "marketing",
            Self::Engineer => "engineer",
        };
        write!(f, "{name}")
    }
}
