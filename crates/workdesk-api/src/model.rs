//! Resource models for the backend API.
//!
//! Shapes mirror the wire format; the backend owns their semantics.
//! Optional columns default so older records deserialize cleanly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workdesk_types::User;

/// Credentials posted to `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload: bearer token plus the user profile the
/// client caches next to it.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// A client (customer) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    /// Person in charge.
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One line of a project's bill of quantity.
///
/// `progress` belongs to the engineering portion; `unit_price` and the
/// derived `amount` belong to marketing. Which side may edit what is
/// decided by the session capability, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqItem {
    pub id: i64,
    /// Project number the line belongs to.
    pub pn: String,
    pub item: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub qty: f64,
    pub unit_price: f64,
    /// Completion percentage, 0..=100.
    pub progress: f64,
    /// qty × unit_price, recomputed server-side on marketing edits.
    pub amount: f64,
}

/// A row of the project status table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusProject {
    pub pn: String,
    pub name: String,
    #[serde(default)]
    pub client: Option<String>,
    /// Weighted completion percentage across BOQ lines.
    pub progress: f64,
    pub status: String,
}

/// One checklist step of a project handover checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhcStep {
    pub title: String,
    pub done: bool,
}

/// Project Handover Checklist: the multi-step internal approval record
/// handed from marketing to engineering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phc {
    pub id: i64,
    pub pn: String,
    pub project_name: String,
    #[serde(default)]
    pub steps: Vec<PhcStep>,
    #[serde(default)]
    pub approved_marketing: bool,
    #[serde(default)]
    pub approved_engineering: bool,
    pub created_at: DateTime<Utc>,
}

/// A row of the work-order summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderSummary {
    pub wo_number: String,
    pub pn: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}

/// A project with an outstanding (uninvoiced or unpaid) amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstandingProject {
    pub pn: String,
    pub name: String,
    pub outstanding: f64,
}
