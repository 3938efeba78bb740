//! The REST client.

use crate::error::ValidationErrors;
use crate::model::{
    BoqItem, ClientRecord, LoginRequest, LoginResponse, OutstandingProject, Phc, StatusProject,
    WorkOrderSummary,
};
use crate::{ApiError, NotificationApi};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use workdesk_types::{Notification, NotificationId, UserId};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mutable fields of a client record, for create and update calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial update for one BOQ line.
///
/// Screens send only the fields the session's capability may edit:
/// `progress` from the engineering portion, `qty`/`unit_price` from
/// marketing (the server recomputes `amount`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoqUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

/// Private-channel handshake result from `POST /broadcasting/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastAuthResponse {
    /// Opaque signature the realtime service verifies.
    pub auth: String,
}

/// Shape of an HTTP 422 body.
#[derive(Debug, Default, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: ValidationErrors,
}

/// Client for the Workdesk backend API.
///
/// One instance is shared across all screens; the underlying
/// `reqwest::Client` pools connections. The bearer token is injected
/// by the session context at login and removed at logout, so every
/// call made while a session exists carries `Authorization: Bearer`.
///
/// # Example
///
/// ```no_run
/// use workdesk_api::{ApiClient, ApiError};
///
/// # async fn example() -> Result<(), ApiError> {
/// let api = ApiClient::new("https://api.example.test")?;
/// api.set_token(Some("bearer-token".into()));
/// let projects = api.status_projects().await?;
/// println!("{} projects", projects.len());
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::from_reqwest)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Installs or removes the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Returns the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.token.read().as_deref() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Sends a request and decodes a JSON body.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.send().await.map_err(ApiError::from_reqwest)?;
        let resp = Self::check_status(resp).await?;
        resp.json().await.map_err(ApiError::from_reqwest)
    }

    /// Sends a request, discarding any success body.
    async fn send_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let resp = req.send().await.map_err(ApiError::from_reqwest)?;
        Self::check_status(resp).await.map(|_| ())
    }

    /// Maps the response status onto the error taxonomy.
    async fn check_status(resp: Response) -> Result<Response, ApiError> {
        match resp.status() {
            status if status.is_success() => Ok(resp),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: ValidationBody = resp.json().await.unwrap_or_default();
                Err(ApiError::Validation {
                    errors: body.errors,
                })
            }
            status => {
                debug!(%status, "unexpected API status");
                Err(ApiError::Status {
                    code: status.as_u16(),
                })
            }
        }
    }

    // --- auth ---

    /// `POST /login`. On success the caller installs the returned
    /// token via [`set_token`](Self::set_token).
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(self.request(Method::POST, "/login").json(credentials))
            .await
    }

    /// `POST /broadcasting/auth`: private-channel subscription
    /// handshake, signed with the same bearer token.
    pub async fn broadcasting_auth(
        &self,
        socket_id: &str,
        channel_name: &str,
    ) -> Result<BroadcastAuthResponse, ApiError> {
        let body = serde_json::json!({
            "socket_id": socket_id,
            "channel_name": channel_name,
        });
        self.send(self.request(Method::POST, "/broadcasting/auth").json(&body))
            .await
    }

    // --- clients ---

    /// `GET /clients`.
    pub async fn clients(&self) -> Result<Vec<ClientRecord>, ApiError> {
        self.send(self.request(Method::GET, "/clients")).await
    }

    /// `POST /clients`.
    pub async fn create_client(&self, payload: &ClientPayload) -> Result<ClientRecord, ApiError> {
        self.send(self.request(Method::POST, "/clients").json(payload))
            .await
    }

    /// `PUT /clients/{id}`.
    pub async fn update_client(
        &self,
        id: i64,
        payload: &ClientPayload,
    ) -> Result<ClientRecord, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/clients/{id}"))
                .json(payload),
        )
        .await
    }

    /// `DELETE /clients/{id}`.
    pub async fn delete_client(&self, id: i64) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, &format!("/clients/{id}")))
            .await
    }

    // --- projects ---

    /// `GET /projects/{pn}/boq`.
    pub async fn project_boq(&self, pn: &str) -> Result<Vec<BoqItem>, ApiError> {
        self.send(self.request(Method::GET, &format!("/projects/{pn}/boq")))
            .await
    }

    /// `PUT /boq/{id}`: partial line update; the server recomputes
    /// derived monetary fields.
    pub async fn update_boq_item(&self, id: i64, update: &BoqUpdate) -> Result<BoqItem, ApiError> {
        self.send(self.request(Method::PUT, &format!("/boq/{id}")).json(update))
            .await
    }

    /// `GET /status-projects`.
    pub async fn status_projects(&self) -> Result<Vec<StatusProject>, ApiError> {
        self.send(self.request(Method::GET, "/status-projects")).await
    }

    /// `GET /outstanding-projects`.
    pub async fn outstanding_projects(&self) -> Result<Vec<OutstandingProject>, ApiError> {
        self.send(self.request(Method::GET, "/outstanding-projects"))
            .await
    }

    /// `GET /wo-summary`.
    pub async fn wo_summary(&self) -> Result<Vec<WorkOrderSummary>, ApiError> {
        self.send(self.request(Method::GET, "/wo-summary")).await
    }

    // --- PHC ---

    /// `GET /phc`.
    pub async fn phcs(&self) -> Result<Vec<Phc>, ApiError> {
        self.send(self.request(Method::GET, "/phc")).await
    }

    /// `GET /phcs/show/{id}`: detail view including approvals.
    pub async fn phc_detail(&self, id: i64) -> Result<Phc, ApiError> {
        self.send(self.request(Method::GET, &format!("/phcs/show/{id}")))
            .await
    }

    /// `PUT /phc/{id}`.
    pub async fn update_phc(&self, phc: &Phc) -> Result<Phc, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/phc/{}", phc.id))
                .json(phc),
        )
        .await
    }

    // --- users ---

    /// `POST /users/{id}/upload-photo`.
    pub async fn upload_photo(
        &self,
        user: UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("photo", part);
        self.send_unit(
            self.request(Method::POST, &format!("/users/{user}/upload-photo"))
                .multipart(form),
        )
        .await
    }
}

#[async_trait]
impl NotificationApi for ApiClient {
    /// `GET /notifications`.
    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.send(self.request(Method::GET, "/notifications")).await
    }

    /// `POST /notifications/{id}/read`.
    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::POST, &format!("/notifications/{id}/read")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_normalizes_slashes() {
        let api = ApiClient::new("https://api.example.test/").expect("client");
        assert_eq!(api.url("/clients"), "https://api.example.test/clients");
        assert_eq!(api.url("clients"), "https://api.example.test/clients");
        assert_eq!(
            api.url("/projects/PN-1/boq"),
            "https://api.example.test/projects/PN-1/boq"
        );
    }

    #[test]
    fn validation_body_tolerates_missing_errors_key() {
        let body: ValidationBody = serde_json::from_str(r#"{"message": "nope"}"#).expect("parse");
        assert!(body.errors.is_empty());

        let body: ValidationBody =
            serde_json::from_str(r#"{"errors": {"name": ["required"]}}"#).expect("parse");
        assert_eq!(body.errors.field("name"), Some(&["required".to_string()][..]));
    }

    #[test]
    fn boq_update_serializes_only_set_fields() {
        let update = BoqUpdate {
            progress: Some(55.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json, serde_json::json!({ "progress": 55.0 }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn connection_refused_maps_to_network_error() {
        // Port 9 (discard) is assumed closed.
        let api = ApiClient::new("http://127.0.0.1:9").expect("client");
        let err = api.status_projects().await.expect_err("should fail");
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }
}
