//! The session context.
//!
//! The browser original read its token and cached profile from client
//! storage at a dozen call sites. Here there is exactly one provider:
//! every screen asks the [`SessionContext`], and every transition
//! (login, logout, forced logout on a 401) goes through it. The
//! context keeps the store, the API client's bearer token and the
//! broadcast `watch` channel in agreement.

use crate::AppError;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use workdesk_api::{ApiClient, ApiError, LoginRequest};
use workdesk_auth::{Session, SessionStore};
use workdesk_notify::NotificationCenter;
use workdesk_types::Capability;

/// Single source of truth for the authenticated session.
///
/// Holds the persisted store, installs/removes the bearer token on the
/// shared [`ApiClient`], owns the session's [`NotificationCenter`] and
/// broadcasts every change over a `watch` channel so screens observe
/// login and logout without polling.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use workdesk_api::ApiClient;
/// use workdesk_app::{AppError, SessionContext};
/// use workdesk_auth::MemorySessionStore;
///
/// # async fn example() -> Result<(), AppError> {
/// let api = Arc::new(ApiClient::new("https://api.example.test")?);
/// let ctx = SessionContext::new(MemorySessionStore::new(), api);
///
/// // Pick up a previously persisted session, if any.
/// if let Some(session) = ctx.restore().await? {
///     println!("welcome back, {session}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionContext<S: SessionStore> {
    store: S,
    api: Arc<ApiClient>,
    current: watch::Sender<Option<Session>>,
    center: Mutex<Option<NotificationCenter>>,
}

impl<S: SessionStore> SessionContext<S> {
    /// Creates a context with no active session.
    pub fn new(store: S, api: Arc<ApiClient>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            store,
            api,
            current,
            center: Mutex::new(None),
        }
    }

    /// Returns the shared API client.
    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Returns a clone of the current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Resolves the current session's capability.
    ///
    /// `None` both when logged out and when the role is unknown; the
    /// two render identically (nothing).
    #[must_use]
    pub fn capability(&self) -> Option<Capability> {
        self.current.borrow().as_ref().and_then(Session::capability)
    }

    /// Subscribes to session changes.
    ///
    /// The receiver sees `Some` on login and `None` on logout,
    /// including the forced logout after a 401.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Loads the persisted session, if one exists and has not expired.
    ///
    /// On success the bearer token is installed and the session is
    /// broadcast, exactly as after a fresh login.
    pub async fn restore(&self) -> Result<Option<Session>, AppError> {
        match self.store.load().await? {
            Some(session) => {
                debug!(%session, "restored persisted session");
                self.install(session.clone()).await?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Authenticates against the API and establishes the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let response = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let session = Session::new(response.user, response.token);
        info!(%session, "logged in");
        self.install(session.clone()).await?;
        Ok(session)
    }

    async fn install(&self, session: Session) -> Result<(), AppError> {
        self.api.set_token(Some(session.token().to_string()));
        self.store.save(&session).await?;
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Ends the session: token and user leave together.
    ///
    /// Disposes the notification center (releasing its subscriptions),
    /// clears the persisted entry, removes the bearer token and
    /// broadcasts `None`.
    pub async fn logout(&self) -> Result<(), AppError> {
        let center = self.center.lock().take();
        if let Some(mut center) = center {
            center.shutdown().await;
        }

        self.store.clear().await?;
        self.api.set_token(None);
        self.current.send_replace(None);
        info!("logged out");
        Ok(())
    }

    /// Reacts to an HTTP 401 from any call: forced logout.
    ///
    /// After this the guard sees no session and navigation lands on
    /// the login screen.
    pub async fn handle_unauthorized(&self) -> Result<(), AppError> {
        warn!("API rejected the session token, forcing logout");
        self.logout().await
    }

    /// Routes an API result through the 401 policy.
    ///
    /// `Unauthorized` triggers the forced logout before the error is
    /// returned; every other outcome passes through unchanged.
    pub async fn check<T>(&self, result: Result<T, ApiError>) -> Result<T, AppError> {
        match result {
            Err(ApiError::Unauthorized) => {
                self.handle_unauthorized().await?;
                Err(AppError::Api(ApiError::Unauthorized))
            }
            other => other.map_err(AppError::from),
        }
    }

    /// Hands the session's notification center to the context.
    ///
    /// The previous center, if any, is returned so the caller can shut
    /// it down; in practice there is at most one per session.
    pub fn attach_center(&self, center: NotificationCenter) -> Option<NotificationCenter> {
        self.center.lock().replace(center)
    }
}
