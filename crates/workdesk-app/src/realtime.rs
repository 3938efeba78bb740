//! Wiring between the API client and the realtime layer.

use crate::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use workdesk_api::{ApiClient, NotificationApi};
use workdesk_notify::{
    toast_channel, BroadcastAuth, NotificationCenter, NotificationHub, NotifyError,
    RealtimeTransport, ToastReceiver,
};
use workdesk_types::UserId;

/// Private-channel handshake backed by `POST /broadcasting/auth`.
///
/// The request is signed with the session bearer token already
/// installed on the shared [`ApiClient`], so authorization follows the
/// session automatically.
pub struct ApiBroadcastAuth {
    api: Arc<ApiClient>,
}

impl ApiBroadcastAuth {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BroadcastAuth for ApiBroadcastAuth {
    async fn authorize(&self, socket_id: &str, channel: &str) -> Result<String, NotifyError> {
        let response = self
            .api
            .broadcasting_auth(socket_id, channel)
            .await
            .map_err(|err| NotifyError::Handshake {
                channel: channel.to_string(),
                reason: err.to_string(),
            })?;
        Ok(response.auth)
    }
}

/// Builds the session's notification pipeline.
///
/// Seeds the hub with the historical list, then opens the fixed
/// subscription set. The returned center belongs to the session
/// context (see
/// [`attach_center`](crate::SessionContext::attach_center)); the toast
/// receiver belongs to the renderer.
pub async fn connect_notifications(
    transport: Arc<dyn RealtimeTransport>,
    api: &dyn NotificationApi,
    user: UserId,
) -> Result<(Arc<NotificationHub>, NotificationCenter, ToastReceiver), AppError> {
    let (toast_tx, toast_rx) = toast_channel();
    let hub = Arc::new(NotificationHub::new(user, toast_tx));
    hub.seed(api.list_notifications().await?);

    let center = NotificationCenter::start(transport, Arc::clone(&hub)).await?;
    Ok((hub, center, toast_rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use workdesk_api::ApiError;
    use workdesk_notify::{session_subscriptions, InMemoryTransport};
    use workdesk_types::{Notification, NotificationId};

    struct SeededApi;

    #[async_trait]
    impl NotificationApi for SeededApi {
        async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
            Ok(vec![Notification {
                id: NotificationId(40),
                message: "WO #12 approved".into(),
                user_ids: vec![UserId(5)],
                created_at: Utc::now(),
                read_at: None,
            }])
        }

        async fn mark_notification_read(&self, _id: NotificationId) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn connect_seeds_history_and_opens_the_fixed_set() {
        let transport = Arc::new(InMemoryTransport::new());
        let (hub, mut center, _toasts) =
            connect_notifications(transport.clone(), &SeededApi, UserId(5))
                .await
                .expect("connect");

        assert_eq!(hub.notifications().len(), 1);
        for (channel, event) in session_subscriptions(UserId(5)) {
            assert_eq!(transport.subscriber_count(&channel, event), 1);
        }
        center.shutdown().await;
    }
}
