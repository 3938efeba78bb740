//! End-to-end checks over the composed client layers: session store,
//! guard, menu, realtime pipeline and the notification hub, run
//! against the in-memory transport and a scripted notification API.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use workdesk_api::{ApiClient, ApiError, NotificationApi};
use workdesk_app::{connect_notifications, menu_for, Navigation, ScreenRegistry, SessionContext};
use workdesk_auth::{MemorySessionStore, Session, SessionStore};
use workdesk_notify::{ChannelEvent, ChannelName, EVENT_LOG_CREATED, InMemoryTransport};
use workdesk_types::{LogId, Notification, NotificationId, Role, User, UserId};

fn session(user_id: i64, role: &str) -> Session {
    Session::new(
        User {
            id: UserId(user_id),
            name: "Adi".into(),
            role: Role::new(role),
        },
        format!("bearer-{user_id}"),
    )
}

fn log_event(log_id: i64, user_ids: &[i64]) -> ChannelEvent {
    ChannelEvent {
        channel: ChannelName::LogCreated,
        event: EVENT_LOG_CREATED.into(),
        notification_id: NotificationId(log_id),
        message: format!("Log #{log_id} created"),
        user_ids: user_ids.iter().map(|&id| UserId(id)).collect(),
        log_id: Some(LogId(log_id)),
        created_at: Utc::now(),
    }
}

async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}

/// Scripted notification API: empty history, switchable mark-read.
struct ScriptedApi {
    fail_mark_read: AtomicBool,
}

impl ScriptedApi {
    fn new() -> Self {
        Self {
            fail_mark_read: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl NotificationApi for ScriptedApi {
    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        Ok(Vec::new())
    }

    async fn mark_notification_read(&self, _id: NotificationId) -> Result<(), ApiError> {
        if self.fail_mark_read.load(Ordering::SeqCst) {
            Err(ApiError::Status { code: 500 })
        } else {
            Ok(())
        }
    }
}

#[test]
fn unknown_role_has_no_capability_and_an_empty_menu() {
    let s = session(1, "auditor_v2");
    assert_eq!(s.capability(), None);
    assert!(menu_for(s.capability()).is_empty());
}

#[test]
fn guard_redirects_by_session_state() {
    let registry = ScreenRegistry::standard();

    // No session: login, preserving the requested path.
    assert_eq!(
        registry.open(None, "/phc"),
        Navigation::Login {
            return_to: "/phc".into()
        }
    );

    // Role outside the allow-list: the unauthorized screen.
    assert_eq!(
        registry.open(Some(&session(1, "marketing")), "/phc"),
        Navigation::Unauthorized
    );
}

#[tokio::test]
async fn events_reach_only_listed_recipients() {
    let transport = Arc::new(InMemoryTransport::new());
    let api = ScriptedApi::new();

    let (hub_7, mut center_7, mut toasts_7) =
        connect_notifications(transport.clone(), &api, UserId(7))
            .await
            .expect("connect");
    let (hub_9, mut center_9, mut toasts_9) =
        connect_notifications(transport.clone(), &api, UserId(9))
            .await
            .expect("connect");

    transport.publish(log_event(1, &[5, 9]));
    settle().await;

    assert!(hub_7.notifications().is_empty());
    assert!(toasts_7.try_recv().is_err());
    assert_eq!(hub_9.notifications().len(), 1);
    assert!(toasts_9.try_recv().is_ok());

    center_7.shutdown().await;
    center_9.shutdown().await;
}

#[tokio::test]
async fn repeated_log_id_surfaces_once() {
    let transport = Arc::new(InMemoryTransport::new());
    let api = ScriptedApi::new();
    let (hub, mut center, mut toasts) = connect_notifications(transport.clone(), &api, UserId(5))
        .await
        .expect("connect");

    transport.publish(log_event(88, &[5]));
    transport.publish(log_event(88, &[5]));
    settle().await;

    assert_eq!(hub.notifications().len(), 1);
    assert!(toasts.try_recv().is_ok());
    assert!(toasts.try_recv().is_err(), "one toast only");

    center.shutdown().await;
}

#[tokio::test]
async fn mark_read_is_gated_on_the_api() {
    let transport = Arc::new(InMemoryTransport::new());
    let api = ScriptedApi::new();
    let (hub, mut center, _toasts) = connect_notifications(transport.clone(), &api, UserId(5))
        .await
        .expect("connect");

    transport.publish(log_event(3, &[5]));
    settle().await;

    // Failing call: the list is untouched.
    api.fail_mark_read.store(true, Ordering::SeqCst);
    hub.mark_read(&api, NotificationId(3))
        .await
        .expect_err("should fail");
    assert_eq!(hub.unread_count(), 1);

    // Succeeding call: read_at flips.
    api.fail_mark_read.store(false, Ordering::SeqCst);
    hub.mark_read(&api, NotificationId(3)).await.expect("mark read");
    assert_eq!(hub.unread_count(), 0);

    center.shutdown().await;
}

#[tokio::test]
async fn remount_after_teardown_does_not_double_deliver() {
    let transport = Arc::new(InMemoryTransport::new());
    let api = ScriptedApi::new();

    let (hub, mut center, _toasts) = connect_notifications(transport.clone(), &api, UserId(5))
        .await
        .expect("connect");
    transport.publish(log_event(21, &[5]));
    settle().await;
    assert_eq!(hub.notifications().len(), 1);
    center.shutdown().await;

    // Remount: new subscriptions, same session hub. The transport
    // replays the event; the session has already shown it.
    let mut center = workdesk_notify::NotificationCenter::start(transport.clone(), hub.clone())
        .await
        .expect("restart");
    transport.publish(log_event(21, &[5]));
    settle().await;
    center.shutdown().await;

    assert_eq!(hub.notifications().len(), 1);
}

#[tokio::test]
async fn logout_clears_token_and_user_together() {
    let store = MemorySessionStore::new();
    store.save(&session(5, "engineer")).await.expect("save");

    let api = Arc::new(ApiClient::new("http://127.0.0.1:9").expect("client"));
    let ctx = SessionContext::new(store, api);
    ctx.restore().await.expect("restore").expect("some");
    assert!(ctx.capability().is_some());

    ctx.logout().await.expect("logout");

    // Token and user are gone as one unit.
    assert!(ctx.current().is_none());
    assert!(ctx.capability().is_none());

    // And the guard now treats navigation as unauthenticated.
    let registry = ScreenRegistry::standard();
    assert_eq!(
        registry.open(ctx.current().as_ref(), "/dashboard"),
        Navigation::Login {
            return_to: "/dashboard".into()
        }
    );
}
