//! End-to-end session lifecycle against the in-memory store.

mod helpers;

use sessionkeeper_core::ErrorKind;
use sessionkeeper_entity::user::Credentials;

use helpers::{TEST_PASSWORD, TestApp, count_current, desktop, phone, refresh_concurrently};

#[tokio::test]
async fn test_login_refresh_logout_scenario() {
    let app = TestApp::new();
    let user = app.create_test_user("u1@example.com").await;
    let creds = Credentials::new("u1@example.com", TEST_PASSWORD);

    let login = app.controller.login(&creds, &desktop()).await.expect("login");

    let rotated = app
        .controller
        .refresh(&login.refresh_token, &desktop())
        .await
        .expect("refresh");

    let err = app
        .controller
        .refresh(&login.refresh_token, &desktop())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);

    app.controller.logout(user.id).await.expect("logout");

    let err = app
        .controller
        .refresh(&rotated.refresh_token, &desktop())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
    assert_eq!(app.store.active_count(user.id).await, 0);
}

#[tokio::test]
async fn test_refresh_on_one_device_logs_out_the_others() {
    let app = TestApp::new();
    let user = app.create_test_user("multi@example.com").await;
    let creds = Credentials::new("multi@example.com", TEST_PASSWORD);

    let on_desktop = app.controller.login(&creds, &desktop()).await.expect("login");
    let on_phone = app.controller.login(&creds, &phone()).await.expect("login");
    assert_eq!(app.store.active_count(user.id).await, 2);

    app.controller
        .refresh(&on_desktop.refresh_token, &desktop())
        .await
        .expect("refresh");

    let err = app
        .controller
        .refresh(&on_phone.refresh_token, &phone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);

    // The phone keeps its device record; only its session is gone.
    let devices = app.controller.list_devices(user.id).await.expect("list");
    assert_eq!(devices.len(), 2);
    assert_eq!(app.store.active_count(user.id).await, 1);
}

#[tokio::test]
async fn test_access_token_identifies_user() {
    let app = TestApp::new();
    let user = app.create_test_user("access@example.com").await;
    let pair = app
        .controller
        .login(&Credentials::new("access@example.com", TEST_PASSWORD), &desktop())
        .await
        .expect("login");

    let ctx = app.controller.authenticate(&pair.access_token).expect("authenticate");
    assert_eq!(ctx.user_id, user.id);

    let err = app.controller.authenticate(&pair.refresh_token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_concurrent_logins_keep_one_session_per_device() {
    let app = TestApp::new();
    let user = app.create_test_user("race@example.com").await;
    let creds = Credentials::new("race@example.com", TEST_PASSWORD);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let controller = app.controller.clone();
        let creds = creds.clone();
        handles.push(tokio::spawn(async move {
            controller.login(&creds, &desktop()).await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("login");
    }

    assert_eq!(app.store.active_count(user.id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_of_one_token_leave_one_session() {
    let app = TestApp::new();
    let user = app.create_test_user("replay@example.com").await;
    let creds = Credentials::new("replay@example.com", TEST_PASSWORD);
    let login = app.controller.login(&creds, &desktop()).await.expect("login");

    let winners =
        refresh_concurrently(&app.controller, &login.refresh_token, &desktop(), 16).await;

    assert!(!winners.is_empty());
    assert_eq!(app.store.active_count(user.id).await, 1);
    assert_eq!(
        count_current(&app.store, user.id, &desktop(), &winners).await,
        1
    );

    let err = app
        .controller
        .refresh(&login.refresh_token, &desktop())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}
