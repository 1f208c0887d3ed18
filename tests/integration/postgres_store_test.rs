//! Session store behavior against PostgreSQL.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

mod helpers;

use sessionkeeper_core::ErrorKind;
use sessionkeeper_entity::user::Credentials;

use helpers::{PgTestApp, TEST_PASSWORD, count_current, desktop, phone, refresh_concurrently};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_rotation_and_reuse_detection() {
    let app = PgTestApp::new().await;
    let user = app.create_test_user().await;
    let creds = Credentials::new(user.email.clone(), TEST_PASSWORD);

    let first = app.controller.login(&creds, &desktop()).await.expect("login");
    let second = app.controller.login(&creds, &desktop()).await.expect("relogin");
    assert_eq!(app.active_sessions(user.id).await, 1);

    let err = app
        .controller
        .refresh(&first.refresh_token, &desktop())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);

    let rotated = app
        .controller
        .refresh(&second.refresh_token, &desktop())
        .await
        .expect("refresh");
    assert_eq!(app.active_sessions(user.id).await, 1);

    app.controller.logout(user.id).await.expect("logout");
    app.controller.logout(user.id).await.expect("logout again");
    assert_eq!(app.active_sessions(user.id).await, 0);

    let err = app
        .controller
        .refresh(&rotated.refresh_token, &desktop())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_refresh_revokes_every_device() {
    let app = PgTestApp::new().await;
    let user = app.create_test_user().await;
    let creds = Credentials::new(user.email.clone(), TEST_PASSWORD);

    let on_desktop = app.controller.login(&creds, &desktop()).await.expect("login");
    let on_phone = app.controller.login(&creds, &phone()).await.expect("login");
    assert_eq!(app.active_sessions(user.id).await, 2);

    app.controller
        .refresh(&on_desktop.refresh_token, &desktop())
        .await
        .expect("refresh");
    assert_eq!(app.active_sessions(user.id).await, 1);

    let err = app
        .controller
        .refresh(&on_phone.refresh_token, &phone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_device_management() {
    let app = PgTestApp::new().await;
    let user = app.create_test_user().await;
    let creds = Credentials::new(user.email.clone(), TEST_PASSWORD);
    app.controller.login(&creds, &desktop()).await.expect("login");

    let devices = app.controller.list_devices(user.id).await.expect("list");
    assert_eq!(devices.len(), 1);
    let device_id = devices[0].id.clone();
    assert_eq!(devices[0].name, "Firefox on Linux");

    app.controller
        .rename_device(user.id, &device_id, "Home desktop")
        .await
        .expect("rename");
    app.controller.login(&creds, &desktop()).await.expect("relogin");
    let device = app.controller.get_device(user.id, &device_id).await.expect("get");
    assert_eq!(device.name, "Home desktop");

    app.controller
        .delete_device(user.id, &device_id)
        .await
        .expect("delete");
    assert_eq!(app.active_sessions(user.id).await, 0);
    let err = app
        .controller
        .get_device(user.id, &device_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_email_lookup_ignores_case() {
    let app = PgTestApp::new().await;
    let user = app.create_test_user().await;
    let creds = Credentials::new(user.email.to_uppercase(), TEST_PASSWORD);
    assert!(app.controller.login(&creds, &desktop()).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_concurrent_refreshes_of_one_token_leave_one_session() {
    let app = PgTestApp::new().await;
    let user = app.create_test_user().await;
    let creds = Credentials::new(user.email.clone(), TEST_PASSWORD);
    let login = app.controller.login(&creds, &desktop()).await.expect("login");

    let winners =
        refresh_concurrently(&app.controller, &login.refresh_token, &desktop(), 8).await;

    assert!(!winners.is_empty());
    assert_eq!(app.active_sessions(user.id).await, 1);
    assert_eq!(
        count_current(&app.store(), user.id, &desktop(), &winners).await,
        1
    );
}
