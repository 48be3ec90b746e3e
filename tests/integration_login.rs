mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{VALID_PASSWORD, generate_unique_email, setup_test_app, test_today};
use edulink::edulink_gateway::MemoryGateway;
use edulink::edulink_storage::{FileStorage, KeyValueStorage, ProfileStore, keys};
use edulink::modules::auth::LoginForm;
use edulink::modules::auth::controller::{AUTHENTICATION_FAILED, INVALID_CREDENTIALS, SIGNED_IN};
use edulink::router::Route;
use edulink::state::AppState;
use edulink_core::ErrorKind;
use edulink_models::{Role, SignUpMetadata};
use serde_json::json;

fn seeded(app: &common::TestApp) -> String {
    let email = generate_unique_email();
    app.gateway
        .seed_account(&email, VALID_PASSWORD, &SignUpMetadata::new(Role::Teacher));
    email
}

fn login_form(app: &common::TestApp, email: &str, password: &str) -> LoginForm {
    let mut form = LoginForm::new(&app.state);
    form.values.email = email.to_string();
    form.values.password = password.to_string();
    form
}

#[tokio::test]
async fn test_login_success_redirects_to_dashboard() {
    let app = setup_test_app();
    let email = seeded(&app);

    let outcome = login_form(&app, &email, VALID_PASSWORD)
        .submit(&app.state)
        .await
        .unwrap();

    assert_eq!(outcome.notice.message, SIGNED_IN);
    assert_eq!(outcome.redirect, Some(Route::Dashboard));
}

#[tokio::test]
async fn test_login_bumps_last_login_of_matching_profile() {
    let app = setup_test_app();
    let email = seeded(&app);
    app.storage
        .set(
            keys::PROFILE,
            &json!({
                "name": "Ada Lovelace",
                "email": email.to_uppercase(),
                "joinDate": "2024-01-02",
                "lastLogin": "2024-01-02",
            })
            .to_string(),
        )
        .unwrap();

    login_form(&app, &email, VALID_PASSWORD)
        .submit(&app.state)
        .await
        .unwrap();

    let profile = app.state.profiles.load().unwrap().unwrap();
    assert_eq!(profile.last_login, test_today());
    assert_eq!(
        profile.join_date,
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    );
}

#[tokio::test]
async fn test_login_leaves_other_profile_alone() {
    let app = setup_test_app();
    let email = seeded(&app);
    let other = json!({ "name": "Grace Hopper", "email": "grace@example.com" }).to_string();
    app.storage.set(keys::PROFILE, &other).unwrap();

    login_form(&app, &email, VALID_PASSWORD)
        .submit(&app.state)
        .await
        .unwrap();

    assert_eq!(app.stored(keys::PROFILE), Some(other));
}

#[tokio::test]
async fn test_remember_me_prefills_next_form() {
    let app = setup_test_app();
    let email = seeded(&app);

    let mut form = login_form(&app, &email, VALID_PASSWORD);
    form.values.remember_me = true;
    form.submit(&app.state).await.unwrap();

    let next = LoginForm::new(&app.state);
    assert_eq!(next.values.email, email);
    assert!(next.values.remember_me);
    assert!(next.values.password.is_empty());

    let mut form = login_form(&app, &email, VALID_PASSWORD);
    form.values.remember_me = false;
    form.submit(&app.state).await.unwrap();

    assert!(app.stored(keys::REMEMBERED_EMAIL).is_none());
    assert!(LoginForm::new(&app.state).values.email.is_empty());
}

#[tokio::test]
async fn test_wrong_password_shows_invalid_credentials() {
    let app = setup_test_app();
    let email = seeded(&app);

    let error = login_form(&app, &email, "Wrong1234")
        .submit(&app.state)
        .await
        .unwrap_err();

    assert_eq!(
        error.notice.as_ref().map(|n| n.message.as_str()),
        Some(INVALID_CREDENTIALS)
    );
    assert_eq!(error.error.kind, ErrorKind::Unauthorized);
    assert!(app.stored(keys::REMEMBERED_EMAIL).is_none());
}

#[tokio::test]
async fn test_unknown_account_shows_invalid_credentials() {
    let app = setup_test_app();

    let error = login_form(&app, &generate_unique_email(), VALID_PASSWORD)
        .submit(&app.state)
        .await
        .unwrap_err();

    assert_eq!(
        error.notice.as_ref().map(|n| n.message.as_str()),
        Some(INVALID_CREDENTIALS)
    );
}

#[tokio::test]
async fn test_backend_failure_shows_generic_message() {
    let app = setup_test_app();
    let email = seeded(&app);
    app.gateway.fail_next_sign_in("Service unavailable");

    let error = login_form(&app, &email, VALID_PASSWORD)
        .submit(&app.state)
        .await
        .unwrap_err();

    assert_eq!(
        error.notice.as_ref().map(|n| n.message.as_str()),
        Some(AUTHENTICATION_FAILED)
    );
    assert_eq!(error.error.kind, ErrorKind::Remote);
}

#[tokio::test]
async fn test_invalid_email_makes_no_remote_call() {
    let app = setup_test_app();

    let mut form = login_form(&app, "not-an-email", "");
    let error = form.submit(&app.state).await.unwrap_err();

    assert!(error.notice.is_none());
    assert!(form.errors().contains("email"));
    assert!(form.errors().contains("password"));
    assert_eq!(app.gateway.call_count(), 0);
}

#[test]
fn test_unreadable_remembered_email_leaves_form_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(format!("{}.json", keys::REMEMBERED_EMAIL))).unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    assert!(storage.get(keys::REMEMBERED_EMAIL).is_err());

    let state = AppState::new(
        Arc::new(MemoryGateway::new()),
        ProfileStore::new(storage).with_clock(test_today),
    );
    let form = LoginForm::new(&state);

    assert!(form.values.email.is_empty());
    assert!(!form.values.remember_me);
}
