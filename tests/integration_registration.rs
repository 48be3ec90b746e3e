mod common;

use common::{VALID_PASSWORD, filled_form, setup_test_app};
use edulink::edulink_gateway::GatewayCall;
use edulink::edulink_storage::keys;
use edulink::modules::auth::controller::{ACCOUNT_CREATED, ACCOUNT_CREATION_FAILED};
use edulink::modules::auth::RegistrationForm;
use edulink::router::Route;
use edulink_models::registration::{PASSWORDS_DONT_MATCH, UNKNOWN_CHILD_STUDENT_ID};
use edulink_models::{RegistrationRole, Role};

#[tokio::test]
async fn test_register_student_success() {
    let app = setup_test_app();
    let mut form = filled_form(RegistrationRole::Student, "S100");
    let email = form.values().email.clone();

    let outcome = form.submit(&app.state).await.unwrap();

    assert_eq!(outcome.notice.message, ACCOUNT_CREATED);
    assert_eq!(outcome.redirect, Some(Route::Login));
    assert!(form.errors().is_empty());
    assert_eq!(
        app.gateway.calls(),
        vec![GatewayCall::SignUp {
            email: email.clone()
        }]
    );

    let account = app.gateway.account(&email).unwrap();
    assert_eq!(account.role(), Some(Role::Student));
    assert_eq!(account.user_metadata["student_id"], "S100");

    let profile = app.state.profiles.load().unwrap().unwrap();
    assert_eq!(profile.email, email);
    assert_eq!(profile.role, "student");
    assert_eq!(
        profile.name,
        format!("{} {}", form.values().first_name, form.values().last_name)
    );
    assert_eq!(profile.student_id.as_deref(), Some("S100"));
    assert_eq!(profile.join_date, common::test_today());

    assert!(app.state.profiles.registered_student_ids().unwrap().contains("S100"));
}

#[tokio::test]
async fn test_register_teacher_stores_subjects() {
    let app = setup_test_app();
    let mut form = filled_form(RegistrationRole::Teacher, "");
    form.values_mut().subjects = " Math ,, Physics ".to_string();

    form.submit(&app.state).await.unwrap();

    let profile = app.state.profiles.load().unwrap().unwrap();
    assert_eq!(profile.role, "teacher");
    assert_eq!(profile.subjects.as_deref(), Some("Math, Physics"));
    assert!(profile.student_id.is_none());
    assert!(app.state.profiles.registered_student_ids().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_role_fields_make_no_remote_call() {
    for role in RegistrationRole::ALL {
        let app = setup_test_app();
        let mut form = filled_form(role, "S100");
        let values = form.values_mut();
        values.student_id.clear();
        values.grade_level.clear();
        values.subjects.clear();
        values.child_name.clear();
        values.child_student_id.clear();

        let error = form.submit(&app.state).await.unwrap_err();

        assert!(error.notice.is_none(), "{:?}", role);
        assert!(!form.errors().is_empty(), "{:?}", role);
        for field in role.specific_fields() {
            assert!(form.errors().contains(field), "{:?} {}", role, field);
        }
        assert_eq!(app.gateway.call_count(), 0, "{:?}", role);
        assert!(app.stored(keys::PROFILE).is_none());
    }
}

#[tokio::test]
async fn test_password_mismatch_is_single_error_for_every_role() {
    for role in RegistrationRole::ALL {
        let app = setup_test_app();
        app.state.profiles.register_student_id("S100").unwrap();

        let mut form = filled_form(role, "S100");
        form.values_mut().confirm_password = format!("{}9", VALID_PASSWORD);

        form.submit(&app.state).await.unwrap_err();

        assert_eq!(form.errors().len(), 1, "{:?}", role);
        assert_eq!(
            form.errors().messages("confirmPassword"),
            [PASSWORDS_DONT_MATCH],
            "{:?}",
            role
        );
        assert_eq!(app.gateway.call_count(), 0);
    }
}

#[tokio::test]
async fn test_weak_password_reports_shape_errors_only() {
    let app = setup_test_app();
    let mut form = filled_form(RegistrationRole::Student, "S100");
    form.values_mut().password = "abc12345".to_string();
    form.values_mut().confirm_password = "something-else".to_string();

    form.submit(&app.state).await.unwrap_err();

    assert_eq!(
        form.errors().messages("password"),
        ["Password must contain at least one uppercase letter, one lowercase letter, and one number"]
    );
    assert!(!form.errors().contains("confirmPassword"));
}

#[tokio::test]
async fn test_parent_requires_registered_child() {
    let app = setup_test_app();

    let mut parent = filled_form(RegistrationRole::Parent, "S100");
    parent.submit(&app.state).await.unwrap_err();
    assert_eq!(
        parent.errors().messages("childStudentId"),
        [UNKNOWN_CHILD_STUDENT_ID]
    );
    assert_eq!(app.gateway.call_count(), 0);

    let mut student = filled_form(RegistrationRole::Student, "S100");
    student.submit(&app.state).await.unwrap();

    let outcome = parent.submit(&app.state).await.unwrap();
    assert_eq!(outcome.redirect, Some(Route::Login));
    assert!(parent.errors().is_empty());

    let profile = app.state.profiles.load().unwrap().unwrap();
    assert_eq!(profile.role, "parent");
    assert_eq!(profile.child_student_id.as_deref(), Some("S100"));
}

#[tokio::test]
async fn test_student_id_registration_is_idempotent() {
    let app = setup_test_app();

    filled_form(RegistrationRole::Student, "S100")
        .submit(&app.state)
        .await
        .unwrap();
    filled_form(RegistrationRole::Student, "S100")
        .submit(&app.state)
        .await
        .unwrap();

    let ids = app.state.profiles.registered_student_ids().unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(app.gateway.sign_up_count(), 2);
}

#[tokio::test]
async fn test_remote_failure_keeps_values_and_writes_nothing() {
    let app = setup_test_app();
    app.gateway.fail_next_sign_up("Database error saving new user");

    let mut form = filled_form(RegistrationRole::Student, "S100");
    let before = form.values().clone();

    let error = form.submit(&app.state).await.unwrap_err();

    assert_eq!(
        error.notice.as_ref().map(|n| n.message.as_str()),
        Some(ACCOUNT_CREATION_FAILED)
    );
    assert_eq!(form.values(), &before);
    assert!(form.errors().is_empty());
    assert!(app.stored(keys::PROFILE).is_none());
    assert!(app.state.profiles.registered_student_ids().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_is_remote_failure() {
    let app = setup_test_app();
    let mut first = filled_form(RegistrationRole::Teacher, "");
    first.submit(&app.state).await.unwrap();

    let mut second = filled_form(RegistrationRole::Teacher, "");
    second.values_mut().email = first.values().email.clone();
    let error = second.submit(&app.state).await.unwrap_err();

    assert!(error.notice.is_some());
    assert_eq!(error.error.to_string(), "User already registered");
}

#[tokio::test]
async fn test_role_switch_keeps_values_and_drops_old_role_errors() {
    let app = setup_test_app();
    let mut form = RegistrationForm::new();
    form.values_mut().first_name = "Ada".to_string();
    form.values_mut().child_name = "Liam Carter".to_string();

    form.submit(&app.state).await.unwrap_err();
    assert!(form.errors().contains("studentId"));
    assert!(form.errors().contains("email"));

    form.select_role(RegistrationRole::Parent);

    assert!(!form.errors().contains("studentId"));
    assert!(!form.errors().contains("gradeLevel"));
    assert!(form.errors().contains("email"));
    assert_eq!(form.values().first_name, "Ada");
    assert_eq!(form.values().child_name, "Liam Carter");
}

#[tokio::test]
async fn test_other_role_fields_are_ignored() {
    let app = setup_test_app();
    let mut form = filled_form(RegistrationRole::Teacher, "");
    form.values_mut().child_name = "x".to_string();
    form.values_mut().student_id = "S999".to_string();

    form.submit(&app.state).await.unwrap();

    let profile = app.state.profiles.load().unwrap().unwrap();
    assert!(profile.child_name.is_none());
    assert!(profile.student_id.is_none());
}
