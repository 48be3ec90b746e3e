use std::sync::Arc;

use chrono::NaiveDate;
use edulink::edulink_gateway::MemoryGateway;
use edulink::edulink_storage::{KeyValueStorage, MemoryStorage, ProfileStore};
use edulink::modules::auth::{RegistrationForm, RegistrationValues};
use edulink::modules::schools::SchoolRegistrationWizard;
use edulink::state::AppState;
use edulink_models::RegistrationRole;
use fake::Fake;
use fake::faker::name::en::*;
use uuid::Uuid;

pub const VALID_PASSWORD: &str = "Abc12345";

pub struct TestApp {
    pub state: AppState,
    pub gateway: Arc<MemoryGateway>,
    pub storage: Arc<MemoryStorage>,
}

#[allow(dead_code)]
impl TestApp {
    /// Raw bytes stored under `key`.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap()
    }
}

pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn setup_test_app() -> TestApp {
    let gateway = Arc::new(MemoryGateway::new());
    let storage = Arc::new(MemoryStorage::new());
    let profiles = ProfileStore::new(storage.clone()).with_clock(test_today);

    TestApp {
        state: AppState::new(gateway.clone(), profiles),
        gateway,
        storage,
    }
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_subdomain() -> String {
    format!("school-{}", &Uuid::new_v4().simple().to_string()[..8])
}

#[allow(dead_code)]
pub fn fake_account(values: &mut RegistrationValues) {
    values.first_name = FirstName().fake();
    values.last_name = LastName().fake();
    values.email = generate_unique_email();
    values.password = VALID_PASSWORD.to_string();
    values.confirm_password = VALID_PASSWORD.to_string();
}

/// A registration form for `role` with valid common fields and valid role-specific fields.
#[allow(dead_code)]
pub fn filled_form(role: RegistrationRole, student_id: &str) -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.select_role(role);

    let values = form.values_mut();
    fake_account(values);
    match role {
        RegistrationRole::Student => {
            values.student_id = student_id.to_string();
            values.grade_level = "10".to_string();
        }
        RegistrationRole::Teacher => {
            values.subjects = "Math, Physics".to_string();
        }
        RegistrationRole::Parent => {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            values.child_name = format!("{} {}", first, last);
            values.child_student_id = student_id.to_string();
        }
    }
    form
}

/// A wizard on its last step with every field valid.
#[allow(dead_code)]
pub fn filled_wizard() -> SchoolRegistrationWizard {
    let mut wizard = SchoolRegistrationWizard::new();
    wizard.values.school_name = format!("{} Academy", LastName().fake::<String>());
    wizard.values.subdomain = generate_unique_subdomain();
    wizard.advance_step().unwrap();

    wizard.values.admin_first_name = FirstName().fake();
    wizard.values.admin_last_name = LastName().fake();
    wizard.values.email = generate_unique_email();
    wizard.values.phone = "0612345678".to_string();
    wizard.advance_step().unwrap();

    wizard.values.password = VALID_PASSWORD.to_string();
    wizard.values.confirm_password = VALID_PASSWORD.to_string();
    wizard
}
