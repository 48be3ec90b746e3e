//! Account registration and sign-in forms.

use edulink_core::{AppError, ErrorKind, FieldErrors};
use edulink_models::{
    AccountFields, LoginRequest, ParentRegistration, RegistrationInput, RegistrationRole,
    StudentRegistration, TeacherRegistration,
};
use tracing::{debug, warn};

use super::service::AuthService;
use crate::router::{Route, SubmitError, SubmitOutcome};
use crate::state::AppState;
use crate::validator::Validated;

pub const ACCOUNT_CREATED: &str = "Account created successfully!";
pub const ACCOUNT_CREATION_FAILED: &str = "Failed to create account. Please try again.";
pub const SIGNED_IN: &str = "Signed in successfully!";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please try again later.";

/// Everything typed into the registration form, for every role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub student_id: String,
    pub grade_level: String,
    pub subjects: String,
    pub child_name: String,
    pub child_student_id: String,
}

impl RegistrationValues {
    /// Builds the tagged input for `role`. Fields belonging to other roles are left out.
    pub fn to_input(&self, role: RegistrationRole) -> RegistrationInput {
        let account = AccountFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        };

        match role {
            RegistrationRole::Student => RegistrationInput::Student(StudentRegistration {
                account,
                student_id: self.student_id.clone(),
                grade_level: self.grade_level.clone(),
            }),
            RegistrationRole::Teacher => RegistrationInput::Teacher(TeacherRegistration {
                account,
                subjects: self.subjects.clone(),
            }),
            RegistrationRole::Parent => RegistrationInput::Parent(ParentRegistration {
                account,
                child_name: self.child_name.clone(),
                child_student_id: self.child_student_id.clone(),
            }),
        }
    }
}

/// Role-conditional registration form.
///
/// Values survive role switches and failed submits; only the errors of the role being left are
/// dropped when the role changes.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    role: RegistrationRole,
    values: RegistrationValues,
    errors: FieldErrors,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_role(&self) -> RegistrationRole {
        self.role
    }

    pub fn select_role(&mut self, role: RegistrationRole) {
        if role == self.role {
            return;
        }

        self.errors.clear_fields(self.role.specific_fields());
        debug!(from = %self.role, to = %role, "Registration role changed");
        self.role = role;
    }

    pub fn values(&self) -> &RegistrationValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut RegistrationValues {
        &mut self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn input(&self) -> RegistrationInput {
        self.values.to_input(self.role)
    }

    pub async fn submit(&mut self, state: &AppState) -> Result<SubmitOutcome, SubmitError> {
        self.errors.clear();

        let registered = state
            .profiles
            .registered_student_ids()
            .map_err(|e| SubmitError::new(ACCOUNT_CREATION_FAILED, AppError::storage(e)))?;

        let input = Validated::with_context(self.input(), &registered)
            .map_err(|error| self.reject(error))?;

        AuthService::register(state.gateway.as_ref(), &state.profiles, input)
            .await
            .map_err(|error| SubmitError::new(ACCOUNT_CREATION_FAILED, error))?;

        Ok(SubmitOutcome::success(ACCOUNT_CREATED, Route::Login))
    }

    fn reject(&mut self, error: AppError) -> SubmitError {
        if let Some(fields) = error.field_errors() {
            self.errors = fields.clone();
        }
        SubmitError::fields(error)
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub values: LoginRequest,
    errors: FieldErrors,
}

impl LoginForm {
    /// Starts with the remembered email, if one was stored.
    pub fn new(state: &AppState) -> Self {
        let mut form = Self::default();
        match state.profiles.remembered_email() {
            Ok(Some(email)) => {
                form.values.email = email;
                form.values.remember_me = true;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read remembered email"),
        }
        form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub async fn submit(&mut self, state: &AppState) -> Result<SubmitOutcome, SubmitError> {
        self.errors.clear();

        let request = match Validated::new(self.values.clone()) {
            Ok(request) => request,
            Err(error) => {
                if let Some(fields) = error.field_errors() {
                    self.errors = fields.clone();
                }
                return Err(SubmitError::fields(error));
            }
        };

        match AuthService::login(state.gateway.as_ref(), &state.profiles, request).await {
            Ok(_) => Ok(SubmitOutcome::success(SIGNED_IN, Route::Dashboard)),
            Err(error) if error.kind == ErrorKind::Unauthorized => {
                Err(SubmitError::new(INVALID_CREDENTIALS, error))
            }
            Err(error) => Err(SubmitError::new(AUTHENTICATION_FAILED, error)),
        }
    }
}
