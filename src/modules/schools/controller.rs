//! Three-step school registration wizard.

use edulink_core::{AppError, ErrorKind, FieldErrors};
use edulink_models::SchoolRegistrationInput;
use tracing::debug;

use super::service::SchoolService;
use crate::router::{Route, SubmitError, SubmitOutcome};
use crate::state::AppState;
use crate::validator::Validated;

pub const SCHOOL_REGISTERED: &str =
    "School registration successful! Please check your email to verify your account.";
pub const SCHOOL_REGISTRATION_FAILED: &str = "Failed to register school";
pub const FILL_REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const INCOMPLETE_WIZARD: &str = "Please complete every step before submitting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    SchoolDetails,
    Administrator,
    Security,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::SchoolDetails, Self::Administrator, Self::Security];

    /// 1-based position shown to the user.
    pub fn number(&self) -> u8 {
        match self {
            Self::SchoolDetails => 1,
            Self::Administrator => 2,
            Self::Security => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SchoolDetails => "School details",
            Self::Administrator => "Administrator",
            Self::Security => "Security",
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::SchoolDetails => &["schoolName", "subdomain"],
            Self::Administrator => &["adminFirstName", "adminLastName", "email", "phone"],
            Self::Security => &["password", "confirmPassword", "language"],
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::SchoolDetails => Some(Self::Administrator),
            Self::Administrator => Some(Self::Security),
            Self::Security => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::SchoolDetails => None,
            Self::Administrator => Some(Self::SchoolDetails),
            Self::Security => Some(Self::Administrator),
        }
    }
}

#[derive(Debug, Default)]
pub struct SchoolRegistrationWizard {
    step: WizardStep,
    pub values: SchoolRegistrationInput,
    errors: FieldErrors,
    step_error: Option<String>,
}

impl SchoolRegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The generic message from the last rejected advance, if any.
    pub fn step_error(&self) -> Option<&str> {
        self.step_error.as_deref()
    }

    fn field_value(&self, field: &str) -> &str {
        let values = &self.values;
        match field {
            "schoolName" => &values.school_name,
            "subdomain" => &values.subdomain,
            "adminFirstName" => &values.admin_first_name,
            "adminLastName" => &values.admin_last_name,
            "email" => &values.email,
            "phone" => &values.phone,
            "password" => &values.password,
            "confirmPassword" => &values.confirm_password,
            "language" => values.language.code(),
            _ => "",
        }
    }

    /// Moves to the next step when every field of the current one is filled in. Only presence
    /// is checked here; the full rules run on submit.
    pub fn advance_step(&mut self) -> Result<WizardStep, AppError> {
        let missing = self
            .step
            .fields()
            .iter()
            .any(|field| self.field_value(field).trim().is_empty());

        if missing {
            debug!(step = self.step.number(), "Wizard step incomplete");
            self.step_error = Some(FILL_REQUIRED_FIELDS.to_string());
            return Err(AppError::bad_request(anyhow::anyhow!(FILL_REQUIRED_FIELDS)));
        }

        let Some(next) = self.step.next() else {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Already on the last step"
            )));
        };

        self.step_error = None;
        self.step = next;
        Ok(next)
    }

    pub fn go_back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step_error = None;
        self.step
    }

    /// Earliest step holding a field with a recorded error.
    pub fn first_step_with_errors(&self) -> Option<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.fields().iter().any(|field| self.errors.contains(field)))
    }

    pub async fn submit(&mut self, state: &AppState) -> Result<SubmitOutcome, SubmitError> {
        if self.step != WizardStep::Security {
            return Err(SubmitError::new(
                INCOMPLETE_WIZARD,
                AppError::bad_request(anyhow::anyhow!(INCOMPLETE_WIZARD)),
            ));
        }

        self.errors.clear();
        self.step_error = None;

        let input = match Validated::with_context(self.values.clone(), &()) {
            Ok(input) => input,
            Err(error) => {
                if let Some(fields) = error.field_errors() {
                    self.errors = fields.clone();
                }
                return Err(SubmitError::fields(error));
            }
        };

        match SchoolService::register(state.gateway.as_ref(), &state.profiles, input).await {
            Ok(_) => Ok(SubmitOutcome::success(SCHOOL_REGISTERED, Route::Login)),
            Err(error) if error.kind == ErrorKind::Remote => {
                Err(SubmitError::new(error.to_string(), error))
            }
            Err(error) => Err(SubmitError::new(SCHOOL_REGISTRATION_FAILED, error)),
        }
    }
}
