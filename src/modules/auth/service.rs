use edulink_core::AppError;
use edulink_gateway::AuthGateway;
use edulink_models::{LoginRequest, RegistrationInput, Session, UserProfile};
use edulink_storage::ProfileStore;
use tracing::{debug, error, info, instrument, warn};

use crate::validator::Validated;

pub struct AuthService;

impl AuthService {
    /// Creates the account remotely, then writes the profile through to local storage.
    ///
    /// Local writes after a successful sign-up are logged but do not fail the registration:
    /// the account already exists on the backend.
    #[instrument(
        skip(gateway, profiles, input),
        fields(user.email = %input.account().email, user.role = %input.role())
    )]
    pub async fn register(
        gateway: &dyn AuthGateway,
        profiles: &ProfileStore,
        input: Validated<RegistrationInput>,
    ) -> Result<UserProfile, AppError> {
        let input = input.into_inner();
        let account = input.account();
        debug!("Creating account");

        let user = gateway
            .sign_up(
                account.email.trim(),
                &account.password,
                &input.sign_up_metadata(),
            )
            .await
            .map_err(|e| {
                error!(error = %e, "Sign-up rejected by the auth service");
                AppError::remote(e)
            })?;

        let profile = UserProfile::from_registration(&input, profiles.today());
        if let Err(e) = profiles.create(&profile) {
            error!(error = %e, user.id = %user.id, "Failed to store profile locally");
        }

        if let RegistrationInput::Student(student) = &input
            && let Err(e) = profiles.register_student_id(&student.student_id)
        {
            error!(error = %e, student.id = %student.student_id, "Failed to record student ID");
        }

        info!(user.id = %user.id, "Account registered");
        Ok(profile)
    }

    #[instrument(skip(gateway, profiles, request), fields(user.email = %request.email))]
    pub async fn login(
        gateway: &dyn AuthGateway,
        profiles: &ProfileStore,
        request: Validated<LoginRequest>,
    ) -> Result<Session, AppError> {
        let request = request.into_inner();
        let email = request.email.trim();

        let session = gateway
            .sign_in_with_password(email, &request.password)
            .await
            .map_err(|e| {
                if e.is_invalid_credentials() {
                    warn!("Sign-in refused: invalid credentials");
                    AppError::unauthorized(e)
                } else {
                    error!(error = %e, "Sign-in failed");
                    AppError::remote(e)
                }
            })?;

        match profiles.touch_last_login(email) {
            Ok(true) => debug!("Updated last login on stored profile"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to update last login"),
        }

        let remembered = if request.remember_me {
            profiles.remember_email(email)
        } else {
            profiles.forget_email()
        };
        if let Err(e) = remembered {
            warn!(error = %e, "Failed to update remembered email");
        }

        info!(user.id = %session.user.id, "Signed in");
        Ok(session)
    }
}
