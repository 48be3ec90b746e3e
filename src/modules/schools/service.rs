//! School registration: create the administrator account, the school row, and the link between
//! them.
//!
//! The three remote calls are not atomic and the backend offers no way to undo them, so after
//! each completed step a [`PendingSchoolRegistration`] marker is stored locally. Submitting the
//! same school again picks up from the last completed step instead of starting over.

use edulink_core::AppError;
use edulink_gateway::AuthGateway;
use edulink_models::schools::{SCHOOL_ADMINS_TABLE, SCHOOLS_TABLE};
use edulink_models::{PendingSchoolRegistration, RegistrationStage, SchoolRegistrationInput};
use edulink_storage::ProfileStore;
use tracing::{debug, error, info, instrument, warn};

use crate::validator::Validated;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSchool {
    pub user_id: String,
    pub school_id: String,
}

pub struct SchoolService;

impl SchoolService {
    #[instrument(
        skip(gateway, profiles, input),
        fields(school.subdomain = %input.subdomain, admin.email = %input.email)
    )]
    pub async fn register(
        gateway: &dyn AuthGateway,
        profiles: &ProfileStore,
        input: Validated<SchoolRegistrationInput>,
    ) -> Result<RegisteredSchool, AppError> {
        let input = input.into_inner();
        let email = input.email.trim();

        let pending = profiles
            .pending_school_registration()
            .map_err(AppError::storage)?
            .filter(|pending| pending.matches(&input));

        let mut stage = match pending {
            Some(pending) => {
                info!(stage = ?pending.stage, "Resuming incomplete school registration");
                Self::ensure_session(gateway, email, &input.password).await?;
                pending.stage
            }
            None => {
                debug!("Creating administrator account");
                let user = gateway
                    .sign_up(email, &input.password, &input.admin_metadata())
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Administrator sign-up failed");
                        AppError::remote(e)
                    })?;

                let stage = RegistrationStage::AccountCreated { user_id: user.id };
                Self::checkpoint(profiles, &input, &stage);
                Self::ensure_session(gateway, email, &input.password).await?;
                stage
            }
        };

        if let RegistrationStage::AccountCreated { user_id } = &stage {
            let school = gateway
                .insert(SCHOOLS_TABLE, &input.school_record())
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to create school");
                    AppError::remote(e)
                })?;
            info!(school.id = %school.id, "School created");

            stage = RegistrationStage::SchoolCreated {
                user_id: user_id.clone(),
                school_id: school.id,
            };
            Self::checkpoint(profiles, &input, &stage);
        }

        let RegistrationStage::SchoolCreated { user_id, school_id } = stage else {
            return Err(AppError::internal(anyhow::anyhow!(
                "School registration stopped before the school was created"
            )));
        };

        let link = SchoolRegistrationInput::admin_link_record(&user_id, &school_id);
        gateway
            .insert(SCHOOL_ADMINS_TABLE, &link)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    school.id = %school_id,
                    "Failed to link administrator to school"
                );
                AppError::remote(e)
            })?;

        if let Err(e) = profiles.clear_pending_school_registration() {
            warn!(error = %e, "Failed to clear pending school registration");
        }

        info!(user.id = %user_id, school.id = %school_id, "School registered");
        Ok(RegisteredSchool { user_id, school_id })
    }

    /// Inserts need the administrator's session. Sign-up returns none while the email is
    /// unconfirmed, and a resumed run may have lost it.
    async fn ensure_session(
        gateway: &dyn AuthGateway,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let session = gateway.get_session().await.map_err(AppError::remote)?;
        if session.is_some() {
            return Ok(());
        }

        debug!("No administrator session, signing in");
        gateway
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to get administrator session");
                AppError::remote(e)
            })?;
        Ok(())
    }

    fn checkpoint(
        profiles: &ProfileStore,
        input: &SchoolRegistrationInput,
        stage: &RegistrationStage,
    ) {
        let pending = PendingSchoolRegistration::new(input, stage.clone());
        match profiles.set_pending_school_registration(&pending) {
            Ok(()) => debug!(stage = ?stage, "School registration checkpoint stored"),
            Err(e) => {
                warn!(error = %e, stage = ?stage, "Failed to store school registration checkpoint")
            }
        }
    }
}
