use edulink_core::AppError;
use edulink_models::UserProfile;
use edulink_storage::ProfileStore;
use tracing::{info, instrument, warn};

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(profiles))]
    pub fn load(profiles: &ProfileStore) -> Result<Option<UserProfile>, AppError> {
        let profile = profiles.load().map_err(AppError::storage)?;
        if profile.is_none() {
            warn!("No stored profile to show");
        }
        Ok(profile)
    }

    /// Persists an edited profile as-is, apart from re-deriving `name`.
    #[instrument(skip(profiles, profile), fields(profile.email = %profile.email))]
    pub fn save(
        profiles: &ProfileStore,
        mut profile: UserProfile,
    ) -> Result<UserProfile, AppError> {
        profile.refresh_name();
        profiles.save(&profile).map_err(AppError::storage)?;
        info!(profile.name = %profile.name, "Profile updated");
        Ok(profile)
    }
}
