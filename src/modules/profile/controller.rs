//! Profile view with an edit mode.

use edulink_core::AppError;
use edulink_models::UserProfile;

use super::service::ProfileService;
use crate::router::{SubmitError, SubmitOutcome};
use crate::state::AppState;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";

/// Holds the last loaded profile and, while editing, a draft copy of it.
#[derive(Debug, Default)]
pub struct ProfileEditor {
    snapshot: Option<UserProfile>,
    draft: Option<UserProfile>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the stored profile. When there is none the editor stays in its loading state.
    pub fn mount(&mut self, state: &AppState) -> Result<Option<&UserProfile>, AppError> {
        self.snapshot = ProfileService::load(&state.profiles)?;
        self.draft = None;
        Ok(self.snapshot.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// The draft while editing, the loaded profile otherwise.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.draft.as_ref().or(self.snapshot.as_ref())
    }

    /// Returns `false` when nothing is loaded.
    pub fn begin_edit(&mut self) -> bool {
        if self.draft.is_none() {
            self.draft = self.snapshot.clone();
        }
        self.draft.is_some()
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    pub fn draft_mut(&mut self) -> Option<&mut UserProfile> {
        self.draft.as_mut()
    }

    /// Writes the draft. Outside edit mode nothing is written and `Ok(None)` is returned.
    pub fn save(&mut self, state: &AppState) -> Result<Option<SubmitOutcome>, SubmitError> {
        let Some(draft) = self.draft.take() else {
            return Ok(None);
        };

        match ProfileService::save(&state.profiles, draft.clone()) {
            Ok(saved) => {
                self.snapshot = Some(saved);
                Ok(Some(SubmitOutcome::stay(PROFILE_UPDATED)))
            }
            Err(error) => {
                self.draft = Some(draft);
                Err(SubmitError::new(PROFILE_UPDATE_FAILED, error))
            }
        }
    }
}
