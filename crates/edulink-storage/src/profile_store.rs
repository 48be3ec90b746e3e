//! The profile store: every record this client keeps on the device.
//!
//! A [`ProfileStore`] is created once at startup and passed by reference to whatever needs it.
//! Missing or unreadable records are never fatal: they read back as `None` (or an empty set) and
//! a warning is logged.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use edulink_models::{
    PendingSchoolRegistration, RegisteredStudentIds, StoredProfile, UserProfile,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::keys;
use crate::kv::{KeyValueStorage, StorageError};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: fn() -> NaiveDate,
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore").finish_non_exhaustive()
    }
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            clock: local_today,
        }
    }

    /// Replaces the source of "today" used for defaulted dates.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Brings a stored profile written by an older client up to the current shape and writes it
    /// back. Does nothing when no profile is stored.
    #[instrument(skip(self))]
    pub fn init(&self) -> Result<Option<UserProfile>, StorageError> {
        let Some(stored) = self.read_stored_profile()? else {
            debug!("No stored profile to migrate");
            return Ok(None);
        };

        if !stored.needs_migration() {
            return Ok(Some(stored.migrate(self.today())));
        }

        let from_version = stored.schema_version;
        let profile = stored.migrate(self.today());
        self.write_json(keys::PROFILE, &profile)?;
        info!(
            from_version = ?from_version,
            to_version = profile.schema_version,
            "Migrated stored profile"
        );

        Ok(Some(profile))
    }

    /// Reads the profile for display. Parents get their child's name from the student
    /// reference table when the ID is known there.
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Option<UserProfile>, StorageError> {
        let Some(stored) = self.read_stored_profile()? else {
            return Ok(None);
        };

        let mut profile = stored.migrate(self.today());
        if profile.enrich_child_name() {
            debug!(
                child_student_id = ?profile.child_student_id,
                "Child name resolved from directory"
            );
        }

        Ok(Some(profile))
    }

    /// The stored profile exactly as written.
    pub fn raw_profile(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::PROFILE)
    }

    /// Stores the profile of a freshly registered account, replacing whatever was there.
    #[instrument(
        skip(self, profile),
        fields(profile.email = %profile.email, profile.role = %profile.role)
    )]
    pub fn create(&self, profile: &UserProfile) -> Result<(), StorageError> {
        if self.raw_profile()?.is_some() {
            debug!("Replacing previously stored profile");
        }
        self.write_json(keys::PROFILE, profile)?;
        info!("Profile created");
        Ok(())
    }

    /// Writes the full profile record. No field validation happens here.
    #[instrument(skip(self, profile), fields(profile.email = %profile.email))]
    pub fn save(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.write_json(keys::PROFILE, profile)?;
        debug!("Profile saved");
        Ok(())
    }

    /// Bumps `last_login` when the stored profile belongs to `email`. Returns whether it did.
    #[instrument(skip(self))]
    pub fn touch_last_login(&self, email: &str) -> Result<bool, StorageError> {
        let Some(stored) = self.read_stored_profile()? else {
            return Ok(false);
        };

        let mut profile = stored.migrate(self.today());
        if !profile.email.trim().eq_ignore_ascii_case(email.trim()) {
            return Ok(false);
        }

        profile.last_login = self.today();
        self.write_json(keys::PROFILE, &profile)?;
        Ok(true)
    }

    pub fn registered_student_ids(&self) -> Result<RegisteredStudentIds, StorageError> {
        Ok(self
            .read_json::<RegisteredStudentIds>(keys::REGISTERED_STUDENT_IDS)?
            .unwrap_or_default())
    }

    /// Adds `id` to the registered set. Returns `false` when it was already there.
    #[instrument(skip(self))]
    pub fn register_student_id(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.registered_student_ids()?;
        if !ids.insert(id) {
            debug!("Student ID already registered");
            return Ok(false);
        }

        self.write_json(keys::REGISTERED_STUDENT_IDS, &ids)?;
        info!(registered = ids.len(), "Student ID registered");
        Ok(true)
    }

    pub fn pending_school_registration(
        &self,
    ) -> Result<Option<PendingSchoolRegistration>, StorageError> {
        self.read_json(keys::PENDING_SCHOOL_REGISTRATION)
    }

    pub fn set_pending_school_registration(
        &self,
        pending: &PendingSchoolRegistration,
    ) -> Result<(), StorageError> {
        self.write_json(keys::PENDING_SCHOOL_REGISTRATION, pending)
    }

    pub fn clear_pending_school_registration(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::PENDING_SCHOOL_REGISTRATION)
    }

    pub fn remembered_email(&self) -> Result<Option<String>, StorageError> {
        self.read_json(keys::REMEMBERED_EMAIL)
    }

    pub fn remember_email(&self, email: &str) -> Result<(), StorageError> {
        self.write_json(keys::REMEMBERED_EMAIL, &email.trim())
    }

    pub fn forget_email(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::REMEMBERED_EMAIL)
    }

    fn read_stored_profile(&self) -> Result<Option<StoredProfile>, StorageError> {
        self.read_json(keys::PROFILE)
    }

    /// Unparseable values are treated as absent.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable local record");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value)?;
        self.storage.set(key, &encoded)
    }
}
