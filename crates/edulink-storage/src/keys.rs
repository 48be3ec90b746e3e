//! Keys used in local storage. Each value is a JSON document.

/// The signed-up user's profile ([`edulink_models::UserProfile`]).
pub const PROFILE: &str = "user";

/// JSON array of student IDs registered on this device.
pub const REGISTERED_STUDENT_IDS: &str = "registeredStudentIds";

/// Marker for a school registration that stopped part-way.
pub const PENDING_SCHOOL_REGISTRATION: &str = "pendingSchoolRegistration";

/// Email pre-filled on the sign-in form after "remember me".
pub const REMEMBERED_EMAIL: &str = "rememberedEmail";

pub const ALL: [&str; 4] = [
    PROFILE,
    REGISTERED_STUDENT_IDS,
    PENDING_SCHOOL_REGISTRATION,
    REMEMBERED_EMAIL,
];
