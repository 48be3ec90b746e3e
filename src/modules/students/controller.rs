//! Student roster and single-student views.

use anyhow::anyhow;
use edulink_core::AppError;
use edulink_models::Student;

use super::service::StudentService;
use crate::router::SubmitError;
use crate::state::AppState;

pub const FAILED_TO_FETCH_STUDENTS: &str = "Failed to fetch students";
pub const STUDENT_NOT_FOUND: &str = "Student not found";

#[derive(Debug, Clone, Default, PartialEq)]
enum RosterState {
    #[default]
    Loading,
    Loaded(Vec<Student>),
    Failed(String),
}

/// The list of students. Starts loading; a failed fetch keeps its message until the next load.
#[derive(Debug, Default)]
pub struct StudentRoster {
    state: RosterState,
}

impl StudentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, state: &AppState) -> Result<&[Student], SubmitError> {
        self.state = RosterState::Loading;

        match StudentService::list(state.gateway.as_ref()).await {
            Ok(students) => {
                self.state = RosterState::Loaded(students);
                Ok(self.students())
            }
            Err(error) => {
                self.state = RosterState::Failed(FAILED_TO_FETCH_STUDENTS.to_string());
                Err(SubmitError::new(FAILED_TO_FETCH_STUDENTS, error))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == RosterState::Loading
    }

    /// `true` only once a fetch succeeded with no rows.
    pub fn is_empty(&self) -> bool {
        matches!(&self.state, RosterState::Loaded(students) if students.is_empty())
    }

    pub fn students(&self) -> &[Student] {
        match &self.state {
            RosterState::Loaded(students) => students,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RosterState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One student's profile, fetched by ID.
#[derive(Debug, Default)]
pub struct StudentProfileView {
    student: Option<Student>,
}

impl StudentProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, state: &AppState, id: &str) -> Result<&Student, SubmitError> {
        self.student = None;

        let student = StudentService::get(state.gateway.as_ref(), id)
            .await
            .map_err(|error| SubmitError::new(FAILED_TO_FETCH_STUDENTS, error))?
            .ok_or_else(|| {
                SubmitError::new(
                    STUDENT_NOT_FOUND,
                    AppError::bad_request(anyhow!("No student with ID {}", id.trim())),
                )
            })?;

        Ok(self.student.insert(student))
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }
}
