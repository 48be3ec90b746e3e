use edulink_core::AppError;
use edulink_gateway::{AuthGateway, Row};
use edulink_models::Student;
use edulink_models::students::STUDENTS_TABLE;
use tracing::{debug, error, info, instrument, warn};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(gateway))]
    pub async fn list(gateway: &dyn AuthGateway) -> Result<Vec<Student>, AppError> {
        let rows = gateway.select(STUDENTS_TABLE, &[]).await.map_err(|e| {
            error!(error = %e, "Failed to fetch students");
            AppError::remote(e)
        })?;

        let students = decode_rows(rows);
        info!(count = students.len(), "Students fetched");
        Ok(students)
    }

    #[instrument(skip(gateway))]
    pub async fn get(gateway: &dyn AuthGateway, id: &str) -> Result<Option<Student>, AppError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let filters = [("id", id)];
        let rows = gateway
            .select(STUDENTS_TABLE, &filters)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch student");
                AppError::remote(e)
            })?;

        let student = decode_rows(rows).into_iter().next();
        if student.is_none() {
            debug!("No student with this ID");
        }
        Ok(student)
    }
}

/// Malformed rows are skipped so one bad record does not hide the rest of the roster.
fn decode_rows(rows: Vec<Row>) -> Vec<Student> {
    rows.into_iter()
        .filter_map(|row| match Student::from_row(row) {
            Ok(student) => Some(student),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable student row");
                None
            }
        })
        .collect()
}
