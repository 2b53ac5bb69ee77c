//! Student repository trait.

use async_trait::async_trait;

use super::model::{Student, StudentProfileUpdate};
use crate::error::Result;

/// Remote access to student records.
///
/// Implementations translate the service's "row not found" code into
/// `Ok(None)` rather than an error.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Lists the students owned by an instructor, ordered by name.
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Student>>;

    /// Finds a student by ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Student))`: Student found
    /// - `Ok(None)`: No such row
    /// - `Err(_)`: Remote or network failure
    async fn find_by_id(&self, student_id: &str) -> Result<Option<Student>>;

    /// Applies a profile update and returns the stored record.
    async fn update_profile(
        &self,
        student_id: &str,
        update: &StudentProfileUpdate,
    ) -> Result<Student>;

    /// Activates or deactivates a student.
    async fn set_active(&self, student_id: &str, active: bool) -> Result<()>;
}
