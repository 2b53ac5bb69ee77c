//! Workout repository trait.

use async_trait::async_trait;

use super::model::{NewWorkout, Workout};
use crate::error::Result;

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Workouts built by an instructor, newest first.
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Workout>>;

    /// Workouts assigned to a student, newest first.
    async fn list_for_student(&self, student_id: &str) -> Result<Vec<Workout>>;

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>>;

    /// Creates a workout owned by `instructor_id` and returns the stored row.
    async fn create(&self, instructor_id: &str, workout: &NewWorkout) -> Result<Workout>;

    async fn delete(&self, workout_id: &str) -> Result<()>;
}
