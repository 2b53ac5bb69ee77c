//! Workout repository over the `workouts` table.
//!
//! Creation goes through the `create_workout` procedure so the workout and its
//! exercise rows are written in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use gymflow_core::error::Result;
use gymflow_core::workout::{NewWorkout, Workout, WorkoutRepository};
use serde::Serialize;

use crate::dto::{WorkoutExerciseRow, WorkoutRow};
use crate::rest::{RestClient, TableQuery};

const WORKOUTS_TABLE: &str = "workouts";
const WITH_EXERCISES: &str = "*,workout_exercises(*)";

pub struct RemoteWorkoutRepository {
    rest: Arc<RestClient>,
}

impl RemoteWorkoutRepository {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    async fn list_where(&self, column: &str, value: &str) -> Result<Vec<Workout>> {
        let query = TableQuery::from(WORKOUTS_TABLE)
            .select(WITH_EXERCISES)
            .eq(column, value)
            .order("created_at", false);
        let rows: Vec<WorkoutRow> = self.rest.select(&query).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Serialize)]
struct CreateWorkoutArgs<'a> {
    p_instructor_id: &'a str,
    p_student_id: &'a str,
    p_name: &'a str,
    p_description: Option<&'a str>,
    p_exercises: Vec<WorkoutExerciseRow>,
}

impl<'a> CreateWorkoutArgs<'a> {
    fn new(instructor_id: &'a str, workout: &'a NewWorkout) -> Self {
        Self {
            p_instructor_id: instructor_id,
            p_student_id: &workout.student_id,
            p_name: &workout.name,
            p_description: workout.description.as_deref(),
            p_exercises: workout.exercises.iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl WorkoutRepository for RemoteWorkoutRepository {
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Workout>> {
        self.list_where("instructor_id", instructor_id).await
    }

    async fn list_for_student(&self, student_id: &str) -> Result<Vec<Workout>> {
        self.list_where("student_id", student_id).await
    }

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>> {
        let query = TableQuery::from(WORKOUTS_TABLE)
            .select(WITH_EXERCISES)
            .eq("id", workout_id);
        let row: Option<WorkoutRow> = self.rest.select_single(&query).await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, instructor_id: &str, workout: &NewWorkout) -> Result<Workout> {
        let args = CreateWorkoutArgs::new(instructor_id, workout);
        let row: WorkoutRow = self.rest.rpc("create_workout", &args).await?;
        tracing::info!(workout_id = %row.id, student_id = %row.student_id, "workout created");
        Ok(row.into())
    }

    async fn delete(&self, workout_id: &str) -> Result<()> {
        self.rest
            .delete(&TableQuery::from(WORKOUTS_TABLE).eq("id", workout_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymflow_core::workout::WorkoutExercise;
    use serde_json::json;

    #[test]
    fn test_create_args_use_column_names() {
        let workout = NewWorkout {
            student_id: "s-1".into(),
            name: "Lower B".into(),
            description: None,
            exercises: vec![WorkoutExercise {
                exercise_id: "e-7".into(),
                sets: 3,
                reps: 12,
                rest_seconds: 60,
                weight_kg: None,
                position: 0,
            }],
        };
        let args = CreateWorkoutArgs::new("i-1", &workout);
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({
                "p_instructor_id": "i-1",
                "p_student_id": "s-1",
                "p_name": "Lower B",
                "p_description": null,
                "p_exercises": [{
                    "exercise_id": "e-7",
                    "sets": 3,
                    "reps": 12,
                    "rest_seconds": 60,
                    "weight_kg": null,
                    "order_index": 0
                }]
            })
        );
    }
}
