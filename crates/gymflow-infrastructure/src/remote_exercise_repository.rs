use std::sync::Arc;

use async_trait::async_trait;
use gymflow_core::error::Result;
use gymflow_core::exercise::{Exercise, ExerciseRepository, NewExercise};
use serde::Serialize;

use crate::rest::{RestClient, TableQuery};

const EXERCISES_TABLE: &str = "exercises";

/// Exercise library stored in the `exercises` table.
pub struct RemoteExerciseRepository {
    rest: Arc<RestClient>,
}

impl RemoteExerciseRepository {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }
}

#[derive(Serialize)]
struct ExerciseInsert<'a> {
    name: &'a str,
    muscle_group: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<&'a str>,
    created_by: &'a str,
}

#[async_trait]
impl ExerciseRepository for RemoteExerciseRepository {
    async fn list_all(&self) -> Result<Vec<Exercise>> {
        let query = TableQuery::from(EXERCISES_TABLE)
            .select("*")
            .order("name", true);
        self.rest.select(&query).await
    }

    async fn find_by_id(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        let query = TableQuery::from(EXERCISES_TABLE)
            .select("*")
            .eq("id", exercise_id);
        self.rest.select_single(&query).await
    }

    async fn create(&self, created_by: &str, exercise: &NewExercise) -> Result<Exercise> {
        let row = ExerciseInsert {
            name: &exercise.name,
            muscle_group: &exercise.muscle_group,
            description: exercise.description.as_deref(),
            video_url: exercise.video_url.as_deref(),
            created_by,
        };
        self.rest.insert(EXERCISES_TABLE, &row).await
    }
}
