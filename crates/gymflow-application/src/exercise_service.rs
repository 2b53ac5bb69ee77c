use std::sync::Arc;

use gymflow_core::auth::{AuthSession, Role};
use gymflow_core::cache::{CacheKey, collections};
use gymflow_core::error::{GymError, Result};
use gymflow_core::exercise::{Exercise, ExerciseRepository, NewExercise};

use crate::context::AppContext;
use crate::load_state::Fetched;

/// Owner segment for the shared exercise library.
const LIBRARY_OWNER: &str = "library";

/// The exercise library shared by all instructors.
pub struct ExerciseService {
    repository: Arc<dyn ExerciseRepository>,
    context: Arc<AppContext>,
}

impl ExerciseService {
    pub fn new(repository: Arc<dyn ExerciseRepository>, context: Arc<AppContext>) -> Self {
        Self {
            repository,
            context,
        }
    }

    pub async fn list(&self, session: &AuthSession) -> Result<Fetched<Vec<Exercise>>> {
        if !session.role().is_recognized() {
            return Err(GymError::permission("unrecognized role cannot view exercises"));
        }
        self.context
            .cached(
                self.context.exercises(),
                CacheKey::new(collections::EXERCISES, LIBRARY_OWNER, session.role()),
                "exercises.list",
                self.repository.list_all(),
            )
            .await
    }

    pub async fn create(&self, session: &AuthSession, exercise: &NewExercise) -> Result<Exercise> {
        if !matches!(session.role(), Role::Instructor | Role::Admin) {
            return Err(GymError::permission("only instructors can add exercises"));
        }
        let exercise = exercise.validated()?;
        let created = self
            .context
            .timeouts()
            .run(
                "exercises.create",
                self.repository.create(session.user_id(), &exercise),
            )
            .await?;
        self.context
            .exercises()
            .invalidate_collection(collections::EXERCISES);
        tracing::info!(exercise_id = %created.id, "exercise created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextSettings;
    use crate::test_support::{MockExerciseRepository, session};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_create_refreshes_library() {
        let repository = Arc::new(MockExerciseRepository::default());
        let service = ExerciseService::new(
            repository.clone(),
            Arc::new(AppContext::new(ContextSettings::default())),
        );
        let session = session(Role::Instructor);

        assert!(service.list(&session).await.unwrap().value.is_empty());
        assert!(service.list(&session).await.unwrap().from_cache);

        service
            .create(
                &session,
                &NewExercise {
                    name: "Deadlift".into(),
                    muscle_group: "back".into(),
                    description: None,
                    video_url: None,
                },
            )
            .await
            .unwrap();

        let listed = service.list(&session).await.unwrap();
        assert_eq!(listed.value.len(), 1);
        assert_eq!(listed.value[0].created_by.as_deref(), Some("u-1"));
        assert_eq!(repository.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_students_cannot_add_exercises() {
        let service = ExerciseService::new(
            Arc::new(MockExerciseRepository::default()),
            Arc::new(AppContext::new(ContextSettings::default())),
        );
        let err = service
            .create(
                &session(Role::Student),
                &NewExercise {
                    name: "Plank".into(),
                    muscle_group: "core".into(),
                    description: None,
                    video_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GymError::Permission(_)));
    }
}
