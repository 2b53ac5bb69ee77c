//! Workout programs: listing per role and creation by instructors.

use std::sync::Arc;

use gymflow_core::auth::{AuthSession, Role};
use gymflow_core::cache::{CacheKey, collections};
use gymflow_core::error::{GymError, Result};
use gymflow_core::student::Student;
use gymflow_core::workout::{NewWorkout, Workout, WorkoutRepository};

use crate::context::AppContext;
use crate::load_state::Fetched;
use crate::student_service::StudentService;

pub const NO_STUDENTS_MESSAGE: &str =
    "No students found. Invite a student before creating a workout.";

pub struct WorkoutService {
    repository: Arc<dyn WorkoutRepository>,
    students: Arc<StudentService>,
    context: Arc<AppContext>,
}

impl WorkoutService {
    pub fn new(
        repository: Arc<dyn WorkoutRepository>,
        students: Arc<StudentService>,
        context: Arc<AppContext>,
    ) -> Self {
        Self {
            repository,
            students,
            context,
        }
    }

    fn key(session: &AuthSession) -> CacheKey {
        CacheKey::new(collections::WORKOUTS, session.user_id(), session.role())
    }

    /// Workouts visible to the caller: the ones an instructor built, or the
    /// ones assigned to a student.
    pub async fn list(&self, session: &AuthSession) -> Result<Fetched<Vec<Workout>>> {
        let fetch = match session.role() {
            Role::Instructor | Role::Admin => {
                self.repository.list_for_instructor(session.user_id())
            }
            Role::Student => self.repository.list_for_student(session.user_id()),
            Role::Unknown => {
                return Err(GymError::permission("unrecognized role cannot view workouts"));
            }
        };
        self.context
            .cached(self.context.workouts(), Self::key(session), "workouts.list", fetch)
            .await
    }

    /// Guard run when the instructor opens the workout builder.
    ///
    /// Returns the students a workout can be assigned to, or a precondition
    /// failure when there are none.
    pub async fn prepare_builder(&self, session: &AuthSession) -> Result<Vec<Student>> {
        if session.role() != Role::Instructor {
            return Err(GymError::permission("only instructors can create workouts"));
        }
        let students = self.students.list(session).await?.into_value();
        if students.is_empty() {
            tracing::info!(instructor_id = %session.user_id(), "workout builder blocked: no students");
            return Err(GymError::precondition(NO_STUDENTS_MESSAGE));
        }
        Ok(students)
    }

    pub async fn create_workout(&self, session: &AuthSession, workout: &NewWorkout) -> Result<Workout> {
        let students = self.prepare_builder(session).await?;
        let workout = workout.validated()?;
        if !students.iter().any(|s| s.id == workout.student_id) {
            return Err(GymError::precondition(format!(
                "Student '{}' is not one of your students.",
                workout.student_id
            )));
        }

        let created = self
            .context
            .timeouts()
            .run(
                "workouts.create",
                self.repository.create(session.user_id(), &workout),
            )
            .await?;
        self.context.workouts().invalidate_collection(collections::WORKOUTS);
        tracing::info!(workout_id = %created.id, student_id = %created.student_id, "workout created");
        Ok(created)
    }

    pub async fn delete_workout(&self, session: &AuthSession, workout_id: &str) -> Result<()> {
        if session.role() != Role::Instructor && session.role() != Role::Admin {
            return Err(GymError::permission("only instructors can delete workouts"));
        }
        self.context
            .timeouts()
            .run("workouts.delete", self.repository.delete(workout_id))
            .await?;
        self.context.workouts().invalidate_collection(collections::WORKOUTS);
        tracing::info!(workout_id, "workout deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextSettings;
    use crate::test_support::{MockStudentRepository, MockWorkoutRepository, session, student};
    use gymflow_core::workout::WorkoutExercise;

    struct Fixture {
        students: Arc<MockStudentRepository>,
        workouts: Arc<MockWorkoutRepository>,
        service: WorkoutService,
    }

    fn fixture(students: Vec<Student>) -> Fixture {
        let context = Arc::new(AppContext::new(ContextSettings::default()));
        let student_repository = Arc::new(MockStudentRepository::with_students(students));
        let workout_repository = Arc::new(MockWorkoutRepository::default());
        let student_service = Arc::new(StudentService::new(
            student_repository.clone(),
            context.clone(),
        ));
        Fixture {
            students: student_repository,
            workouts: workout_repository.clone(),
            service: WorkoutService::new(workout_repository, student_service, context),
        }
    }

    fn new_workout(student_id: &str) -> NewWorkout {
        NewWorkout {
            student_id: student_id.into(),
            name: "Full body".into(),
            description: None,
            exercises: vec![WorkoutExercise {
                exercise_id: "e-1".into(),
                sets: 3,
                reps: 10,
                rest_seconds: 60,
                weight_kg: None,
                position: 7,
            }],
        }
    }

    #[tokio::test]
    async fn test_zero_students_blocks_creation_without_mutation() {
        let fx = fixture(Vec::new());
        let err = fx
            .service
            .create_workout(&session(Role::Instructor), &new_workout("s-1"))
            .await
            .unwrap_err();

        assert_eq!(err, GymError::precondition(NO_STUDENTS_MESSAGE));
        assert_eq!(fx.workouts.create_calls(), 0);
        assert_eq!(fx.students.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_renumbers_and_invalidates_list() {
        let fx = fixture(vec![student("s-1", "u-1")]);
        let session = session(Role::Instructor);
        assert!(fx.service.list(&session).await.unwrap().value.is_empty());

        let created = fx
            .service
            .create_workout(&session, &new_workout("s-1"))
            .await
            .unwrap();
        assert_eq!(created.exercises[0].position, 0);

        let listed = fx.service.list(&session).await.unwrap();
        assert!(!listed.from_cache);
        assert_eq!(listed.value.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_assign_to_foreign_student() {
        let fx = fixture(vec![student("s-1", "u-1"), student("s-9", "other")]);
        let err = fx
            .service
            .create_workout(&session(Role::Instructor), &new_workout("s-9"))
            .await
            .unwrap_err();
        assert!(matches!(err, GymError::Precondition(_)));
        assert_eq!(fx.workouts.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_students_see_assigned_workouts() {
        let fx = fixture(vec![student("u-1", "i-1")]);
        let instructor = AuthSession {
            user: gymflow_core::auth::AuthUser {
                id: "i-1".into(),
                ..session(Role::Instructor).user
            },
            ..session(Role::Instructor)
        };
        fx.service
            .create_workout(&instructor, &new_workout("u-1"))
            .await
            .unwrap();

        let mine = fx.service.list(&session(Role::Student)).await.unwrap();
        assert_eq!(mine.value.len(), 1);
        assert!(fx.service.list(&session(Role::Unknown)).await.is_err());
    }

    #[tokio::test]
    async fn test_students_cannot_open_builder() {
        let fx = fixture(vec![student("s-1", "u-1")]);
        let err = fx
            .service
            .prepare_builder(&session(Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, GymError::Permission(_)));
    }
}
