//! End-to-end flows through the application services with in-memory backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gymflow_application::{
    AppContext, ContextSettings, InvitationService, LoadState, NO_STUDENTS_MESSAGE,
    StudentService, WorkoutService,
};
use gymflow_core::auth::{AuthSession, AuthUser, Role};
use gymflow_core::error::{GymError, Result};
use gymflow_core::invitation::{InvitationGateway, InviteRequest, InviteResponse};
use gymflow_core::student::{Student, StudentProfileUpdate, StudentRepository};
use gymflow_core::workout::{NewWorkout, Workout, WorkoutExercise, WorkoutRepository};

const ALREADY_REGISTERED: &str = "A user with this email address has already been registered";

fn instructor() -> AuthSession {
    AuthSession {
        access_token: "jwt".into(),
        refresh_token: None,
        expires_at: None,
        user: AuthUser {
            id: "i-1".into(),
            email: Some("coach@example.com".into()),
            role: Role::Instructor,
            instructor_id: None,
        },
    }
}

/// Backend with no students and counters on every mutation.
#[derive(Default)]
struct EmptyGym {
    mutations: AtomicUsize,
}

#[async_trait]
impl StudentRepository for EmptyGym {
    async fn list_for_instructor(&self, _instructor_id: &str) -> Result<Vec<Student>> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _student_id: &str) -> Result<Option<Student>> {
        Ok(None)
    }

    async fn update_profile(&self, id: &str, _update: &StudentProfileUpdate) -> Result<Student> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Err(GymError::not_found("student", id))
    }

    async fn set_active(&self, _student_id: &str, _active: bool) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl WorkoutRepository for EmptyGym {
    async fn list_for_instructor(&self, _instructor_id: &str) -> Result<Vec<Workout>> {
        Ok(Vec::new())
    }

    async fn list_for_student(&self, _student_id: &str) -> Result<Vec<Workout>> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _workout_id: &str) -> Result<Option<Workout>> {
        Ok(None)
    }

    async fn create(&self, _instructor_id: &str, _workout: &NewWorkout) -> Result<Workout> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Err(GymError::internal("create must not be reached"))
    }

    async fn delete(&self, _workout_id: &str) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Invitation function that knows one registered email.
struct InviteFunction {
    registered: String,
    calls: Mutex<Vec<InviteRequest>>,
}

#[async_trait]
impl InvitationGateway for InviteFunction {
    async fn invite(&self, _access_token: &str, request: &InviteRequest) -> Result<InviteResponse> {
        self.calls.lock().unwrap().push(request.clone());
        if request.email == self.registered {
            Ok(InviteResponse::failed(ALREADY_REGISTERED))
        } else {
            Ok(InviteResponse::ok())
        }
    }
}

/// Student list that never answers.
struct Hanging;

#[async_trait]
impl StudentRepository for Hanging {
    async fn list_for_instructor(&self, _instructor_id: &str) -> Result<Vec<Student>> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _student_id: &str) -> Result<Option<Student>> {
        std::future::pending().await
    }

    async fn update_profile(&self, _id: &str, _update: &StudentProfileUpdate) -> Result<Student> {
        std::future::pending().await
    }

    async fn set_active(&self, _student_id: &str, _active: bool) -> Result<()> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn instructor_without_students_cannot_create_workout() {
    let context = Arc::new(AppContext::new(ContextSettings::default()));
    let backend = Arc::new(EmptyGym::default());
    let students = Arc::new(StudentService::new(backend.clone(), context.clone()));
    let workouts = WorkoutService::new(backend.clone(), students, context);

    let workout = NewWorkout {
        student_id: "s-1".into(),
        name: "Push day".into(),
        description: None,
        exercises: vec![WorkoutExercise {
            exercise_id: "e-1".into(),
            sets: 4,
            reps: 8,
            rest_seconds: 90,
            weight_kg: Some(60.0),
            position: 0,
        }],
    };

    let state: LoadState<Workout> = LoadState::Loading.settle(
        workouts
            .create_workout(&instructor(), &workout)
            .await
            .map(gymflow_application::Fetched::fresh),
    );

    assert_eq!(state.error_message(), Some(NO_STUDENTS_MESSAGE));
    assert_eq!(backend.mutations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invitation_for_registered_email_skips_success_callback() {
    let context = Arc::new(AppContext::new(ContextSettings::default()));
    let gateway = Arc::new(InviteFunction {
        registered: "ana@example.com".into(),
        calls: Mutex::new(Vec::new()),
    });
    let service = InvitationService::new(gateway.clone(), context);
    let mut successes = 0;

    let response = service
        .invite_student(&instructor(), "Ana@Example.com", "Ana Souza", |_| successes += 1)
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some(ALREADY_REGISTERED));
    assert_eq!(successes, 0);
    assert_eq!(gateway.calls.lock().unwrap().len(), 1);

    let response = service
        .invite_student(&instructor(), "new@example.com", "New Student", |_| successes += 1)
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(successes, 1);
}

#[tokio::test(start_paused = true)]
async fn hanging_list_times_out_as_network_failure() {
    let context = Arc::new(AppContext::new(ContextSettings {
        request_timeout: Duration::from_millis(100),
        ..Default::default()
    }));
    let students = StudentService::new(Arc::new(Hanging), context.clone());

    let started = tokio::time::Instant::now();
    let err = students.list(&instructor()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.is_network());
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(context.timeouts().pending(), 0);
}
