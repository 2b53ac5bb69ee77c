//! Hand-written doubles for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use gymflow_core::auth::{
    AuthSession, AuthUser, IdentityProvider, Role, SessionEvent, SessionLookup,
    SessionSubscription,
};
use gymflow_core::error::{GymError, Result};
use gymflow_core::exercise::{Exercise, ExerciseRepository, NewExercise};
use gymflow_core::invitation::{InvitationGateway, InviteRequest, InviteResponse};
use gymflow_core::student::{Student, StudentProfileUpdate, StudentRepository};
use gymflow_core::workout::{NewWorkout, Workout, WorkoutRepository};
use tokio::sync::broadcast;

pub fn session(role: Role) -> AuthSession {
    AuthSession {
        access_token: "jwt".into(),
        refresh_token: Some("refresh".into()),
        expires_at: None,
        user: AuthUser {
            id: "u-1".into(),
            email: Some("coach@example.com".into()),
            role,
            instructor_id: None,
        },
    }
}

pub fn student(id: &str, instructor_id: &str) -> Student {
    Student {
        id: id.into(),
        instructor_id: instructor_id.into(),
        full_name: format!("Student {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        birth_date: None,
        goals: None,
        notes: None,
        active: true,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Students
// ============================================================================

#[derive(Default)]
pub struct MockStudentRepository {
    pub students: Mutex<Vec<Student>>,
    pub list_calls: AtomicUsize,
    pub mutation_calls: AtomicUsize,
    pub fail_with: Mutex<Option<GymError>>,
}

impl MockStudentRepository {
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: Mutex::new(students),
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self, err: GymError) {
        *self.fail_with.lock().unwrap() = Some(err);
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StudentRepository for MockStudentRepository {
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Student>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.instructor_id == instructor_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, student_id: &str) -> Result<Option<Student>> {
        self.take_failure()?;
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == student_id)
            .cloned())
    }

    async fn update_profile(
        &self,
        student_id: &str,
        update: &StudentProfileUpdate,
    ) -> Result<Student> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let mut students = self.students.lock().unwrap();
        let student = students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| GymError::not_found("student", student_id))?;
        if let Some(name) = &update.full_name {
            student.full_name = name.clone();
        }
        if let Some(goals) = &update.goals {
            student.goals = Some(goals.clone());
        }
        Ok(student.clone())
    }

    async fn set_active(&self, student_id: &str, active: bool) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let mut students = self.students.lock().unwrap();
        match students.iter_mut().find(|s| s.id == student_id) {
            Some(student) => {
                student.active = active;
                Ok(())
            }
            None => Err(GymError::not_found("student", student_id)),
        }
    }
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Default)]
pub struct MockWorkoutRepository {
    pub workouts: Mutex<HashMap<String, Workout>>,
    pub create_calls: AtomicUsize,
}

impl MockWorkoutRepository {
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkoutRepository for MockWorkoutRepository {
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Workout>> {
        Ok(self
            .workouts
            .lock()
            .unwrap()
            .values()
            .filter(|w| w.instructor_id == instructor_id)
            .cloned()
            .collect())
    }

    async fn list_for_student(&self, student_id: &str) -> Result<Vec<Workout>> {
        Ok(self
            .workouts
            .lock()
            .unwrap()
            .values()
            .filter(|w| w.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>> {
        Ok(self.workouts.lock().unwrap().get(workout_id).cloned())
    }

    async fn create(&self, instructor_id: &str, workout: &NewWorkout) -> Result<Workout> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        let created = Workout {
            id: format!("w-{n}"),
            instructor_id: instructor_id.into(),
            student_id: workout.student_id.clone(),
            name: workout.name.clone(),
            description: workout.description.clone(),
            exercises: workout.exercises.clone(),
            created_at: Utc::now(),
        };
        self.workouts
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn delete(&self, workout_id: &str) -> Result<()> {
        self.workouts
            .lock()
            .unwrap()
            .remove(workout_id)
            .map(|_| ())
            .ok_or_else(|| GymError::not_found("workout", workout_id))
    }
}

// ============================================================================
// Exercises
// ============================================================================

#[derive(Default)]
pub struct MockExerciseRepository {
    pub exercises: Mutex<Vec<Exercise>>,
    pub list_calls: AtomicUsize,
}

#[async_trait]
impl ExerciseRepository for MockExerciseRepository {
    async fn list_all(&self) -> Result<Vec<Exercise>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.exercises.lock().unwrap().clone())
    }

    async fn find_by_id(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        Ok(self
            .exercises
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == exercise_id)
            .cloned())
    }

    async fn create(&self, created_by: &str, exercise: &NewExercise) -> Result<Exercise> {
        let mut exercises = self.exercises.lock().unwrap();
        let created = Exercise {
            id: format!("e-{}", exercises.len()),
            name: exercise.name.clone(),
            muscle_group: exercise.muscle_group.clone(),
            description: exercise.description.clone(),
            video_url: exercise.video_url.clone(),
            created_by: Some(created_by.into()),
        };
        exercises.push(created.clone());
        Ok(created)
    }
}

// ============================================================================
// Invitations
// ============================================================================

/// Rejects emails listed in `registered` the way the invite function does.
#[derive(Default)]
pub struct MockInvitationGateway {
    pub registered: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<InviteRequest>>,
}

#[async_trait]
impl InvitationGateway for MockInvitationGateway {
    async fn invite(&self, _access_token: &str, request: &InviteRequest) -> Result<InviteResponse> {
        self.calls.lock().unwrap().push(request.clone());
        if self.registered.lock().unwrap().contains(&request.email) {
            return Ok(InviteResponse::failed(
                "A user with this email address has already been registered",
            ));
        }
        Ok(InviteResponse::ok())
    }
}

// ============================================================================
// Identity
// ============================================================================

pub struct MockIdentityProvider {
    pub lookup: Mutex<SessionLookup>,
    pub events: broadcast::Sender<SessionEvent>,
    pub role_on_sign_in: Role,
    pub sign_out_calls: AtomicUsize,
    pub reset_requests: Mutex<Vec<String>>,
}

impl MockIdentityProvider {
    pub fn new(lookup: SessionLookup) -> Arc<Self> {
        let (events, _) = broadcast::channel(8);
        Arc::new(Self {
            lookup: Mutex::new(lookup),
            events,
            role_on_sign_in: Role::Instructor,
            sign_out_calls: AtomicUsize::new(0),
            reset_requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_session(&self) -> SessionLookup {
        self.lookup.lock().unwrap().clone()
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.events.subscribe())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        if password != "secret123" {
            return Err(GymError::auth("Invalid login credentials"));
        }
        let mut session = session(self.role_on_sign_in);
        session.user.email = Some(email.to_string());
        *self.lookup.lock().unwrap() = SessionLookup::found(session.clone());
        Ok(session)
    }

    async fn refresh_session(&self) -> Result<AuthSession> {
        self.lookup
            .lock()
            .unwrap()
            .session
            .clone()
            .ok_or_else(|| GymError::auth("no session"))
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        *self.lookup.lock().unwrap() = SessionLookup::none();
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.reset_requests.lock().unwrap().push(email.to_string());
        Ok(())
    }
}
