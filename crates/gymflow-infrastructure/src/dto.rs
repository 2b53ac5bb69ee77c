//! Row shapes returned by the backend and their conversion into domain models.
//!
//! Column names follow the database schema (`is_active`, `order_index`), which
//! differs slightly from the domain vocabulary.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gymflow_core::auth::{AuthSession, AuthUser, Role};
use gymflow_core::student::Student;
use gymflow_core::workout::{Workout, WorkoutExercise};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentRow {
    pub id: String,
    pub instructor_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_active", alias = "active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: row.id,
            instructor_id: row.instructor_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            birth_date: row.birth_date,
            goals: row.goals,
            notes: row.notes,
            active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExerciseRow {
    pub exercise_id: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub order_index: u32,
}

impl From<WorkoutExerciseRow> for WorkoutExercise {
    fn from(row: WorkoutExerciseRow) -> Self {
        WorkoutExercise {
            exercise_id: row.exercise_id,
            sets: row.sets,
            reps: row.reps,
            rest_seconds: row.rest_seconds.unwrap_or_default(),
            weight_kg: row.weight_kg,
            position: row.order_index,
        }
    }
}

impl From<&WorkoutExercise> for WorkoutExerciseRow {
    fn from(exercise: &WorkoutExercise) -> Self {
        WorkoutExerciseRow {
            exercise_id: exercise.exercise_id.clone(),
            sets: exercise.sets,
            reps: exercise.reps,
            rest_seconds: Some(exercise.rest_seconds),
            weight_kg: exercise.weight_kg,
            order_index: exercise.position,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutRow {
    pub id: String,
    pub instructor_id: String,
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workout_exercises: Vec<WorkoutExerciseRow>,
    pub created_at: DateTime<Utc>,
}

impl From<WorkoutRow> for Workout {
    fn from(row: WorkoutRow) -> Self {
        let mut exercises: Vec<WorkoutExercise> =
            row.workout_exercises.into_iter().map(Into::into).collect();
        exercises.sort_by_key(|exercise| exercise.position);
        Workout {
            id: row.id,
            instructor_id: row.instructor_id,
            student_id: row.student_id,
            name: row.name,
            description: row.description,
            exercises,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: UserRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub app_metadata: Value,
}

impl UserRecord {
    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.user_metadata
            .get(field)
            .and_then(Value::as_str)
            .or_else(|| self.app_metadata.get(field).and_then(Value::as_str))
    }

    pub fn into_auth_user(self) -> AuthUser {
        let role = Role::from_metadata(self.metadata_str("role"));
        let instructor_id = self.metadata_str("instructor_id").map(str::to_string);
        AuthUser {
            id: self.id,
            email: self.email,
            role,
            instructor_id,
        }
    }
}

impl TokenResponse {
    /// Builds a session; `now` anchors a relative `expires_in`.
    pub fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| {
                self.expires_in
                    .and_then(chrono::Duration::try_seconds)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
            });
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into_auth_user(),
        }
    }
}
