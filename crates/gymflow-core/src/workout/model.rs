//! Workout domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_at_least, require_non_empty};

/// One exercise slot inside a workout program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise_id: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default)]
    pub rest_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f32>,
    /// Zero-based position in the program.
    pub position: u32,
}

/// A workout program an instructor assigned to a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub instructor_id: String,
    pub student_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub student_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
}

impl NewWorkout {
    /// Checks required fields and renumbers exercise positions in order.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let student_id = require_non_empty("student", &self.student_id)?.to_string();
        let name = require_non_empty("workout name", &self.name)?.to_string();
        if self.exercises.is_empty() {
            return Err(ValidationError::Invalid(
                "a workout needs at least one exercise".to_string(),
            ));
        }

        let mut exercises = Vec::with_capacity(self.exercises.len());
        for (position, slot) in self.exercises.iter().enumerate() {
            require_non_empty("exercise", &slot.exercise_id)?;
            require_at_least("sets", slot.sets, 1)?;
            require_at_least("reps", slot.reps, 1)?;
            exercises.push(WorkoutExercise {
                position: position as u32,
                ..slot.clone()
            });
        }

        Ok(Self {
            student_id,
            name,
            description: self
                .description
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            exercises,
        })
    }
}
