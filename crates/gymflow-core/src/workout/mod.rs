//! Workout domain module.

mod model;
mod repository;

pub use model::{NewWorkout, Workout, WorkoutExercise};
pub use repository::WorkoutRepository;
