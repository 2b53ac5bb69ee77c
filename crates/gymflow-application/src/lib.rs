//! Application layer for GymFlow.
//!
//! Services coordinate the domain traits, the shared query caches and the
//! timeout manager to implement the screens' use cases.

pub mod auth_controller;
pub mod context;
pub mod exercise_service;
pub mod invitation_service;
pub mod load_state;
pub mod student_service;
pub mod workout_service;

#[cfg(test)]
mod test_support;

pub use auth_controller::AuthController;
pub use context::{AppContext, ContextSettings};
pub use exercise_service::ExerciseService;
pub use invitation_service::InvitationService;
pub use load_state::{Fetched, LoadState};
pub use student_service::StudentService;
pub use workout_service::{NO_STUDENTS_MESSAGE, WorkoutService};
