//! Infrastructure layer for GymFlow.
//!
//! Implements the domain traits against the hosted backend (data service,
//! auth service, serverless functions) and the local filesystem (config,
//! persisted key-value state).

pub mod config;
pub mod dto;
pub mod identity;
pub mod invitation_gateway;
pub mod paths;
pub mod remote_exercise_repository;
pub mod remote_student_repository;
pub mod remote_workout_repository;
pub mod rest;
pub mod storage;

pub use config::AppConfig;
pub use identity::HttpIdentityProvider;
pub use invitation_gateway::FunctionInvitationGateway;
pub use paths::GymflowPaths;
pub use remote_exercise_repository::RemoteExerciseRepository;
pub use remote_student_repository::RemoteStudentRepository;
pub use remote_workout_repository::RemoteWorkoutRepository;
pub use rest::RestClient;
