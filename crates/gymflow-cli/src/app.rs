//! Wires the infrastructure adapters into the application services.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use gymflow_application::{
    AppContext, AuthController, ContextSettings, ExerciseService, InvitationService,
    StudentService, WorkoutService,
};
use gymflow_core::auth::AuthSession;
use gymflow_core::storage::KeyValueStore;
use gymflow_infrastructure::storage::FileKeyValueStore;
use gymflow_infrastructure::{
    AppConfig, FunctionInvitationGateway, GymflowPaths, HttpIdentityProvider,
    RemoteExerciseRepository, RemoteStudentRepository, RemoteWorkoutRepository, RestClient,
};

pub struct App {
    pub auth: Arc<AuthController>,
    pub students: Arc<StudentService>,
    pub workouts: WorkoutService,
    pub exercises: ExerciseService,
    pub invitations: InvitationService,
    context: Arc<AppContext>,
}

impl App {
    /// Builds every service and resolves the persisted session.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        let rest = Arc::new(RestClient::new(&config.backend)?);
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(GymflowPaths::local_state_file()?));
        let provider = Arc::new(HttpIdentityProvider::new(rest.clone(), store));

        let context = Arc::new(AppContext::new(ContextSettings {
            cache_ttl: config.cache.ttl(),
            max_cache_entries: config.cache.max_entries,
            request_timeout: config.network.request_timeout(),
        }));

        let auth = AuthController::new(provider, context.clone());
        auth.initialize().await;

        let students = Arc::new(StudentService::new(
            Arc::new(RemoteStudentRepository::new(rest.clone())),
            context.clone(),
        ));
        let workouts = WorkoutService::new(
            Arc::new(RemoteWorkoutRepository::new(rest.clone())),
            students.clone(),
            context.clone(),
        );
        let exercises =
            ExerciseService::new(Arc::new(RemoteExerciseRepository::new(rest.clone())), context.clone());
        let invitations = InvitationService::new(
            Arc::new(FunctionInvitationGateway::new(
                rest,
                config.backend.invite_function.clone(),
            )),
            context.clone(),
        );

        Ok(Self {
            auth,
            students,
            workouts,
            exercises,
            invitations,
            context,
        })
    }

    pub fn require_session(&self) -> Result<AuthSession> {
        self.auth
            .current_session()
            .ok_or_else(|| anyhow!("not signed in; run `gymflow login` first"))
    }

    pub fn shutdown(&self) {
        self.context.teardown();
    }
}
