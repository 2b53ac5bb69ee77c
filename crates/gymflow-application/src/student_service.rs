//! Student management for instructors.

use std::sync::Arc;

use gymflow_core::auth::AuthSession;
use gymflow_core::cache::{CacheKey, collections};
use gymflow_core::error::{GymError, Result};
use gymflow_core::student::{Student, StudentProfileUpdate, StudentRepository};

use crate::context::AppContext;
use crate::load_state::Fetched;

pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
    context: Arc<AppContext>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>, context: Arc<AppContext>) -> Self {
        Self {
            repository,
            context,
        }
    }

    fn require_manager(session: &AuthSession) -> Result<()> {
        if session.role().can_manage_students() {
            Ok(())
        } else {
            Err(GymError::permission(format!(
                "role '{}' cannot manage students",
                session.role()
            )))
        }
    }

    fn list_key(session: &AuthSession) -> CacheKey {
        CacheKey::new(collections::STUDENTS, session.user_id(), session.role())
    }

    fn detail_key(session: &AuthSession, student_id: &str) -> CacheKey {
        CacheKey::new(collections::STUDENT, student_id, session.role())
    }

    /// Students assigned to the signed-in instructor, served from cache when fresh.
    pub async fn list(&self, session: &AuthSession) -> Result<Fetched<Vec<Student>>> {
        Self::require_manager(session)?;
        self.context
            .cached(
                self.context.students(),
                Self::list_key(session),
                "students.list",
                self.repository.list_for_instructor(session.user_id()),
            )
            .await
    }

    /// Pull-to-refresh: always hits the backend.
    pub async fn force_refresh(&self, session: &AuthSession) -> Result<Fetched<Vec<Student>>> {
        Self::require_manager(session)?;
        self.context
            .refresh(
                self.context.students(),
                Self::list_key(session),
                "students.list",
                self.repository.list_for_instructor(session.user_id()),
            )
            .await
    }

    pub async fn get(&self, session: &AuthSession, student_id: &str) -> Result<Fetched<Student>> {
        Self::require_manager(session)?;
        let repository = self.repository.clone();
        let id = student_id.to_string();
        self.context
            .cached(
                self.context.student(),
                Self::detail_key(session, student_id),
                "students.get",
                async move {
                    repository
                        .find_by_id(&id)
                        .await?
                        .ok_or_else(|| GymError::not_found("student", id))
                },
            )
            .await
    }

    pub async fn update_profile(
        &self,
        session: &AuthSession,
        student_id: &str,
        update: &StudentProfileUpdate,
    ) -> Result<Student> {
        Self::require_manager(session)?;
        let update = update.validated()?;
        let student = self
            .context
            .timeouts()
            .run(
                "students.update_profile",
                self.repository.update_profile(student_id, &update),
            )
            .await?;
        self.invalidate(session, student_id);
        tracing::info!(student_id, "student profile updated");
        Ok(student)
    }

    pub async fn set_active(
        &self,
        session: &AuthSession,
        student_id: &str,
        active: bool,
    ) -> Result<()> {
        Self::require_manager(session)?;
        self.context
            .timeouts()
            .run(
                "students.set_active",
                self.repository.set_active(student_id, active),
            )
            .await?;
        self.invalidate(session, student_id);
        tracing::info!(student_id, active, "student activation changed");
        Ok(())
    }

    fn invalidate(&self, session: &AuthSession, student_id: &str) {
        self.context.students().invalidate(&Self::list_key(session));
        self.context
            .student()
            .invalidate(&Self::detail_key(session, student_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextSettings;
    use crate::test_support::{MockStudentRepository, session, student};
    use gymflow_core::auth::Role;

    fn service(repository: Arc<MockStudentRepository>) -> StudentService {
        StudentService::new(repository, Arc::new(AppContext::new(ContextSettings::default())))
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let repository = Arc::new(MockStudentRepository::with_students(vec![
            student("s-1", "u-1"),
            student("s-2", "someone-else"),
        ]));
        let service = service(repository.clone());
        let session = session(Role::Instructor);

        let first = service.list(&session).await.unwrap();
        assert_eq!(first.value.len(), 1);
        assert!(!first.from_cache);

        let second = service.list(&session).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(repository.list_calls(), 1);

        service.force_refresh(&session).await.unwrap();
        assert_eq!(repository.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_list_is_not_cached() {
        let repository = Arc::new(MockStudentRepository::with_students(vec![student(
            "s-1", "u-1",
        )]));
        repository.fail_next(GymError::network("offline"));
        let service = service(repository.clone());
        let session = session(Role::Instructor);

        assert!(service.list(&session).await.unwrap_err().is_network());
        let retry = service.list(&session).await.unwrap();
        assert!(!retry.from_cache);
        assert_eq!(repository.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_students_cannot_list_students() {
        let repository = Arc::new(MockStudentRepository::default());
        let service = service(repository.clone());

        let err = service.list(&session(Role::Student)).await.unwrap_err();
        assert!(matches!(err, GymError::Permission(_)));
        assert_eq!(repository.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_invalidates_list() {
        let repository = Arc::new(MockStudentRepository::with_students(vec![student(
            "s-1", "u-1",
        )]));
        let service = service(repository.clone());
        let session = session(Role::Instructor);
        service.list(&session).await.unwrap();

        let updated = service
            .update_profile(
                &session,
                "s-1",
                &StudentProfileUpdate {
                    full_name: Some(" Ana Lima ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Ana Lima");

        let after = service.list(&session).await.unwrap();
        assert!(!after.from_cache);
        assert_eq!(after.value[0].full_name, "Ana Lima");
    }

    #[tokio::test]
    async fn test_invalid_update_never_reaches_repository() {
        let repository = Arc::new(MockStudentRepository::with_students(vec![student(
            "s-1", "u-1",
        )]));
        let service = service(repository.clone());

        let err = service
            .update_profile(
                &session(Role::Instructor),
                "s-1",
                &StudentProfileUpdate::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repository.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_student() {
        let service = service(Arc::new(MockStudentRepository::default()));
        let err = service
            .get(&session(Role::Admin), "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_set_active() {
        let repository = Arc::new(MockStudentRepository::with_students(vec![student(
            "s-1", "u-1",
        )]));
        let service = service(repository.clone());
        let session = session(Role::Instructor);

        service.set_active(&session, "s-1", false).await.unwrap();
        let fetched = service.get(&session, "s-1").await.unwrap();
        assert!(!fetched.value.active);
    }
}
