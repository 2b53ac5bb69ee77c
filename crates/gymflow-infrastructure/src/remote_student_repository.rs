//! Student repository over the backend's stored procedures.

use std::sync::Arc;

use async_trait::async_trait;
use gymflow_core::error::Result;
use gymflow_core::student::{Student, StudentProfileUpdate, StudentRepository};
use serde::Serialize;
use serde_json::json;

use crate::dto::StudentRow;
use crate::rest::{RestClient, TableQuery};

const STUDENTS_TABLE: &str = "students";

pub struct RemoteStudentRepository {
    rest: Arc<RestClient>,
}

impl RemoteStudentRepository {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }
}

#[derive(Serialize)]
struct UpdateProfileArgs<'a> {
    p_student_id: &'a str,
    p_full_name: Option<&'a str>,
    p_phone: Option<&'a str>,
    p_goals: Option<&'a str>,
    p_notes: Option<&'a str>,
}

#[async_trait]
impl StudentRepository for RemoteStudentRepository {
    async fn list_for_instructor(&self, instructor_id: &str) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = self
            .rest
            .rpc(
                "get_instructor_students",
                &json!({ "p_instructor_id": instructor_id }),
            )
            .await?;
        tracing::debug!(instructor_id, count = rows.len(), "fetched students");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, student_id: &str) -> Result<Option<Student>> {
        let query = TableQuery::from(STUDENTS_TABLE).select("*").eq("id", student_id);
        let row: Option<StudentRow> = self.rest.select_single(&query).await?;
        Ok(row.map(Into::into))
    }

    async fn update_profile(
        &self,
        student_id: &str,
        update: &StudentProfileUpdate,
    ) -> Result<Student> {
        let args = UpdateProfileArgs {
            p_student_id: student_id,
            p_full_name: update.full_name.as_deref(),
            p_phone: update.phone.as_deref(),
            p_goals: update.goals.as_deref(),
            p_notes: update.notes.as_deref(),
        };
        let row: StudentRow = self.rest.rpc("update_student_profile", &args).await?;
        Ok(row.into())
    }

    async fn set_active(&self, student_id: &str, active: bool) -> Result<()> {
        self.rest
            .rpc_void(
                "set_student_active",
                &json!({ "p_student_id": student_id, "p_active": active }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_args_send_nulls_for_untouched_fields() {
        let update = StudentProfileUpdate {
            goals: Some("mobility".into()),
            ..Default::default()
        };
        let args = UpdateProfileArgs {
            p_student_id: "s-1",
            p_full_name: update.full_name.as_deref(),
            p_phone: update.phone.as_deref(),
            p_goals: update.goals.as_deref(),
            p_notes: update.notes.as_deref(),
        };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({
                "p_student_id": "s-1",
                "p_full_name": null,
                "p_phone": null,
                "p_goals": "mobility",
                "p_notes": null,
            })
        );
    }
}
