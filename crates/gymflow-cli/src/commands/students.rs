use anyhow::Result;
use gymflow_core::student::StudentProfileUpdate;

use super::{print_json, print_source};
use crate::app::App;

pub async fn list(app: &App, refresh: bool) -> Result<()> {
    let session = app.require_session()?;
    let fetched = if refresh {
        app.students.force_refresh(&session).await?
    } else {
        app.students.list(&session).await?
    };
    print_source(fetched.from_cache);
    print_json(&fetched.value)
}

pub async fn show(app: &App, student_id: &str) -> Result<()> {
    let session = app.require_session()?;
    let fetched = app.students.get(&session, student_id).await?;
    print_json(&fetched.value)
}

pub async fn set_active(app: &App, student_id: &str, active: bool) -> Result<()> {
    let session = app.require_session()?;
    app.students.set_active(&session, student_id, active).await?;
    println!(
        "Student {student_id} {}",
        if active { "activated" } else { "deactivated" }
    );
    Ok(())
}

pub async fn update(app: &App, student_id: &str, update: StudentProfileUpdate) -> Result<()> {
    let session = app.require_session()?;
    let student = app
        .students
        .update_profile(&session, student_id, &update)
        .await?;
    print_json(&student)
}
