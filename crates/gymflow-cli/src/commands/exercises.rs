use anyhow::Result;
use gymflow_core::exercise::NewExercise;

use super::{print_json, print_source};
use crate::app::App;

pub async fn list(app: &App) -> Result<()> {
    let session = app.require_session()?;
    let fetched = app.exercises.list(&session).await?;
    print_source(fetched.from_cache);
    print_json(&fetched.value)
}

pub async fn create(app: &App, exercise: NewExercise) -> Result<()> {
    let session = app.require_session()?;
    let created = app.exercises.create(&session, &exercise).await?;
    print_json(&created)
}
