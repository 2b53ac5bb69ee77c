use anyhow::{Context, Result, bail};
use gymflow_core::workout::{NewWorkout, WorkoutExercise};

use super::{print_json, print_source};
use crate::app::App;

pub async fn list(app: &App) -> Result<()> {
    let session = app.require_session()?;
    let fetched = app.workouts.list(&session).await?;
    print_source(fetched.from_cache);
    print_json(&fetched.value)
}

pub async fn create(
    app: &App,
    student_id: String,
    name: String,
    description: Option<String>,
    exercises: &[String],
) -> Result<()> {
    let session = app.require_session()?;
    let exercises = exercises
        .iter()
        .enumerate()
        .map(|(position, spec)| parse_exercise(spec, position as u32))
        .collect::<Result<Vec<_>>>()?;
    let workout = NewWorkout {
        student_id,
        name,
        description,
        exercises,
    };
    let created = app.workouts.create_workout(&session, &workout).await?;
    print_json(&created)
}

/// Parses `EXERCISE_ID:SETSxREPS[:REST_SECONDS[:WEIGHT_KG]]`, e.g. `e-1:4x8:90:60`.
fn parse_exercise(spec: &str, position: u32) -> Result<WorkoutExercise> {
    let mut parts = spec.split(':');
    let exercise_id = parts.next().unwrap_or_default().trim();
    if exercise_id.is_empty() {
        bail!("exercise '{spec}' is missing its id");
    }
    let volume = parts
        .next()
        .with_context(|| format!("exercise '{spec}' is missing SETSxREPS"))?;
    let (sets, reps) = volume
        .split_once(['x', 'X'])
        .with_context(|| format!("'{volume}' is not SETSxREPS"))?;
    let rest_seconds = match parts.next() {
        Some(rest) => rest
            .parse::<u32>()
            .with_context(|| format!("'{rest}' is not a rest time in seconds"))?,
        None => 0,
    };
    let weight_kg = match parts.next() {
        Some(weight) => Some(
            weight
                .parse::<f32>()
                .with_context(|| format!("'{weight}' is not a weight in kg"))?,
        ),
        None => None,
    };
    if parts.next().is_some() {
        bail!("exercise '{spec}' has too many fields");
    }

    Ok(WorkoutExercise {
        exercise_id: exercise_id.to_string(),
        sets: sets
            .trim()
            .parse::<u32>()
            .with_context(|| format!("'{sets}' is not a set count"))?,
        reps: reps
            .trim()
            .parse::<u32>()
            .with_context(|| format!("'{reps}' is not a rep count"))?,
        rest_seconds,
        weight_kg,
        position,
    })
}
