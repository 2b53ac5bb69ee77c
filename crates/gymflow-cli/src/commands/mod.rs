pub mod auth;
pub mod exercises;
pub mod invite;
pub mod students;
pub mod window;
pub mod workouts;

use anyhow::Result;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_source(from_cache: bool) {
    if from_cache {
        eprintln!("(served from cache)");
    }
}
