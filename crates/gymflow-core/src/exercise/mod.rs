//! Exercise catalogue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{ValidationError, require_non_empty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl NewExercise {
    pub fn validated(&self) -> std::result::Result<Self, ValidationError> {
        let video_url = match self.video_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ValidationError::Invalid(format!(
                        "'{url}' is not a valid video link"
                    )));
                }
                Some(url.to_string())
            }
            _ => None,
        };
        Ok(Self {
            name: require_non_empty("exercise name", &self.name)?.to_string(),
            muscle_group: require_non_empty("muscle group", &self.muscle_group)?.to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            video_url,
        })
    }
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// The full catalogue, ordered by name.
    async fn list_all(&self) -> Result<Vec<Exercise>>;

    async fn find_by_id(&self, exercise_id: &str) -> Result<Option<Exercise>>;

    async fn create(&self, created_by: &str, exercise: &NewExercise) -> Result<Exercise>;
}
