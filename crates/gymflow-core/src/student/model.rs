//! Student domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_non_empty};

/// A student managed by an instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub instructor_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update. Unset fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.goals.is_none() && self.notes.is_none()
    }

    /// Checks the update and returns a trimmed copy.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::Invalid(
                "at least one profile field must change".to_string(),
            ));
        }
        let full_name = match &self.full_name {
            Some(name) => Some(require_non_empty("full name", name)?.to_string()),
            None => None,
        };
        let trim = |value: &Option<String>| value.as_ref().map(|v| v.trim().to_string());
        Ok(Self {
            full_name,
            phone: trim(&self.phone),
            goals: trim(&self.goals),
            notes: trim(&self.notes),
        })
    }
}
