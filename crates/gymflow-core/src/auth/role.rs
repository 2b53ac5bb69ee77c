//! User roles.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Role attached to an authenticated user.
///
/// The identity provider stores the role as a free-form string in user
/// metadata. Anything that is not one of the three recognized values maps to
/// `Unknown`, which the navigation gate routes to a dedicated error view.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Student,
    Instructor,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Parses a raw metadata value. Missing or unrecognized values are `Unknown`.
    pub fn from_metadata(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or(Role::Unknown)
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, Role::Unknown)
    }

    /// The fixed landing route for this role, if it has one.
    pub fn home_route(self) -> Option<&'static str> {
        match self {
            Role::Student => Some("/student"),
            Role::Instructor => Some("/instructor"),
            Role::Admin => Some("/admin"),
            Role::Unknown => None,
        }
    }

    /// Whether this role may manage students and build workouts.
    pub fn can_manage_students(self) -> bool {
        match self {
            Role::Instructor | Role::Admin => true,
            Role::Student | Role::Unknown => false,
        }
    }

    pub fn can_invite_students(self) -> bool {
        match self {
            Role::Instructor => true,
            Role::Admin | Role::Student | Role::Unknown => false,
        }
    }
}
