use std::fmt;

use crate::auth::Role;

/// Cache key for a query result: entity collection + owner + consumer role.
///
/// Two screens issuing the same logical query build equal keys and therefore
/// share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(collection: &str, owner_id: &str, role: Role) -> Self {
        Self(format!("{collection}:{owner_id}:{role}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn collection(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
