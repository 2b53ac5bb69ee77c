//! Client-side query cache.
//!
//! Memoizes the latest successful result per (collection, owner, role) key for
//! a bounded time window so read-heavy list screens avoid redundant remote
//! queries.

mod clock;
mod key;
mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;
pub use ttl_cache::{FetchTicket, TtlCache};

/// Well-known collection names used in cache keys.
pub mod collections {
    pub const STUDENTS: &str = "students";
    pub const STUDENT: &str = "student";
    pub const WORKOUTS: &str = "workouts";
    pub const EXERCISES: &str = "exercises";
}
