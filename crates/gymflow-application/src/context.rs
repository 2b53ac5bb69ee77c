//! Shared per-user state: query caches and the timeout manager.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use gymflow_core::cache::{CacheKey, Clock, SystemClock, TtlCache};
use gymflow_core::error::Result;
use gymflow_core::exercise::Exercise;
use gymflow_core::student::Student;
use gymflow_core::timeout::{DEFAULT_REQUEST_TIMEOUT, TimeoutManager};
use gymflow_core::workout::Workout;

use crate::load_state::Fetched;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    pub cache_ttl: Duration,
    pub max_cache_entries: Option<usize>,
    pub request_timeout: Duration,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            max_cache_entries: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Owns the caches and the timeout manager for one signed-in user.
///
/// Services share one context through an `Arc`; [`teardown`](Self::teardown)
/// runs on sign-out and shutdown.
pub struct AppContext {
    students: TtlCache<Vec<Student>>,
    student: TtlCache<Student>,
    workouts: TtlCache<Vec<Workout>>,
    exercises: TtlCache<Vec<Exercise>>,
    timeouts: TimeoutManager,
    cache_ttl: Duration,
}

impl AppContext {
    pub fn new(settings: ContextSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: ContextSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            students: cache(&settings, clock.clone()),
            student: cache(&settings, clock.clone()),
            workouts: cache(&settings, clock.clone()),
            exercises: cache(&settings, clock),
            timeouts: TimeoutManager::new(settings.request_timeout),
            cache_ttl: settings.cache_ttl,
        }
    }

    pub fn students(&self) -> &TtlCache<Vec<Student>> {
        &self.students
    }

    pub fn student(&self) -> &TtlCache<Student> {
        &self.student
    }

    pub fn workouts(&self) -> &TtlCache<Vec<Workout>> {
        &self.workouts
    }

    pub fn exercises(&self) -> &TtlCache<Vec<Exercise>> {
        &self.exercises
    }

    pub fn timeouts(&self) -> &TimeoutManager {
        &self.timeouts
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Serves `key` from `cache`, fetching it on a miss.
    pub(crate) async fn cached<V, F>(
        &self,
        cache: &TtlCache<V>,
        key: CacheKey,
        label: &str,
        fetch: F,
    ) -> Result<Fetched<V>>
    where
        V: Clone,
        F: Future<Output = Result<V>>,
    {
        if let Some(hit) = cache.get(&key) {
            return Ok(Fetched::cached(hit));
        }
        self.refresh(cache, key, label, fetch).await
    }

    /// Fetches `key` bypassing the cache and stores the result.
    ///
    /// A failed fetch writes nothing. If a newer fetch for the same key was
    /// started meanwhile, this result is returned but not cached.
    pub(crate) async fn refresh<V, F>(
        &self,
        cache: &TtlCache<V>,
        key: CacheKey,
        label: &str,
        fetch: F,
    ) -> Result<Fetched<V>>
    where
        V: Clone,
        F: Future<Output = Result<V>>,
    {
        let ticket = cache.begin_fetch(key);
        match self.timeouts.run(label, fetch).await {
            Ok(value) => {
                cache.complete_fetch(ticket, value.clone(), self.cache_ttl);
                Ok(Fetched::fresh(value))
            }
            Err(err) => {
                cache.abandon_fetch(ticket);
                Err(err)
            }
        }
    }

    /// Drops every cached result and aborts in-flight calls.
    pub fn teardown(&self) {
        self.students.clear();
        self.student.clear();
        self.workouts.clear();
        self.exercises.clear();
        self.timeouts.teardown();
        tracing::debug!("application context torn down");
    }
}

fn cache<V: Clone>(settings: &ContextSettings, clock: Arc<dyn Clock>) -> TtlCache<V> {
    let cache = TtlCache::with_clock(clock);
    match settings.max_cache_entries {
        Some(max_entries) => cache.with_max_entries(max_entries),
        None => cache,
    }
}
