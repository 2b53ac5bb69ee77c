use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;

struct CacheEntry<V> {
    value: V,
    /// `None` when the ttl reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
    last_access: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

struct CacheInner<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Generation of the newest fetch issued per key and not yet settled.
    in_flight: HashMap<CacheKey, u64>,
    next_generation: u64,
    access_tick: u64,
}

impl<V> CacheInner<V> {
    fn touch(&mut self) -> u64 {
        self.access_tick += 1;
        self.access_tick
    }
}

/// Proof that a fetch for `key` was started; pass it back to
/// [`TtlCache::complete_fetch`] when the fetch resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// In-memory query-result cache with per-entry time-to-live.
///
/// Expired entries are evicted lazily: a read that finds an expired entry
/// removes it and reports a miss. There is no background sweep.
///
/// Fetches started through [`begin_fetch`](Self::begin_fetch) are ordered by
/// generation. When two fetches for one key overlap, only the most recently
/// started one may write its result; an invalidation or [`clear`](Self::clear)
/// also voids every fetch started before it.
///
/// The cache is an explicit object owned by the application context; `clear`
/// is its teardown.
pub struct TtlCache<V> {
    inner: Mutex<CacheInner<V>>,
    clock: Arc<dyn Clock>,
    max_entries: Option<usize>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an unbounded cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                next_generation: 0,
                access_tick: 0,
            }),
            clock,
            max_entries: None,
        }
    }

    /// Bounds the number of live entries; inserting a new key at capacity
    /// evicts the least recently used entry.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<V>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the cached value if present and not expired.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let expired = match inner.entries.get(key) {
            None => {
                tracing::debug!(%key, "cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            inner.entries.remove(key);
            tracing::debug!(%key, "cache entry expired");
            return None;
        }

        let tick = inner.touch();
        let entry = inner.entries.get_mut(key)?;
        entry.last_access = tick;
        tracing::debug!(%key, "cache hit");
        Some(entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Fetches for `key` still in flight are voided so they cannot overwrite
    /// this value when they complete.
    pub fn set(&self, key: CacheKey, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.in_flight.remove(&key);
        self.insert_locked(&mut inner, key, value, now.checked_add(ttl));
    }

    fn insert_locked(
        &self,
        inner: &mut CacheInner<V>,
        key: CacheKey,
        value: V,
        expires_at: Option<Instant>,
    ) {
        if let Some(max_entries) = self.max_entries
            && !inner.entries.contains_key(&key)
            && inner.entries.len() >= max_entries
        {
            let now = self.clock.now();
            inner.entries.retain(|_, entry| !entry.is_expired(now));
            if inner.entries.len() >= max_entries {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_access)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!(key = %oldest, "evicting least recently used entry");
                    inner.entries.remove(&oldest);
                }
            }
        }

        let last_access = inner.touch();
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at,
                last_access,
            },
        );
    }

    /// Registers a new fetch for `key`, superseding any fetch already in flight.
    pub fn begin_fetch(&self, key: CacheKey) -> FetchTicket {
        let mut inner = self.lock();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner.in_flight.insert(key.clone(), generation);
        FetchTicket { key, generation }
    }

    /// Writes the result of a fetch if its ticket is still current.
    ///
    /// Returns `false` (and writes nothing) when a newer fetch was started or
    /// the key was invalidated after the ticket was issued.
    pub fn complete_fetch(&self, ticket: FetchTicket, value: V, ttl: Duration) -> bool {
        let now = self.clock.now();
        let mut inner = self.lock();
        if inner.in_flight.get(&ticket.key) != Some(&ticket.generation) {
            tracing::warn!(
                key = %ticket.key,
                generation = ticket.generation,
                "discarding stale fetch result"
            );
            return false;
        }
        inner.in_flight.remove(&ticket.key);
        self.insert_locked(&mut inner, ticket.key, value, now.checked_add(ttl));
        true
    }

    /// Settles a failed fetch. Nothing is written; a later `get` still misses.
    pub fn abandon_fetch(&self, ticket: FetchTicket) {
        let mut inner = self.lock();
        if inner.in_flight.get(&ticket.key) == Some(&ticket.generation) {
            inner.in_flight.remove(&ticket.key);
        }
    }

    /// Removes one entry and voids fetches for it that are still in flight.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut inner = self.lock();
        inner.in_flight.remove(key);
        let removed = inner.entries.remove(key).is_some();
        tracing::debug!(%key, removed, "cache invalidate");
        removed
    }

    /// Removes every entry belonging to `collection`. Returns how many went.
    pub fn invalidate_collection(&self, collection: &str) -> usize {
        let mut inner = self.lock();
        inner.in_flight.retain(|key, _| key.collection() != collection);
        let before = inner.entries.len();
        inner.entries.retain(|key, _| key.collection() != collection);
        before - inner.entries.len()
    }

    /// Drops all entries and voids all in-flight fetches.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.in_flight.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry is physically stored, without checking expiry.
    pub fn contains_entry(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains_key(key)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
