//! Schedule loading service
//!
//! Serves a merged, freshness-bounded view of two independently-fetched
//! appointment sources (directly-created appointments and protocol-derived
//! ones) for a given date range, while preventing redundant concurrent
//! network calls:
//!
//! - Payloads are cached per canonical range key with a 30 second TTL
//!   (60 seconds for aggregate stats).
//! - At most one fetch is in flight per key; later callers inside the dedup
//!   window get a no-op answer from whatever the cache holds, later callers
//!   outside it join the in-flight result.
//! - A `force` load runs regardless of an in-flight fetch for the same key;
//!   the two race and whichever settles last wins the cache entry. Known
//!   simplification, kept deliberately.
//!
//! Loads never fail: a source that errors degrades to an empty payload,
//! recorded on the returned snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::sync::Mutex;

use detaildesk_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, DateRange, NewAppointment,
    RangeKey,
};

use crate::application::error::ServiceError;
use crate::infrastructure::cache::BoundedTtlCache;
use crate::ports::outbound::{ApiError, ScheduleApiPort};

/// Freshness window for range payloads.
pub const RANGE_TTL: Duration = Duration::from_secs(30);

/// Freshness window for aggregate stats.
pub const STATS_TTL: Duration = Duration::from_secs(60);

/// Upper bound on retained entries per sub-cache.
pub const MAX_CACHE_SIZE: usize = 20;

/// Window in which a repeated request for a key with a fetch already in
/// flight is answered without touching the network or awaiting.
pub const REQUEST_DEDUP_WINDOW: Duration = Duration::from_secs(1);

/// Tuning knobs for the schedule cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub range_ttl: Duration,
    pub stats_ttl: Duration,
    pub dedup_window: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            range_ttl: RANGE_TTL,
            stats_ttl: STATS_TTL,
            dedup_window: REQUEST_DEDUP_WINDOW,
            max_entries: MAX_CACHE_SIZE,
        }
    }
}

/// The upstream source a payload (or failure) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Appointments,
    Protocols,
}

impl std::fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Appointments => write!(f, "appointments"),
            Self::Protocols => write!(f, "protocols"),
        }
    }
}

/// A source failure that was degraded to an empty payload.
#[derive(Debug, Clone)]
pub struct SourceError {
    pub source: ScheduleSource,
    pub error: ApiError,
}

/// The merged result of one schedule load.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    /// All appointments in the range, sorted ascending by start.
    pub appointments: Vec<Appointment>,
    /// Sources that failed and were served as empty payloads.
    pub source_errors: Vec<SourceError>,
}

impl ScheduleSnapshot {
    pub fn is_degraded(&self) -> bool {
        !self.source_errors.is_empty()
    }
}

/// Aggregate counts over a range's merged payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub total: usize,
    pub by_status: HashMap<AppointmentStatus, usize>,
    pub protocol_count: usize,
}

impl ScheduleStats {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        let mut by_status: HashMap<AppointmentStatus, usize> = HashMap::new();
        let mut protocol_count = 0;
        for appointment in appointments {
            *by_status.entry(appointment.status).or_insert(0) += 1;
            if appointment.is_protocol {
                protocol_count += 1;
            }
        }
        Self {
            total: appointments.len(),
            by_status,
            protocol_count,
        }
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

type InFlightLoad = Shared<BoxFuture<'static, ScheduleSnapshot>>;

/// Shared cache state for schedule range data.
///
/// One instance is owned per service and can be shared across consumers via
/// `Arc`; tests substitute their own instance through
/// `ScheduleService::with_cache`.
pub struct ScheduleCache {
    config: CacheConfig,
    pub(crate) appointments: BoundedTtlCache<RangeKey, Vec<Appointment>>,
    pub(crate) protocols: BoundedTtlCache<RangeKey, Vec<Appointment>>,
    pub(crate) stats: BoundedTtlCache<RangeKey, ScheduleStats>,
    in_flight: Mutex<HashMap<RangeKey, InFlightLoad>>,
    last_issued: Mutex<HashMap<RangeKey, Instant>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            appointments: BoundedTtlCache::new(config.range_ttl, config.max_entries),
            protocols: BoundedTtlCache::new(config.range_ttl, config.max_entries),
            stats: BoundedTtlCache::new(config.stats_ttl, config.max_entries),
            in_flight: Mutex::new(HashMap::new()),
            last_issued: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Clear all payloads and in-flight bookkeeping.
    pub async fn clear(&self) {
        self.appointments.clear().await;
        self.protocols.clear().await;
        self.stats.clear().await;
        self.in_flight.lock().await.clear();
        self.last_issued.lock().await.clear();
    }

    /// Both sub-caches hold a fresh entry for the key.
    async fn merged_fresh(&self, key: &RangeKey) -> Option<ScheduleSnapshot> {
        let appointments = self.appointments.get(key).await?;
        let protocols = self.protocols.get(key).await?;
        Some(ScheduleSnapshot {
            appointments: merge_sorted(appointments, protocols),
            source_errors: Vec::new(),
        })
    }

    /// Whatever both sub-caches hold for the key, fresh or not.
    async fn merged_any(&self, key: &RangeKey) -> Option<ScheduleSnapshot> {
        let appointments = self.appointments.peek(key).await?;
        let protocols = self.protocols.peek(key).await?;
        Some(ScheduleSnapshot {
            appointments: merge_sorted(appointments, protocols),
            source_errors: Vec::new(),
        })
    }

    /// A fetch for the key is in flight and was issued inside the dedup
    /// window.
    async fn absorbs_repeat(&self, key: &RangeKey) -> bool {
        if !self.in_flight.lock().await.contains_key(key) {
            return false;
        }
        self.last_issued
            .lock()
            .await
            .get(key)
            .is_some_and(|at| at.elapsed() < self.config.dedup_window)
    }

    async fn note_issued(&self, key: &RangeKey) {
        self.last_issued
            .lock()
            .await
            .insert(key.clone(), Instant::now());
    }

    async fn remove_in_flight(&self, key: &RangeKey) {
        self.in_flight.lock().await.remove(key);
    }

    /// Best-effort eviction pass: drop expired entries, then evict the
    /// single oldest-inserted entry of any sub-cache over capacity.
    pub(crate) async fn run_eviction(&self) {
        let expired = self.appointments.cleanup_expired().await
            + self.protocols.cleanup_expired().await
            + self.stats.cleanup_expired().await;
        let overflowed = [
            self.appointments.evict_overflow().await,
            self.protocols.evict_overflow().await,
            self.stats.evict_overflow().await,
        ]
        .into_iter()
        .flatten()
        .count();
        if expired > 0 || overflowed > 0 {
            tracing::debug!(expired, overflowed, "schedule cache eviction pass");
        }

        let window = self.config.dedup_window;
        self.last_issued
            .lock()
            .await
            .retain(|_, at| at.elapsed() < window);
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_sorted(appointments: Vec<Appointment>, protocols: Vec<Appointment>) -> Vec<Appointment> {
    let mut merged = appointments;
    merged.extend(protocols);
    merged.sort_by_key(|appointment| appointment.start);
    merged
}

/// Application service for loading and mutating the shop schedule.
pub struct ScheduleService {
    api: Arc<dyn ScheduleApiPort>,
    cache: Arc<ScheduleCache>,
}

impl ScheduleService {
    pub fn new(api: Arc<dyn ScheduleApiPort>) -> Self {
        Self::with_cache(api, Arc::new(ScheduleCache::new()))
    }

    /// Create a service over an existing cache, so several consumers can
    /// share one.
    pub fn with_cache(api: Arc<dyn ScheduleApiPort>, cache: Arc<ScheduleCache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &Arc<ScheduleCache> {
        &self.cache
    }

    /// Load the merged schedule for `range`.
    ///
    /// Never fails: source errors degrade to empty payloads recorded on the
    /// snapshot. `force` bypasses the cache and any in-flight
    /// deduplication.
    pub async fn load(&self, range: DateRange, force: bool) -> ScheduleSnapshot {
        let snapshot = self.load_inner(range, force).await;
        self.cache.run_eviction().await;
        snapshot
    }

    async fn load_inner(&self, range: DateRange, force: bool) -> ScheduleSnapshot {
        let key = range.range_key();

        if !force {
            if self.cache.absorbs_repeat(&key).await {
                tracing::debug!(range = %key, "schedule load absorbed by dedup window");
                return self.cache.merged_any(&key).await.unwrap_or_default();
            }

            if let Some(snapshot) = self.cache.merged_fresh(&key).await {
                tracing::debug!(range = %key, "schedule cache hit");
                return snapshot;
            }
        }

        let (load, spawned) = {
            let mut in_flight = self.cache.in_flight.lock().await;
            let existing = if force { None } else { in_flight.get(&key).cloned() };
            match existing {
                Some(load) => {
                    tracing::debug!(range = %key, "joining in-flight schedule load");
                    (load, false)
                }
                // A forced load replaces any registered fetch for the key;
                // settle-time removal is unconditional either way.
                None => {
                    let load = self.spawn_load(key.clone(), range);
                    in_flight.insert(key.clone(), load.clone());
                    (load, true)
                }
            }
        };
        if spawned {
            self.cache.note_issued(&key).await;
        }
        load.await
    }

    fn spawn_load(&self, key: RangeKey, range: DateRange) -> InFlightLoad {
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let handle = tokio::spawn(async move {
            let snapshot = fetch_and_store(api, &cache, &key, range).await;
            // Removed on settle even when no consumer awaits the handle.
            cache.remove_in_flight(&key).await;
            snapshot
        });
        async move {
            match handle.await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::error!(error = %err, "schedule load task failed");
                    ScheduleSnapshot::default()
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Load aggregate stats for `range`, cached under the stats TTL.
    pub async fn load_stats(&self, range: DateRange, force: bool) -> ScheduleStats {
        let key = range.range_key();
        if !force {
            if let Some(stats) = self.cache.stats.get(&key).await {
                return stats;
            }
        }
        let snapshot = self.load(range, force).await;
        let stats = ScheduleStats::from_appointments(&snapshot.appointments);
        self.cache.stats.insert(key, stats.clone()).await;
        stats
    }

    /// Drop all cached payloads so the next load refetches.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
        tracing::debug!("schedule cache invalidated");
    }

    pub async fn create_appointment(
        &self,
        data: NewAppointment,
    ) -> Result<Appointment, ServiceError> {
        let created = self.api.create_appointment(data).await?;
        self.invalidate().await;
        Ok(created)
    }

    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ServiceError> {
        let updated = self.api.update_appointment(id, patch).await?;
        self.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_appointment(&self, id: AppointmentId) -> Result<(), ServiceError> {
        self.api.delete_appointment(id).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Status flips skip invalidation; the next natural reload picks them
    /// up.
    pub async fn change_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), ServiceError> {
        self.api.change_status(id, status).await?;
        Ok(())
    }
}

async fn fetch_and_store(
    api: Arc<dyn ScheduleApiPort>,
    cache: &ScheduleCache,
    key: &RangeKey,
    range: DateRange,
) -> ScheduleSnapshot {
    let (appointments, protocols) = tokio::join!(
        api.fetch_appointments(),
        api.fetch_protocols_as_appointments(range),
    );

    let mut source_errors = Vec::new();
    let appointments = appointments.unwrap_or_else(|error| {
        tracing::warn!(range = %key, source = %ScheduleSource::Appointments, error = %error,
            "source fetch failed, serving empty payload");
        source_errors.push(SourceError {
            source: ScheduleSource::Appointments,
            error,
        });
        Vec::new()
    });
    let protocols = protocols.unwrap_or_else(|error| {
        tracing::warn!(range = %key, source = %ScheduleSource::Protocols, error = %error,
            "source fetch failed, serving empty payload");
        source_errors.push(SourceError {
            source: ScheduleSource::Protocols,
            error,
        });
        Vec::new()
    });

    cache
        .appointments
        .insert(key.clone(), appointments.clone())
        .await;
    cache.protocols.insert(key.clone(), protocols.clone()).await;

    ScheduleSnapshot {
        appointments: merge_sorted(appointments, protocols),
        source_errors,
    }
}
