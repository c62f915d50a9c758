#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Namespaced, TTL-based key/value cache backed by one JSON file per
//! entry.
//!
//! Losing a cache entry must never break correctness, only performance,
//! so the whole API fails soft: malformed stored entries read as misses
//! and are deleted, and writes that cannot be completed (quota, I/O)
//! are logged and swallowed. Entries are evicted lazily on read and
//! proactively when a write runs into the size quota.

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Prefix for every persisted cache key: `parkside:<NAMESPACE>:<id>`.
const APP_PREFIX: &str = "parkside";

/// Default size quota for the whole cache directory (5 MB).
const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache namespaces, one per dataset or derived-result family.
///
/// Each namespace carries its own default TTL: fetched datasets are
/// stable for days, derived geometry results only for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Community area polygons fetched from the open data portal.
    CommunityAreas,
    /// Park feature polygons fetched from the open data portal.
    Parks,
    /// Waterway polygons fetched from the open data portal.
    Waterways,
    /// Derived geometry computations (coverage estimates).
    GeometricCalc,
    /// Per-point property record lookups.
    PropertyData,
}

impl Namespace {
    /// The namespace component of the persisted cache key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommunityAreas => "COMMUNITY_AREAS",
            Self::Parks => "PARKS",
            Self::Waterways => "WATERWAYS",
            Self::GeometricCalc => "GEOMETRIC_CALC",
            Self::PropertyData => "PROPERTY_DATA",
        }
    }

    /// Default time-to-live for entries in this namespace.
    #[must_use]
    pub const fn default_ttl(self) -> Duration {
        match self {
            Self::CommunityAreas | Self::Parks | Self::Waterways => Duration::from_secs(7 * 24 * 60 * 60),
            Self::GeometricCalc | Self::PropertyData => DAY,
        }
    }
}

/// Time source for entry expiry, injectable so tests can simulate the
/// passage of time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock [`Clock`] used outside of tests.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Counters and size figures reported by [`CacheStore::stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Number of entries currently on disk (expired or not).
    pub entry_count: usize,
    /// Approximate total size of all entries in kilobytes.
    pub approx_size_kb: u64,
    /// Reads that found a live entry.
    pub hits: u64,
    /// Reads that found nothing usable.
    pub misses: u64,
    /// `hits / (hits + misses)` as a percentage, 0 when no reads yet.
    pub hit_rate: f64,
}

/// On-disk envelope: `{data, timestamp, ttl}` with millisecond fields.
#[derive(serde::Deserialize)]
struct Stored<T> {
    data: T,
    timestamp: i64,
    ttl: i64,
}

/// Expiry-only view of an entry, used by the sweep.
#[derive(serde::Deserialize)]
struct StoredMeta {
    timestamp: i64,
    ttl: i64,
}

/// File-backed TTL cache.
///
/// Hit/miss counters are owned by the store instance and reset only
/// when it is dropped; there is no global cache state.
pub struct CacheStore {
    root: PathBuf,
    quota_bytes: u64,
    clock: Box<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    /// Opens (or creates) a cache rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        Self::with_clock(root, Box::new(SystemClock))
    }

    /// Opens a cache with an injected [`Clock`].
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn with_clock(root: impl Into<PathBuf>, clock: Box<dyn Clock>) -> std::io::Result<Self> {
        let root = root.into();
        paths::ensure_dir(&root)?;
        Ok(Self {
            root,
            quota_bytes: DEFAULT_QUOTA_BYTES,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Overrides the size quota (bytes).
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Reads an entry, counting a hit or a miss.
    ///
    /// A missing, malformed, or expired entry is a miss; malformed and
    /// expired files are deleted on the way out. Never fails: cache
    /// corruption must not reach the caller.
    pub fn get<T: DeserializeOwned>(&self, namespace: Namespace, id: &str) -> Option<T> {
        let path = self.entry_path(namespace, id);

        let Ok(raw) = std::fs::read_to_string(&path) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        let entry: Stored<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(
                    "Discarding malformed cache entry {}: {e}",
                    key(namespace, id)
                );
                let _ = std::fs::remove_file(&path);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if self.is_expired(entry.timestamp, entry.ttl) {
            let _ = std::fs::remove_file(&path);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.data)
    }

    /// Writes an entry with the namespace's default TTL.
    pub fn set<T: Serialize>(&self, namespace: Namespace, id: &str, data: &T) {
        self.set_with_ttl(namespace, id, data, namespace.default_ttl());
    }

    /// Writes an entry with an explicit TTL.
    ///
    /// If the write would exceed the size quota, expired entries across
    /// all namespaces are swept once and the write retried; a residual
    /// overflow (or any I/O failure) is logged and swallowed.
    pub fn set_with_ttl<T: Serialize>(
        &self,
        namespace: Namespace,
        id: &str,
        data: &T,
        ttl: Duration,
    ) {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            data: &'a T,
            timestamp: i64,
            ttl: i64,
        }

        let envelope = Envelope {
            data,
            timestamp: self.clock.now_millis(),
            ttl: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        };

        let encoded = match serde_json::to_string(&envelope) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Failed to encode cache entry {}: {e}", key(namespace, id));
                return;
            }
        };

        #[allow(clippy::cast_possible_truncation)]
        let bytes = encoded.len() as u64;
        if self.total_size_bytes() + bytes > self.quota_bytes {
            let removed = self.clear_expired();
            log::debug!("Cache quota sweep removed {removed} expired entries");
            if self.total_size_bytes() + bytes > self.quota_bytes {
                log::warn!(
                    "Cache quota still exceeded after sweep; dropping entry {}",
                    key(namespace, id)
                );
                return;
            }
        }

        if let Err(e) = std::fs::write(self.entry_path(namespace, id), encoded) {
            log::warn!("Failed to write cache entry {}: {e}", key(namespace, id));
        }
    }

    /// Removes a single entry if present.
    pub fn remove(&self, namespace: Namespace, id: &str) {
        let _ = std::fs::remove_file(self.entry_path(namespace, id));
    }

    /// Removes every entry in every namespace.
    pub fn clear(&self) {
        for path in self.entry_files() {
            let _ = std::fs::remove_file(path);
        }
    }

    /// Removes expired (and unreadable) entries across all namespaces.
    ///
    /// Returns the number of files removed.
    pub fn clear_expired(&self) -> usize {
        let mut removed = 0;
        for path in self.entry_files() {
            let expired = std::fs::read_to_string(&path).map_or(true, |raw| {
                serde_json::from_str::<StoredMeta>(&raw)
                    .map_or(true, |meta| self.is_expired(meta.timestamp, meta.ttl))
            });
            if expired && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Current entry count, approximate size, and hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entry_count = self.entry_files().count();
        let approx_size_kb = self.total_size_bytes() / 1024;
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let reads = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if reads == 0 {
            0.0
        } else {
            hits as f64 / reads as f64 * 100.0
        };
        CacheStats {
            entry_count,
            approx_size_kb,
            hits,
            misses,
            hit_rate,
        }
    }

    fn is_expired(&self, timestamp: i64, ttl: i64) -> bool {
        self.clock.now_millis().saturating_sub(timestamp) >= ttl
    }

    fn entry_path(&self, namespace: Namespace, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", key(namespace, id)))
    }

    fn entry_files(&self) -> impl Iterator<Item = PathBuf> {
        std::fs::read_dir(&self.root)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
    }

    fn total_size_bytes(&self) -> u64 {
        self.entry_files()
            .filter_map(|path| std::fs::metadata(path).ok())
            .map(|meta| meta.len())
            .sum()
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("root", &self.root)
            .field("quota_bytes", &self.quota_bytes)
            .finish_non_exhaustive()
    }
}

/// Builds the persisted key `parkside:<NAMESPACE>:<id>`, sanitizing the
/// identifier so it is safe as a file stem.
fn key(namespace: Namespace, id: &str) -> String {
    let id: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ',') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{APP_PREFIX}:{}:{id}", namespace.as_str())
}
