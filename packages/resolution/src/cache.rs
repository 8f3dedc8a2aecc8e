//! Disk-backed cache for per-entity search results.
//!
//! One JSON file per (entity, query kind) slot. Caching is best-effort
//! throughout: a missing, unreadable, malformed, or expired slot reads as a
//! miss, and a failed write never fails the enclosing search - both are
//! logged at `warn` and swallowed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeDelta};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::types::{EntitySearchResult, QueryKind};

/// Seconds a slot stays fresh. At exactly this age a slot is expired.
pub const CACHE_TTL_SECS: i64 = 86_400;

/// Flat-file store mapping (entity, kind) to a previously fetched result.
///
/// Slots expire logically, not physically: an expired file stays on disk
/// until the next successful fetch for the same pair overwrites it. The
/// orchestrator is the sole reader and writer of a slot during a run;
/// concurrent external processes racing on the same file are not guarded
/// against (last writer wins).
pub struct SearchCache {
    dir: PathBuf,
    max_age: TimeDelta,
}

impl SearchCache {
    /// Open a cache rooted at `dir`, creating the directory best-effort.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("failed to create cache directory {}: {}", dir.display(), e);
        }
        Self {
            dir,
            max_age: TimeDelta::seconds(CACHE_TTL_SECS),
        }
    }

    /// Override the freshness window (tests).
    pub fn with_max_age(mut self, max_age: TimeDelta) -> Self {
        self.max_age = max_age;
        self
    }

    /// Slot file for the (entity, kind) pair.
    ///
    /// The identifier is the SHA-256 of the pair, so distinct entities never
    /// share a slot no matter what characters their names contain.
    fn slot_path(&self, entity: &str, kind: QueryKind) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(entity.as_bytes());
        hasher.update([0u8]);
        hasher.update(kind.as_str().as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }

    /// Read the slot for (entity, kind).
    ///
    /// Returns `None` for a missing slot, a slot that fails to read or
    /// parse, or a slot whose age has reached the freshness window. Read
    /// failures are never surfaced to the caller.
    pub fn lookup(&self, entity: &str, kind: QueryKind) -> Option<EntitySearchResult> {
        let path = self.slot_path(entity, kind);
        if !path.exists() {
            return None;
        }
        let result = match read_slot(&path) {
            Ok(result) => result,
            Err(e) => {
                warn!("cache read error for {entity}: {e}");
                return None;
            }
        };
        if result.is_stale(Local::now().naive_local(), self.max_age) {
            debug!("cache expired for {entity} - {kind}");
            return None;
        }
        Some(result)
    }

    /// Write the slot, fully overwriting any prior content.
    ///
    /// Write failures are logged and swallowed so caching never fails the
    /// enclosing search.
    pub fn store(&self, result: &EntitySearchResult) {
        let path = self.slot_path(&result.entity, result.query_kind);
        if let Err(e) = write_slot(&path, result) {
            warn!("cache write error for {}: {}", result.entity, e);
        }
    }
}

fn read_slot(path: &Path) -> Result<EntitySearchResult, CacheError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_slot(path: &Path, result: &EntitySearchResult) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(result)?)?;
    Ok(())
}
