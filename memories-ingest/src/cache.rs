//! Content-hash cache of parsed memories files
//!
//! Parsing is recomputed from the backing file on every fetch; this cache
//! lets a caller skip the work when the bytes have not changed. It is an
//! explicit collaborator owned by whoever constructs it (the server keeps one
//! in its application state), never process-global.
//!
//! Entries are keyed by the SHA-256 of the source bytes plus the decoding
//! format, so a new upload can never be served stale data even without
//! [`IngestCache::invalidate`]. Capacity is bounded; the oldest entry is
//! evicted first.

use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::decoder::SourceFormat;
use crate::error::Result;
use crate::pipeline::{ingest_decoded, IngestReport};

/// Cache key: content digest + decoding path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    format: SourceFormat,
}

impl CacheKey {
    pub fn new(bytes: &[u8], format: SourceFormat) -> Self {
        Self {
            digest: format!("{:x}", Sha256::digest(bytes)),
            format,
        }
    }

    /// Hex-encoded SHA-256 of the source bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    report: Arc<IngestReport>,
}

/// Bounded cache of ingest results
#[derive(Debug)]
pub struct IngestCache {
    capacity: usize,
    /// Oldest first
    entries: RwLock<VecDeque<CacheEntry>>,
}

impl Default for IngestCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl IngestCache {
    pub const DEFAULT_CAPACITY: usize = 4;

    /// Create a cache holding at most `capacity` results (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Return the cached report for these bytes, parsing them on a miss
    ///
    /// Unsupported or malformed files are never cached; the error is returned
    /// on every call.
    pub fn get_or_ingest(&self, bytes: &[u8], filename: &str) -> Result<Arc<IngestReport>> {
        let format = SourceFormat::from_filename(filename)?;
        let key = CacheKey::new(bytes, format);

        if let Some(report) = self.lookup(&key) {
            tracing::debug!(digest = %key.digest(), "Ingest cache hit");
            return Ok(report);
        }

        tracing::debug!(digest = %key.digest(), filename, "Ingest cache miss");

        // Parse without holding the lock; concurrent misses for the same
        // bytes both parse and the second store is dropped.
        let report = Arc::new(ingest_decoded(bytes, format)?);
        self.store(key, Arc::clone(&report));

        Ok(report)
    }

    /// Drop every cached result
    pub fn invalidate(&self) {
        let mut entries = self.write();
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "Ingest cache invalidated");
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<IngestReport>> {
        self.read()
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| Arc::clone(&entry.report))
    }

    fn store(&self, key: CacheKey, report: Arc<IngestReport>) {
        let mut entries = self.write();
        if entries.iter().any(|entry| entry.key == key) {
            return;
        }
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(CacheEntry { key, report });
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
