use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

use crate::models::StoredRecord;

/// A cached record document with a SHA-256 checksum.
///
/// Entries whose checksum no longer matches are treated as misses, so a
/// corrupted cache entry falls back to the database.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidatedCacheEntry {
    /// Serialized record (JSON).
    pub data: String,
    /// Hex-encoded SHA-256 of `data`.
    pub checksum: String,
}

impl ValidatedCacheEntry {
    pub fn new(data: String) -> Self {
        let checksum = Self::compute_checksum(&data);
        Self { data, checksum }
    }

    fn compute_checksum(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_valid(&self) -> bool {
        Self::compute_checksum(&self.data) == self.checksum
    }

    /// The record held by this entry, if the checksum and JSON both check out.
    pub fn record(&self) -> Option<StoredRecord> {
        if !self.is_valid() {
            tracing::warn!(
                "Cache validation failed: checksum mismatch. Expected: {}, Data length: {}",
                self.checksum,
                self.data.len()
            );
            return None;
        }
        serde_json::from_str(&self.data).ok()
    }
}

/// Fetch-by-id cache for stored records.
///
/// Stored records are immutable, so entries only ever leave through TTL or
/// capacity eviction.
#[derive(Clone)]
pub struct RecordCache {
    inner: Cache<Uuid, ValidatedCacheEntry>,
}

impl RecordCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }

    pub async fn get(&self, id: &Uuid) -> Option<StoredRecord> {
        let entry = self.inner.get(id).await?;
        match entry.record() {
            Some(record) => {
                tracing::debug!("Record cache HIT (validated) for {}", id);
                Some(record)
            }
            None => {
                self.inner.invalidate(id).await;
                None
            }
        }
    }

    pub async fn insert(&self, record: &StoredRecord) {
        match serde_json::to_string(record) {
            Ok(json) => {
                self.inner
                    .insert(record.id, ValidatedCacheEntry::new(json))
                    .await
            }
            Err(e) => tracing::warn!("Skipping cache insert for {}: {}", record.id, e),
        }
    }

    #[cfg(test)]
    async fn put_raw(&self, id: Uuid, entry: ValidatedCacheEntry) {
        self.inner.insert(id, entry).await;
    }
}
