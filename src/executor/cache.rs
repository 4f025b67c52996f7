//! Prepared-statement cache.
//!
//! Statements are keyed by a 32-bit digest of their SQL text (the first four
//! bytes of its SHA-256). A lookup only hits when the stored text equals the
//! looked-up text, so digest collisions degrade to misses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use super::Statement;

/// Cache key for a SQL string.
pub fn statement_key(sql: &str) -> u32 {
    let digest = Sha256::digest(sql.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[derive(Debug)]
struct CacheEntry {
    sql: String,
    stmt: Arc<dyn Statement>,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Shared statement cache. Lookups take a read lock, inserts a write lock.
#[derive(Debug, Default)]
pub struct StatementCache {
    entries: RwLock<HashMap<u32, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StatementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, sql: &str) -> Option<Arc<dyn Statement>> {
        let key = statement_key(sql);
        let found = self
            .entries
            .read()
            .get(&key)
            .filter(|entry| entry.sql == sql)
            .map(|entry| Arc::clone(&entry.stmt));
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store `stmt` for `sql`, replacing whatever shared its key.
    pub fn insert(&self, sql: &str, stmt: Arc<dyn Statement>) {
        self.insert_with_key(statement_key(sql), sql, stmt);
    }

    pub(crate) fn insert_with_key(&self, key: u32, sql: &str, stmt: Arc<dyn Statement>) {
        self.entries.write().insert(
            key,
            CacheEntry {
                sql: sql.to_string(),
                stmt,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
