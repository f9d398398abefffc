//! In-process response cache for structured model calls.
//!
//! Keys are content addresses: `sha256(template_id, system, rendered user text, schema name)`.
//! Two requests share an entry only if they would send byte-identical prompts.
//!
//! Invalidation:
//! - every entry expires `ttl` after insertion;
//! - at `capacity` the oldest entry is evicted;
//! - `invalidate_all()` drops everything.
//! Errors are never cached. A zero `ttl` disables caching entirely.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{LlmError, ModelRequest, StructuredModel};

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest first. May hold keys of expired entries already removed.
    order: VecDeque<String>,
}

/// Decorator that memoizes another `StructuredModel`.
pub struct CachedModel<M> {
    inner: M,
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl<M: StructuredModel> CachedModel<M> {
    pub fn new(inner: M, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            ttl,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.remove(key);
        }
        None
    }

    fn store(&self, key: String, value: Value) {
        let mut state = self.lock();
        state.order.retain(|k| k != &key);

        while state.entries.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }

        state.order.push_back(key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }
}

/// Content address of a request.
pub fn cache_key(request: &ModelRequest) -> String {
    let mut hasher = Sha256::new();
    for part in [
        request.template_id,
        request.system,
        request.user.as_str(),
        request.output.name.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl<M: StructuredModel> StructuredModel for CachedModel<M> {
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError> {
        if !self.is_enabled() {
            return self.inner.invoke(request).await;
        }

        let key = cache_key(request);
        if let Some(value) = self.lookup(&key) {
            debug!(template = request.template_id, "model response cache hit");
            return Ok(value);
        }

        let value = self.inner.invoke(request).await?;
        self.store(key, value.clone());
        Ok(value)
    }
}
