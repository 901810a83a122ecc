//! TTL-bounded memoization of loaded record sets, keyed by source
//! identifier.
//!
//! The map hands out one slot per key; loading holds that slot's lock so at
//! most one fetch per key is ever in flight, with concurrent callers
//! blocking on the slot and then sharing the freshly cached `Arc`. A failed
//! load leaves the slot as it was (stale entry included); retry happens only
//! on the next explicit call.

use crate::error::Result;
use crate::record::RecordSet;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

type Slot = Option<(Arc<RecordSet>, Instant)>;

pub struct LoadCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Arc<Mutex<Slot>>>>,
}

impl LoadCache {
    /// A zero TTL disables expiry entirely (entries live for the process
    /// lifetime).
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if still fresh, otherwise runs
    /// `load` and caches its result. Concurrent callers for the same key
    /// block until the in-flight load finishes and then share its result.
    pub fn get_or_load<F>(&self, key: &str, load: F) -> Result<Arc<RecordSet>>
    where
        F: FnOnce() -> Result<RecordSet>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((value, loaded_at)) = slot.as_ref() {
            if self.ttl.is_zero() || loaded_at.elapsed() <= self.ttl {
                debug!("Cache hit for {key}");
                return Ok(Arc::clone(value));
            }
            debug!("Cache entry for {key} expired");
        }

        let value = Arc::new(load()?);
        *slot = Some((Arc::clone(&value), Instant::now()));
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
    }

    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.clear();
    }
}
