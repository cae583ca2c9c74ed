use crate::StylizeError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Slot<M> = Arc<Mutex<Option<Arc<M>>>>;

/// Keyed memo table for loaded models. Entries live as long as the cache.
///
/// Each key has its own slot lock, held while the loader runs: concurrent
/// misses on one key wait for the single in-flight load instead of starting
/// another, while misses on different keys load in parallel.
pub struct ModelCache<M> {
    slots: Mutex<HashMap<String, Slot<M>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a loader that panicked leaves the slot empty, which is still consistent
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<M> ModelCache<M> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached model for `key`, running `loader` on a miss.
    ///
    /// A failed load is not cached; the next call for the same key retries.
    pub fn get_or_load<F>(&self, key: &str, loader: F) -> Result<Arc<M>, StylizeError>
    where
        F: FnOnce() -> Result<M, StylizeError>,
    {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let mut entry = lock(&slot);
        if let Some(model) = entry.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(loader()?);
        *entry = Some(Arc::clone(&model));
        Ok(model)
    }

    pub fn contains(&self, key: &str) -> bool {
        let slot = lock(&self.slots).get(key).cloned();
        slot.is_some_and(|slot| lock(&slot).is_some())
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot<M>> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Default for ModelCache<M> {
    fn default() -> Self {
        Self::new()
    }
}
