//! Interned-value tables backing the memoized fields, atoms and spaces.
//!
//! Each table maps a canonical key to a shared `Arc`. Lookups take the read
//! lock; a miss takes the write lock and re-checks through the entry API, so
//! concurrent callers racing on the same key all receive the same instance.
//! Entries live for the rest of the process.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

/// A read-mostly concurrent intern table.
#[derive(Debug)]
pub(crate) struct Interner<K, V> {
    name: &'static str,
    table: RwLock<HashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash + Debug, V> Interner<K, V> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Return the shared value for `key`, building it with `make` on a miss.
    ///
    /// `make` runs under the write lock and must not intern into the same
    /// table.
    pub(crate) fn intern<F>(&self, key: K, make: F) -> Arc<V>
    where
        F: FnOnce(&K) -> V,
    {
        {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = table.get(&key) {
                return Arc::clone(value);
            }
        }

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let name = self.name;
        let value = table.entry(key).or_insert_with_key(|k| {
            trace!(table = name, key = ?k, "interning new value");
            Arc::new(make(k))
        });
        Arc::clone(value)
    }

    /// Number of interned entries.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
