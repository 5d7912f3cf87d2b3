//! Weak string interning
//!
//! Canonical strings are `Arc<str>` values owned by callers. The interner
//! only keeps `Weak` handles, so an entry dies as soon as the last caller
//! drops it. Dead handles are swept lazily: per bucket on every lookup, and
//! table-wide once the table outgrows its sweep threshold.
//!
//! Lookup and registration happen under a single lock, so two threads
//! interning equal content always agree on one canonical instance.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Weak interner configuration
#[derive(Clone, Debug)]
pub struct InternerConfig {
    /// Buckets reserved up front
    pub initial_capacity: usize,
    /// Minimum tracked handles (live or dead) before a table-wide sweep
    pub sweep_threshold: usize,
}

impl Default for InternerConfig {
    fn default() -> Self {
        InternerConfig {
            initial_capacity: 64,
            sweep_threshold: 1024,
        }
    }
}

struct InternTable {
    /// Content hash -> weak handles with that hash
    buckets: HashMap<u64, Vec<Weak<str>>>,
    /// Handles tracked across all buckets, live or dead
    tracked: usize,
    /// Sweep when `tracked` passes this
    next_sweep: usize,
}

impl InternTable {
    /// Drop dead handles everywhere; returns how many were evicted
    fn sweep(&mut self, min_threshold: usize) -> usize {
        let before = self.tracked;
        self.buckets.retain(|_, bucket| {
            bucket.retain(|w| w.strong_count() > 0);
            !bucket.is_empty()
        });
        self.tracked = self.buckets.values().map(Vec::len).sum();
        self.next_sweep = min_threshold.max(self.tracked * 2);
        before - self.tracked
    }
}

/// Deduplicating cache of weakly held strings
pub struct WeakInterner {
    table: Mutex<InternTable>,
    hasher: RandomState,
    config: InternerConfig,
}

impl WeakInterner {
    pub fn new() -> Self {
        Self::with_config(InternerConfig::default())
    }

    pub fn with_config(config: InternerConfig) -> Self {
        WeakInterner {
            table: Mutex::new(InternTable {
                buckets: HashMap::with_capacity(config.initial_capacity),
                tracked: 0,
                next_sweep: config.sweep_threshold,
            }),
            hasher: RandomState::new(),
            config,
        }
    }

    /// Canonical instance for `sample`'s content.
    ///
    /// `sample` itself becomes canonical if no live instance exists.
    pub fn intern(&self, sample: Arc<str>) -> Arc<str> {
        let key = Arc::clone(&sample);
        self.intern_with(&key, move || sample)
    }

    /// Like [`intern`](Self::intern), allocating only on a miss
    pub fn intern_str(&self, content: &str) -> Arc<str> {
        self.intern_with(content, || Arc::from(content))
    }

    fn intern_with<F>(&self, content: &str, make: F) -> Arc<str>
    where
        F: FnOnce() -> Arc<str>,
    {
        let hash = self.hasher.hash_one(content);
        let mut table = self.table.lock();

        let bucket = table.buckets.entry(hash).or_default();
        let before = bucket.len();
        bucket.retain(|w| w.strong_count() > 0);
        let evicted = before - bucket.len();

        let found = bucket
            .iter()
            .filter_map(Weak::upgrade)
            .find(|live| **live == *content);

        let (canonical, added) = match found {
            Some(live) => (live, 0),
            None => {
                let fresh = make();
                bucket.push(Arc::downgrade(&fresh));
                (fresh, 1)
            }
        };

        table.tracked = table.tracked - evicted + added;
        if table.tracked > table.next_sweep {
            let swept = table.sweep(self.config.sweep_threshold);
            debug!(
                evicted = swept,
                live = table.tracked,
                next_sweep = table.next_sweep,
                "swept weak interner"
            );
        }

        canonical
    }

    /// Evict every dead entry now; returns the number evicted
    pub fn purge(&self) -> usize {
        let mut table = self.table.lock();
        let evicted = table.sweep(self.config.sweep_threshold);
        trace!(evicted, live = table.tracked, "purged weak interner");
        evicted
    }

    /// Number of live canonical strings
    pub fn len(&self) -> usize {
        let table = self.table.lock();
        table
            .buckets
            .values()
            .flatten()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles held by the table, including ones not yet swept
    pub fn tracked(&self) -> usize {
        self.table.lock().tracked
    }
}

impl Default for WeakInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WeakInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakInterner")
            .field("tracked", &self.tracked())
            .field("config", &self.config)
            .finish()
    }
}

/// Process-wide interner, created on first use
static WEAK_INTERNER: Lazy<WeakInterner> = Lazy::new(WeakInterner::new);

/// The process-wide interner behind [`weak_intern`]
pub fn global_interner() -> &'static WeakInterner {
    &WEAK_INTERNER
}

/// Intern through the process-wide cache; `None` passes through unchanged
pub fn weak_intern(sample: Option<Arc<str>>) -> Option<Arc<str>> {
    sample.map(|s| WEAK_INTERNER.intern(s))
}
