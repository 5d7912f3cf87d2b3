//! Concurrent interning stress harness
//!
//! Hammers one `WeakInterner` from many threads with a small key space while
//! some owners come and go, then checks that every thread saw the same
//! canonical instance for each key that stayed alive. A second phase has all
//! threads race to register never-seen keys at once and holds every result
//! so divergent canonicals are visible.

use std::sync::{Arc, Barrier};
use std::thread;

use quorum_text::{InternerConfig, WeakInterner};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Stress run configuration
#[derive(Clone, Debug)]
pub struct StressConfig {
    /// Worker threads
    pub threads: usize,
    /// Intern calls per thread
    pub iterations: usize,
    /// Distinct keys, half pinned for the whole run
    pub distinct_keys: usize,
    /// Barrier-aligned rounds registering a fresh key from every thread
    pub fresh_rounds: usize,
    /// Interner settings under test
    pub interner: InternerConfig,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            threads: 8,
            iterations: 2_000,
            distinct_keys: 32,
            fresh_rounds: 64,
            interner: InternerConfig {
                initial_capacity: 16,
                sweep_threshold: 16,
            },
        }
    }
}

/// Stress run result
#[derive(Clone, Debug, Default)]
pub struct StressReport {
    /// Total intern calls
    pub lookups: u64,
    /// Pinned-key results that were not the pinned canonical
    pub mismatches: u64,
    /// Fresh-key rounds where threads held different canonicals
    pub divergent_fresh: u64,
    /// Live entries after all workers finished
    pub live_after: usize,
    /// Entries still live after dropping the pins and purging
    pub live_after_release: usize,
}

impl StressReport {
    pub fn passed(&self) -> bool {
        self.mismatches == 0 && self.divergent_fresh == 0 && self.live_after_release == 0
    }
}

fn key(i: usize) -> String {
    format!("peer-{:04}", i)
}

fn fresh_key(seed: u64, round: usize) -> String {
    format!("fresh-{}-{:04}", seed, round)
}

/// Run the stress scenario with a fixed seed per worker
pub fn run_intern_stress(config: &StressConfig, seed: u64) -> StressReport {
    let interner = Arc::new(WeakInterner::with_config(config.interner.clone()));
    let pinned_count = config.distinct_keys / 2;
    let pinned: Arc<Vec<Arc<str>>> = Arc::new(
        (0..pinned_count)
            .map(|i| interner.intern_str(&key(i)))
            .collect(),
    );
    let barrier = Arc::new(Barrier::new(config.threads));

    let workers: Vec<_> = (0..config.threads)
        .map(|worker| {
            let interner = Arc::clone(&interner);
            let pinned = Arc::clone(&pinned);
            let barrier = Arc::clone(&barrier);
            let config = config.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
                let mut mismatches = 0u64;
                barrier.wait();

                for _ in 0..config.iterations {
                    let i = rng.gen_range(0..config.distinct_keys);
                    let canonical = interner.intern(Arc::from(key(i)));
                    if i < pinned.len() && !Arc::ptr_eq(&canonical, &pinned[i]) {
                        mismatches += 1;
                    }
                }

                // Results are kept until join so rounds are compared while held
                let mut fresh = Vec::with_capacity(config.fresh_rounds);
                for round in 0..config.fresh_rounds {
                    let sample: Arc<str> = Arc::from(fresh_key(seed, round));
                    barrier.wait();
                    fresh.push(interner.intern(sample));
                }
                (mismatches, fresh)
            })
        })
        .collect();

    let mut report = StressReport {
        lookups: (config.threads * config.iterations) as u64,
        ..Default::default()
    };
    let mut fresh_results: Vec<Vec<Arc<str>>> = Vec::with_capacity(config.threads);
    for worker in workers {
        match worker.join() {
            Ok((mismatches, fresh)) => {
                report.mismatches += mismatches;
                fresh_results.push(fresh);
            }
            // A panicked worker counts as a full set of mismatches
            Err(_) => report.mismatches += config.iterations as u64,
        }
    }

    if let Some((first, rest)) = fresh_results.split_first() {
        for round in 0..first.len() {
            let diverged = rest
                .iter()
                .any(|other| !Arc::ptr_eq(&other[round], &first[round]));
            if diverged {
                report.divergent_fresh += 1;
            }
        }
    }

    report.live_after = interner.len();
    drop(pinned);
    drop(fresh_results);
    let evicted = interner.purge();
    report.live_after_release = interner.len();

    debug!(evicted, "released pinned keys");
    info!(
        lookups = report.lookups,
        mismatches = report.mismatches,
        divergent_fresh = report.divergent_fresh,
        live_after = report.live_after,
        "intern stress finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stress_passes() {
        let config = StressConfig::default();
        let report = run_intern_stress(&config, 42);

        assert_eq!(report.lookups, 16_000);
        assert_eq!(report.mismatches, 0);
        assert_eq!(report.divergent_fresh, 0);
        // Pinned keys plus every held fresh-round canonical
        assert_eq!(report.live_after, config.distinct_keys / 2 + config.fresh_rounds);
        assert!(report.passed());
    }

    #[test]
    fn test_fresh_registration_race_many_rounds() {
        let config = StressConfig {
            threads: 8,
            iterations: 0,
            fresh_rounds: 200,
            interner: InternerConfig {
                initial_capacity: 1,
                sweep_threshold: 2,
            },
            ..Default::default()
        };
        let report = run_intern_stress(&config, 9);

        assert_eq!(report.divergent_fresh, 0);
        assert_eq!(report.live_after, config.distinct_keys / 2 + 200);
        assert!(report.passed());
    }

    #[test]
    fn test_single_thread_stress() {
        let config = StressConfig {
            threads: 1,
            iterations: 500,
            ..Default::default()
        };
        assert!(run_intern_stress(&config, 1).passed());
    }
}
