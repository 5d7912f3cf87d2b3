//! Heartbeat simulator - timestamps under tick counter wraparound
//!
//! Simulates:
//! - A leader broadcasting heartbeats with jitter and loss
//! - Followers tracking the latest heartbeat and election deadlines
//! - A shared manual clock started just below the overflow point

use std::time::Duration;

use quorum_time::{ManualClock, MonotonicClock, Timestamp, NANOS_PER_MILLI};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Heartbeat simulation configuration
#[derive(Clone, Debug)]
pub struct HeartbeatConfig {
    /// Nominal heartbeat interval (ms)
    pub interval_ms: i64,
    /// Max delivery delay per heartbeat (ms)
    pub jitter_ms: i64,
    /// Heartbeat loss probability (0.0 - 1.0)
    pub loss_rate: f64,
    /// Follower election timeout (ms)
    pub election_timeout_ms: i64,
    /// Raw tick value the clock starts at
    pub start_nanos: i64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        HeartbeatConfig {
            interval_ms: 50,
            jitter_ms: 10,
            loss_rate: 0.0,
            election_timeout_ms: 300,
            // Wraps two seconds in
            start_nanos: i64::MAX - 2_000 * NANOS_PER_MILLI,
        }
    }
}

impl HeartbeatConfig {
    /// Lossy network; some followers should time out
    pub fn lossy() -> Self {
        HeartbeatConfig {
            loss_rate: 0.9,
            ..Default::default()
        }
    }
}

/// Follower view of the leader
#[derive(Clone, Debug)]
pub struct SimulatedFollower {
    /// Latest heartbeat receipt
    last_heard: Timestamp,
    /// Heartbeats pending delivery
    in_flight: Vec<Timestamp>,
    /// Timeouts observed
    timeouts: u64,
}

impl SimulatedFollower {
    fn new(now: Timestamp) -> Self {
        SimulatedFollower {
            last_heard: now,
            in_flight: Vec::new(),
            timeouts: 0,
        }
    }

    pub fn last_heard(&self) -> Timestamp {
        self.last_heard
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts
    }
}

/// Simulation result
#[derive(Clone, Debug, Default)]
pub struct SimulationResult {
    /// Milliseconds simulated
    pub ticks: u64,
    /// Heartbeats delivered to followers
    pub heartbeats_delivered: u64,
    /// Heartbeats dropped
    pub heartbeats_lost: u64,
    /// Election timeouts across all followers
    pub timeouts: u64,
    /// Receipts that did not order after the previous one
    pub ordering_violations: u64,
    /// Whether the raw tick counter wrapped during the run
    pub wrapped: bool,
}

impl SimulationResult {
    pub fn is_consistent(&self) -> bool {
        self.ordering_violations == 0
    }
}

/// Leader/follower heartbeat simulation on a manual clock
pub struct HeartbeatSimulator {
    config: HeartbeatConfig,
    clock: ManualClock,
    followers: Vec<SimulatedFollower>,
    next_heartbeat: Timestamp,
    rng: StdRng,
}

impl HeartbeatSimulator {
    pub fn new(followers: usize, config: HeartbeatConfig, seed: u64) -> Self {
        let clock = ManualClock::new(config.start_nanos);
        let now = Timestamp::now_from(&clock);
        HeartbeatSimulator {
            followers: (0..followers).map(|_| SimulatedFollower::new(now)).collect(),
            next_heartbeat: now,
            rng: StdRng::seed_from_u64(seed),
            clock,
            config,
        }
    }

    pub fn followers(&self) -> &[SimulatedFollower] {
        &self.followers
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::now_from(&self.clock)
    }

    /// Run for a duration in 1ms steps
    pub fn run(&mut self, duration: Duration) -> SimulationResult {
        let mut result = SimulationResult::default();
        let start_raw = self.clock.nanos();

        for _ in 0..duration.as_millis() {
            self.tick(&mut result);
        }

        result.wrapped = self.clock.nanos() < start_raw;
        result.timeouts = self.followers.iter().map(|f| f.timeouts).sum();
        debug!(
            ticks = result.ticks,
            delivered = result.heartbeats_delivered,
            timeouts = result.timeouts,
            wrapped = result.wrapped,
            "heartbeat simulation finished"
        );
        result
    }

    fn tick(&mut self, result: &mut SimulationResult) {
        self.clock.advance_millis(1);
        let now = self.now();
        result.ticks += 1;

        // Leader broadcast
        if now >= self.next_heartbeat {
            for follower in &mut self.followers {
                if self.rng.gen_bool(self.config.loss_rate) {
                    result.heartbeats_lost += 1;
                    continue;
                }
                let delay = self.rng.gen_range(0..=self.config.jitter_ms);
                follower.in_flight.push(now.plus_millis(delay));
            }
            self.next_heartbeat = now.plus_millis(self.config.interval_ms);
        }

        for follower in &mut self.followers {
            // Deliver everything whose arrival time has passed
            let (arrived, pending): (Vec<_>, Vec<_>) = follower
                .in_flight
                .drain(..)
                .partition(|at| at.elapsed_millis_from(&self.clock) >= 0);
            follower.in_flight = pending;

            for at in arrived {
                let previous = follower.last_heard;
                follower.last_heard = *Timestamp::latest(&previous, &at);
                if follower.last_heard < previous || at > now {
                    result.ordering_violations += 1;
                }
                result.heartbeats_delivered += 1;
            }

            let silent_ms = follower.last_heard.elapsed_millis_from(&self.clock);
            if silent_ms > self.config.election_timeout_ms {
                follower.timeouts += 1;
                // Candidate resets its own deadline
                follower.last_heard = now;
            }
        }
    }
}
