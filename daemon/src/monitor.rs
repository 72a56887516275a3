//! Resource monitor
//!
//! The monitor's lifecycle lives in a [`MonitorContext`] shared between the
//! server and the monitoring task. Stopping is a cancellation of the shared
//! token; there is no global flag.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Request counters updated by the API handlers
#[derive(Debug)]
pub struct ServiceStats {
    started: Instant,
    enhancements: AtomicU64,
    generations: AtomicU64,
    failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub enhancements: u64,
    pub generations: u64,
    pub failures: u64,
}

impl ServiceStats {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            enhancements: AtomicU64::new(0),
            generations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn record_enhancement(&self) {
        self.enhancements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation(&self) {
        self.generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.started.elapsed().as_secs(),
            enhancements: self.enhancements.load(Ordering::Relaxed),
            generations: self.generations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    /// No reporting task has been spawned
    Disabled,
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct MonitorContext {
    cancel: CancellationToken,
    spawned: Arc<AtomicBool>,
    stats: Arc<ServiceStats>,
}

impl MonitorContext {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            spawned: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(ServiceStats::new()),
        }
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    pub fn state(&self) -> MonitorState {
        if !self.spawned.load(Ordering::Acquire) {
            MonitorState::Disabled
        } else if self.cancel.is_cancelled() {
            MonitorState::Stopped
        } else {
            MonitorState::Running
        }
    }

    /// Stop the monitor. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the reporting task; it runs until [`stop`](Self::stop) is called
    pub fn spawn(&self, interval: Duration) -> JoinHandle<()> {
        self.spawned.store(true, Ordering::Release);
        tokio::spawn(run(self.clone(), interval.max(Duration::from_millis(1))))
    }
}

impl Default for MonitorContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn run(ctx: MonitorContext, interval: Duration) {
    tracing::info!("Resource monitor started, reporting every {:?}", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = ticker.tick() => {
                let stats = ctx.stats.snapshot();
                tracing::info!(
                    uptime_secs = stats.uptime_secs,
                    enhancements = stats.enhancements,
                    generations = stats.generations,
                    failures = stats.failures,
                    "Resource report"
                );
            }
        }
    }

    tracing::info!("Resource monitor stopped");
}
