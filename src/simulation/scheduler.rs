//! Periodic tick scheduling
//!
//! The scheduler owns a tokio task that calls back into the monitor once per
//! period. Each task is bound to a run generation; the monitor bumps the
//! generation under its write lock when a run ends, so a tick that was already
//! waiting for the lock observes the change and exits without mutating state.

use crate::simulation::WeakMonitor;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Handle to a running tick task
#[derive(Debug)]
pub struct TickScheduler {
    task: JoinHandle<()>,
    generation: u64,
    period: Duration,
}

impl TickScheduler {
    /// Spawn a tick loop on `handle` for the given run generation
    pub fn spawn(handle: &Handle, monitor: WeakMonitor, period: Duration, generation: u64) -> Self {
        let period = period.max(Duration::from_millis(1));

        let task = handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(monitor) = monitor.upgrade() else {
                    debug!(generation, "Monitor dropped, stopping tick loop");
                    break;
                };

                let span = crate::tick_span!(generation = generation);
                match span.in_scope(|| monitor.scheduled_tick(generation)) {
                    Ok(Some(report)) => {
                        debug!(
                            generation,
                            opened = report.opened,
                            resolved = report.resolved,
                            "Scheduled tick applied"
                        );
                    }
                    Ok(None) => {
                        debug!(generation, "Run ended, stopping tick loop");
                        break;
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "Scheduled tick failed");
                    }
                }
            }
        });

        debug!(generation, period_ms = period.as_millis() as u64, "Tick scheduler spawned");
        Self { task, generation, period }
    }

    /// Run generation this scheduler serves
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Abort the task; no further ticks are delivered
    pub fn cancel(self) {
        self.task.abort();
        debug!(generation = self.generation, "Tick scheduler cancelled");
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
