//! Refresh scheduler.
//!
//! Every registered task runs once immediately, then again on each tick of
//! its own interval and on every viewport resize. Each trigger spawns its
//! own invocation: nothing is coalesced or dropped, and an invocation that
//! fails or panics is logged without touching the task's schedule.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use crib_common::error::Result;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Buffered resize notifications per task before older ones collapse.
const RESIZE_BUFFER: usize = 64;

/// A unit of refresh work, typically one widget's fetch-and-render cycle.
#[async_trait]
pub trait RefreshTask: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Runs one refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh failed; the scheduler logs it and
    /// keeps the task scheduled.
    async fn refresh(&self) -> Result<()>;
}

/// What caused an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The invocation made at registration.
    Initial,
    /// The task's interval elapsed.
    Tick,
    /// The viewport was resized.
    Resize,
}

/// Cloneable handle that notifies every registered task of a resize.
#[derive(Debug, Clone)]
pub struct ResizeSignal {
    tx: broadcast::Sender<()>,
}

impl ResizeSignal {
    /// Re-runs every registered task.
    pub fn fire(&self) {
        match self.tx.send(()) {
            Ok(subscribers) => tracing::debug!(subscribers, "viewport resized"),
            Err(_) => tracing::trace!("viewport resized with no registered tasks"),
        }
    }
}

/// Drives registered refresh tasks on a combined timer and resize cadence.
#[derive(Debug)]
pub struct RefreshScheduler {
    resize: broadcast::Sender<()>,
    drivers: JoinSet<()>,
    invocations: Arc<AtomicU64>,
    registered: usize,
}

impl RefreshScheduler {
    /// Creates a scheduler with no tasks.
    #[must_use]
    pub fn new() -> Self {
        let (resize, _) = broadcast::channel(RESIZE_BUFFER);
        Self {
            resize,
            drivers: JoinSet::new(),
            invocations: Arc::new(AtomicU64::new(0)),
            registered: 0,
        }
    }

    /// Handle for the front end to report viewport resizes.
    #[must_use]
    pub fn resize_signal(&self) -> ResizeSignal {
        ResizeSignal {
            tx: self.resize.clone(),
        }
    }

    /// Registers `task`: runs it now, on every resize, and every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(&mut self, task: Arc<dyn RefreshTask>, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        let mut resized = self.resize.subscribe();
        let invocations = Arc::clone(&self.invocations);
        self.registered += 1;

        tracing::info!(task = task.name(), interval_ms = interval.as_millis(), "registering refresh task");
        invoke(&task, Trigger::Initial, &invocations);

        let _ = self.drivers.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let (trigger, times) = tokio::select! {
                    _ = ticker.tick() => (Trigger::Tick, 1),
                    received = resized.recv() => match received {
                        Ok(()) => (Trigger::Resize, 1),
                        Err(RecvError::Lagged(missed)) => {
                            tracing::debug!(task = task.name(), missed, "replaying missed resize notifications");
                            (Trigger::Resize, missed)
                        }
                        Err(RecvError::Closed) => break,
                    },
                };
                for _ in 0..times {
                    invoke(&task, trigger, &invocations);
                }
            }
        });
    }

    /// Total invocations started across all tasks.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Number of registered tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.registered
    }

    /// Returns `true` if no task is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.registered == 0
    }

    /// Stops every task's timer and resize subscription.
    ///
    /// Invocations already in flight run to completion.
    pub async fn shutdown(mut self) {
        tracing::info!(tasks = self.registered, "stopping refresh scheduler");
        self.drivers.shutdown().await;
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns one isolated invocation of `task`.
fn invoke(task: &Arc<dyn RefreshTask>, trigger: Trigger, invocations: &AtomicU64) {
    let _ = invocations.fetch_add(1, Ordering::Relaxed);
    let task = Arc::clone(task);
    let _ = tokio::spawn(async move {
        let name = task.name().to_string();
        let outcome = tokio::spawn(async move { task.refresh().await }).await;
        match outcome {
            Ok(Ok(())) => tracing::trace!(task = %name, ?trigger, "refresh complete"),
            Ok(Err(e)) => tracing::warn!(task = %name, ?trigger, error = %e, "refresh failed"),
            Err(e) if e.is_panic() => tracing::error!(task = %name, ?trigger, "refresh panicked"),
            Err(_) => tracing::debug!(task = %name, ?trigger, "refresh cancelled"),
        }
    });
}
