//! Deferred execution used for break completion.
//!
//! The tracker never sleeps on its own processing path. Anything that has to
//! happen later is handed to a [`Scheduler`] which runs it independently and
//! returns a [`ScheduledTask`] handle that can cancel it.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A one-shot deferred action.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay without blocking the caller.
pub trait Scheduler: Send + Sync {
    fn schedule_delayed(&self, delay: Duration, task: Task) -> ScheduledTask;
}

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task; only [`ScheduledTask::cancel`] does.
pub struct ScheduledTask {
    cancelled: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    fn new(cancelled: Arc<AtomicBool>, join: Option<JoinHandle<()>>) -> Self {
        Self { cancelled, join }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(join) = &self.join {
            join.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Schedules tasks on a tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Binds the scheduler to the runtime of the calling context.
    ///
    /// Panics when called outside of a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self { handle: Handle::current() }
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_delayed(&self, delay: Duration, task: Task) -> ScheduledTask {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });
        ScheduledTask::new(cancelled, Some(join))
    }
}

struct PendingTask {
    delay: Duration,
    cancelled: Arc<AtomicBool>,
    task: Task,
}

/// Queues tasks until they are run explicitly.
///
/// Used to drive break cycles deterministically in simulations and tests.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<PendingTask>>,
    run_inline: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler that runs every task inside `schedule_delayed`, ignoring the delay.
    ///
    /// Models a timer that fires before the caller gets the handle back.
    pub fn immediate() -> Self {
        Self {
            pending: Mutex::default(),
            run_inline: true,
        }
    }

    /// Number of queued tasks that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.lock().iter().filter(|p| !p.cancelled.load(Ordering::SeqCst)).count()
    }

    /// Delays of the queued tasks, in scheduling order.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending
            .lock()
            .iter()
            .filter(|p| !p.cancelled.load(Ordering::SeqCst))
            .map(|p| p.delay)
            .collect()
    }

    /// Runs every queued task that was not cancelled and returns how many ran.
    ///
    /// Tasks are drained before running so a task may schedule new work.
    pub fn run_pending(&self) -> usize {
        let drained: Vec<PendingTask> = std::mem::take(&mut *self.pending.lock());
        let mut ran = 0;
        for pending in drained {
            if !pending.cancelled.load(Ordering::SeqCst) {
                (pending.task)();
                ran += 1;
            }
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_delayed(&self, delay: Duration, task: Task) -> ScheduledTask {
        let cancelled = Arc::new(AtomicBool::new(false));
        if self.run_inline {
            task();
            return ScheduledTask::new(cancelled, None);
        }
        self.pending.lock().push(PendingTask {
            delay,
            cancelled: cancelled.clone(),
            task,
        });
        ScheduledTask::new(cancelled, None)
    }
}
