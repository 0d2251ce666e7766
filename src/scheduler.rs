// scheduler.rs - Fixed-rate task scheduling contract and the thread-backed default
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a repeating task armed through a [`Scheduler`].
pub trait TaskHandle: Send + Sync {
    /// Cancels the task. After this returns, no new invocation of the
    /// callback will begin; an invocation already running when `cancel`
    /// was called is allowed to finish first.
    fn cancel(&self);

    /// True once the task has been cancelled.
    fn is_cancelled(&self) -> bool;
}

/// A facility that runs a callback repeatedly at a fixed period.
///
/// Firing is at-least-periodic, not exact: a tick may be late, but two
/// ticks never run concurrently. Host environments with their own task
/// runner implement this trait; [`ThreadScheduler`] is the standalone
/// default.
pub trait Scheduler: Send + Sync {
    fn run_at_fixed_rate(
        &self,
        period: Duration,
        task: Box<dyn FnMut() + Send>,
    ) -> Box<dyn TaskHandle>;
}

struct TaskState {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

struct ThreadTaskHandle {
    state: Arc<TaskState>,
}

impl TaskHandle for ThreadTaskHandle {
    fn cancel(&self) {
        // The worker holds this mutex while the callback runs, so acquiring
        // it here waits out any in-flight invocation before the flag flips.
        let mut cancelled = match self.state.cancelled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cancelled = true;
        self.state.signal.notify_all();
    }

    fn is_cancelled(&self) -> bool {
        match self.state.cancelled.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Default [`Scheduler`] backed by one OS thread per armed task.
///
/// The thread sleeps on a condvar between ticks and exits promptly when
/// the handle is cancelled.
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn run_at_fixed_rate(
        &self,
        period: Duration,
        mut task: Box<dyn FnMut() + Send>,
    ) -> Box<dyn TaskHandle> {
        let state = Arc::new(TaskState {
            cancelled: Mutex::new(false),
            signal: Condvar::new(),
        });
        let worker_state = Arc::clone(&state);

        thread::spawn(move || {
            let mut cancelled = match worker_state.cancelled.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            loop {
                let deadline = Instant::now() + period;
                // Re-check after every wakeup: wait_timeout may return
                // spuriously before the deadline.
                while !*cancelled {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    let (guard, _) = match worker_state
                        .signal
                        .wait_timeout(cancelled, deadline - now)
                    {
                        Ok(result) => result,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    cancelled = guard;
                }
                if *cancelled {
                    return;
                }
                // Runs with the lock held so cancel() can wait it out.
                task();
            }
        });

        Box::new(ThreadTaskHandle { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_task_fires_periodically() {
        let fired = Arc::new(AtomicU32::new(0));
        let task_fired = Arc::clone(&fired);

        let handle = ThreadScheduler.run_at_fixed_rate(
            Duration::from_millis(10),
            Box::new(move || {
                task_fired.fetch_add(1, Ordering::SeqCst);
            }),
        );

        thread::sleep(Duration::from_millis(100));
        handle.cancel();
        assert!(fired.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let fired = Arc::new(AtomicU32::new(0));
        let task_fired = Arc::clone(&fired);

        let handle = ThreadScheduler.run_at_fixed_rate(
            Duration::from_millis(10),
            Box::new(move || {
                task_fired.fetch_add(1, Ordering::SeqCst);
            }),
        );

        thread::sleep(Duration::from_millis(50));
        handle.cancel();
        assert!(handle.is_cancelled());

        // cancel() returns only after any in-flight invocation completed,
        // so the count is final from here on.
        let after_cancel = fired.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fired.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn test_cancel_before_first_tick() {
        let fired = Arc::new(AtomicU32::new(0));
        let task_fired = Arc::clone(&fired);

        let handle = ThreadScheduler.run_at_fixed_rate(
            Duration::from_secs(60),
            Box::new(move || {
                task_fired.fetch_add(1, Ordering::SeqCst);
            }),
        );

        handle.cancel();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
