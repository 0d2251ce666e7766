// aggregator.rs - Thread-safe accumulation of observed network activity
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use crate::hook::{PacketHookRegistry, RegistrationError, StatsPacketListener};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::stats::{CounterGroup, StatsSnapshot};

/// Default width of the interval measurement window.
pub const DEFAULT_INTERVAL_PERIOD: Duration = Duration::from_secs(1);

/// All counter state, guarded by a single mutex so snapshots and resets
/// are consistent across every field.
#[derive(Debug)]
struct CounterSet {
    interval: CounterGroup,
    lifetime: CounterGroup,
    last_interval_reset: SystemTime,
    last_full_reset: SystemTime,
}

impl CounterSet {
    fn new(now: SystemTime) -> Self {
        Self {
            interval: CounterGroup::default(),
            lifetime: CounterGroup::default(),
            last_interval_reset: now,
            last_full_reset: now,
        }
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            interval: self.interval,
            lifetime: self.lifetime,
            last_interval_reset: self.last_interval_reset,
            last_full_reset: self.last_full_reset,
        }
    }
}

struct Inner {
    counters: Mutex<CounterSet>,
    interval_period: Duration,
    timer: Mutex<Option<Box<dyn TaskHandle>>>,
}

impl Inner {
    // The counters are plain integers and every critical section is a
    // straight-line copy or zero, so the state behind a poisoned lock is
    // still sound. Recovering here keeps a panic elsewhere from ever
    // reaching the host's packet-processing path.
    fn lock_counters(&self) -> MutexGuard<'_, CounterSet> {
        match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<Box<dyn TaskHandle>>> {
        match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn reset_interval(&self) {
        let mut counters = self.lock_counters();
        counters.interval.zero();
        counters.last_interval_reset = SystemTime::now();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Last handle gone: disarm the timer so a thread-backed scheduler
        // worker exits instead of ticking forever.
        if let Some(handle) = self.lock_timer().take() {
            handle.cancel();
        }
    }
}

/// Accumulates process-wide network activity from a packet ingestion hook
/// and serves consistent point-in-time snapshots.
///
/// Two counter groups are kept: the interval window, zeroed by a periodic
/// timer armed in [`start`](Self::start), and the lifetime totals, zeroed
/// only by [`reset_all`](Self::reset_all). The aggregator is a cheap
/// cloneable handle to shared state; every operation is safe to call
/// concurrently from any thread, and critical sections only copy or zero
/// the counters, never perform I/O.
#[derive(Clone)]
pub struct NetworkStatsAggregator {
    inner: Arc<Inner>,
}

impl NetworkStatsAggregator {
    /// Creates a zeroed aggregator with the default 1-second interval window.
    pub fn new() -> Self {
        Self::with_interval_period(DEFAULT_INTERVAL_PERIOD)
    }

    /// Creates a zeroed aggregator with a custom interval window width.
    pub fn with_interval_period(period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                counters: Mutex::new(CounterSet::new(SystemTime::now())),
                interval_period: period,
                timer: Mutex::new(None),
            }),
        }
    }

    /// Width of the interval window the periodic reset is armed with.
    pub fn interval_period(&self) -> Duration {
        self.inner.interval_period
    }

    /// Zeroes all counters, stamps the start time, and arms the periodic
    /// interval reset on `scheduler`.
    ///
    /// Returns `false` if already started: the existing timer stays armed,
    /// the counters are untouched, and a warning is logged. A second timer
    /// is never armed.
    pub fn start(&self, scheduler: &dyn Scheduler) -> bool {
        let mut timer = self.inner.lock_timer();
        if timer.is_some() {
            log::warn!("network stats aggregator already started, ignoring duplicate start");
            return false;
        }

        *self.inner.lock_counters() = CounterSet::new(SystemTime::now());

        // Weak reference so an armed timer never keeps the counters alive.
        let weak = Arc::downgrade(&self.inner);
        let handle = scheduler.run_at_fixed_rate(
            self.inner.interval_period,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.reset_interval();
                }
            }),
        );
        *timer = Some(handle);
        true
    }

    /// Disarms the periodic interval reset.
    ///
    /// After this returns, no further automatic reset begins (one already
    /// running when `stop` was called may finish; [`ThreadScheduler`]
    /// waits it out before `cancel` returns). Recording stays legal and
    /// counters keep accumulating until the next [`start`](Self::start).
    ///
    /// [`ThreadScheduler`]: crate::scheduler::ThreadScheduler
    pub fn stop(&self) {
        let handle = self.inner.lock_timer().take();
        if let Some(handle) = handle {
            handle.cancel();
        }
    }

    /// True while the periodic interval reset is armed.
    pub fn is_started(&self) -> bool {
        self.inner.lock_timer().is_some()
    }

    /// Registers a forwarding listener with the host's interception
    /// facility. On failure the error is logged and returned; the
    /// aggregator stays in a no-data state rather than failing the host.
    pub fn attach(&self, registry: &dyn PacketHookRegistry) -> Result<(), RegistrationError> {
        let listener = Arc::new(StatsPacketListener::new(self.clone()));
        registry.register(listener).map_err(|err| {
            log::warn!("{}", err);
            err
        })
    }

    /// Records one observed outbound unit of `byte_len` bytes.
    ///
    /// Lengths of zero or less are a benign host quirk and are silently
    /// ignored. Safe to call concurrently from any number of threads; no
    /// increment is ever lost.
    pub fn record_sent(&self, byte_len: i64) {
        let Ok(bytes) = u64::try_from(byte_len) else {
            return;
        };
        if bytes == 0 {
            return;
        }
        let mut counters = self.inner.lock_counters();
        counters.interval.bytes_sent += bytes;
        counters.interval.packets_sent += 1;
        counters.lifetime.bytes_sent += bytes;
        counters.lifetime.packets_sent += 1;
    }

    /// Records one observed inbound unit of `byte_len` bytes.
    /// Same contract as [`record_sent`](Self::record_sent).
    pub fn record_received(&self, byte_len: i64) {
        let Ok(bytes) = u64::try_from(byte_len) else {
            return;
        };
        if bytes == 0 {
            return;
        }
        let mut counters = self.inner.lock_counters();
        counters.interval.bytes_received += bytes;
        counters.interval.packets_received += 1;
        counters.lifetime.bytes_received += bytes;
        counters.lifetime.packets_received += 1;
    }

    /// Returns a consistent copy of every counter and both reset
    /// timestamps as they exist at one instant.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock_counters().snapshot()
    }

    /// Zeroes the interval counters and stamps the interval-reset time.
    /// Lifetime totals are untouched. Invoked by the periodic timer, but
    /// callable directly by hosts that drive their own cadence.
    pub fn reset_interval(&self) {
        self.inner.reset_interval();
    }

    /// Zeroes every counter and returns the snapshot taken immediately
    /// before, so the final readings survive the reset.
    ///
    /// Both reset timestamps are stamped with the current time: the
    /// interval window restarts along with the lifetime totals.
    pub fn reset_all(&self) -> StatsSnapshot {
        let mut counters = self.inner.lock_counters();
        let before = counters.snapshot();
        *counters = CounterSet::new(SystemTime::now());
        before
    }
}

impl Default for NetworkStatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
