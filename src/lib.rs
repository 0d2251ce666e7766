//! # NetMeter
//!
//! Process-wide network telemetry: a thread-safe aggregator that counts
//! bytes and packets observed by a host packet hook, keeps a periodic
//! interval window alongside lifetime totals, and serves consistent
//! point-in-time snapshots for display or reporting.
//!
//! The aggregator never decodes the traffic it measures: the host hook
//! delivers one event per transmitted or received unit with its raw byte
//! length, and everything else is counting. Counts are process-wide
//! aggregates, not per-peer breakdowns, and nothing is persisted across
//! restarts.
//!
//! ## Quick Start
//!
//! ```
//! use netmeter::{NetworkStatsAggregator, ThreadScheduler};
//!
//! let aggregator = NetworkStatsAggregator::new();
//! aggregator.start(&ThreadScheduler);
//!
//! // The host's packet hook calls these once per observed unit.
//! aggregator.record_sent(128);
//! aggregator.record_received(512);
//!
//! let snap = aggregator.snapshot();
//! assert_eq!(snap.lifetime.bytes_sent, 128);
//! assert_eq!(snap.lifetime.packets_received, 1);
//!
//! aggregator.stop();
//! ```
//!
//! Hosts with their own task runner implement [`Scheduler`] instead of
//! using [`ThreadScheduler`], and attach the aggregator to their packet
//! interception facility through [`PacketHookRegistry`].

pub mod aggregator;
pub mod hook;
pub mod scheduler;
pub mod stats;
pub mod util;

pub use aggregator::{NetworkStatsAggregator, DEFAULT_INTERVAL_PERIOD};
pub use hook::{PacketHookRegistry, PacketListener, RegistrationError, StatsPacketListener};
pub use scheduler::{Scheduler, TaskHandle, ThreadScheduler};
pub use stats::{CounterGroup, StatsSnapshot};
pub use util::{format_bytes, format_rate};

/// Prelude: import everything commonly needed.
pub mod prelude {
    pub use crate::{
        CounterGroup, NetworkStatsAggregator, PacketHookRegistry, PacketListener,
        RegistrationError, Scheduler, StatsSnapshot, ThreadScheduler,
    };
}
