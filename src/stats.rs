// stats.rs - Counter and snapshot types for network telemetry
use std::time::SystemTime;

/// Byte and packet counters for one measurement scope.
///
/// The same shape is used for the interval window (since the last periodic
/// reset) and the lifetime totals (since start or the last full reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterGroup {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl CounterGroup {
    pub(crate) fn zero(&mut self) {
        *self = CounterGroup::default();
    }

    /// True if every counter is zero.
    pub fn is_empty(&self) -> bool {
        *self == CounterGroup::default()
    }
}

/// Immutable point-in-time copy of an aggregator's counters.
///
/// All fields are captured under the same lock that resets take, so a
/// snapshot never mixes pre-reset and post-reset values. Safe to read
/// from any thread without further synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Counters accumulated since the last interval reset.
    pub interval: CounterGroup,
    /// Counters accumulated since start or the last full reset.
    pub lifetime: CounterGroup,
    /// Wall-clock time of the most recent interval reset.
    pub last_interval_reset: SystemTime,
    /// Wall-clock time of the most recent full reset (or start).
    pub last_full_reset: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_group_zero() {
        let mut group = CounterGroup {
            packets_sent: 3,
            packets_received: 1,
            bytes_sent: 1200,
            bytes_received: 64,
        };
        assert!(!group.is_empty());
        group.zero();
        assert!(group.is_empty());
        assert_eq!(group, CounterGroup::default());
    }
}
