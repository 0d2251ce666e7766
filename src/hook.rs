// hook.rs - Packet ingestion hook contract between the host transport and the aggregator
use std::sync::Arc;

use crate::aggregator::NetworkStatsAggregator;

/// Receives one event per observed transport unit along with its raw byte
/// length. The host's I/O layer may deliver these from multiple threads
/// concurrently.
///
/// Implementations must never panic back into the caller: a telemetry
/// failure must not disturb the transport being observed.
pub trait PacketListener: Send + Sync {
    fn on_packet_sent(&self, byte_len: i64);
    fn on_packet_received(&self, byte_len: i64);
}

/// Host-side interception facility the aggregator attaches to.
///
/// Exactly one listener is registered per aggregator; registration may be
/// refused, in which case the aggregator keeps serving all-zero data.
pub trait PacketHookRegistry {
    fn register(&self, listener: Arc<dyn PacketListener>) -> Result<(), RegistrationError>;
}

/// The interception facility refused or failed to attach the listener.
#[derive(Debug, Clone)]
pub struct RegistrationError {
    pub reason: String,
}

impl RegistrationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to register packet listener: {}", self.reason)
    }
}

impl std::error::Error for RegistrationError {}

/// Listener that forwards observed byte lengths into a shared aggregator.
///
/// Holds its own handle to the aggregator; the counters themselves are
/// never exposed across the hook boundary.
pub struct StatsPacketListener {
    aggregator: NetworkStatsAggregator,
}

impl StatsPacketListener {
    pub fn new(aggregator: NetworkStatsAggregator) -> Self {
        Self { aggregator }
    }
}

impl PacketListener for StatsPacketListener {
    fn on_packet_sent(&self, byte_len: i64) {
        self.aggregator.record_sent(byte_len);
    }

    fn on_packet_received(&self, byte_len: i64) {
        self.aggregator.record_received(byte_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_forwards_to_aggregator() {
        let aggregator = NetworkStatsAggregator::new();
        let listener = StatsPacketListener::new(aggregator.clone());

        listener.on_packet_sent(100);
        listener.on_packet_received(250);

        let snap = aggregator.snapshot();
        assert_eq!(snap.lifetime.bytes_sent, 100);
        assert_eq!(snap.lifetime.bytes_received, 250);
        assert_eq!(snap.lifetime.packets_sent, 1);
        assert_eq!(snap.lifetime.packets_received, 1);
    }

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::new("facility unavailable");
        assert_eq!(
            err.to_string(),
            "failed to register packet listener: facility unavailable"
        );
    }
}
