//! Human-readable formatting for byte counts and rates, for display layers
//! rendering snapshots.
use std::time::Duration;

const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Formats a byte count with a binary-prefixed unit, e.g. `1.50 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Formats a byte count observed over `window` as a per-second rate,
/// e.g. `2.00 MiB/s`. A zero-length window yields a zero rate.
pub fn format_rate(bytes: u64, window: Duration) -> String {
    let secs = window.as_secs_f64();
    if secs <= 0.0 {
        return "0 B/s".to_string();
    }
    let per_second = (bytes as f64 / secs).round() as u64;
    format!("{}/s", format_bytes(per_second))
}
