//! Traffic counters for a session
//!
//! Thread-safe, lock-free. Shared between the session task, the
//! dispatch path and every `SessionHandle` clone.

use std::sync::atomic::{AtomicU64, Ordering};

/// Session traffic statistics
pub struct Stats {
    /// Bytes handed to the socket (client -> device)
    tx_total: AtomicU64,
    /// Bytes received in binary frames (device -> client)
    rx_total: AtomicU64,
    /// Inbound frames with no handler, an unknown tag, or a failing handler
    dropped_frames: AtomicU64,
    /// Sends refused because the channel was not open
    dropped_sends: AtomicU64,
    /// Reconnect attempts started
    reconnects: AtomicU64,
}

/// Point-in-time copy of `Stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub dropped_frames: u64,
    pub dropped_sends: u64,
    pub reconnects: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            tx_total: AtomicU64::new(0),
            rx_total: AtomicU64::new(0),
            dropped_frames: AtomicU64::new(0),
            dropped_sends: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn add_tx(&self, bytes: usize) {
        self.tx_total.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_rx(&self, bytes: usize) {
        self.rx_total.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_dropped_frame(&self) {
        self.dropped_frames.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_dropped_send(&self) {
        self.dropped_sends.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn tx_bytes(&self) -> u64 {
        self.tx_total.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rx_bytes(&self) -> u64 {
        self.rx_total.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tx_bytes: self.tx_bytes(),
            rx_bytes: self.rx_bytes(),
            dropped_frames: self.dropped_frames.load(Ordering::Relaxed),
            dropped_sends: self.dropped_sends.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_accumulate() {
        let stats = Stats::new();
        stats.add_tx(9);
        stats.add_tx(2);
        stats.add_rx(130);
        stats.add_dropped_frame();
        stats.add_dropped_send();
        stats.add_dropped_send();
        stats.add_reconnect();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                tx_bytes: 11,
                rx_bytes: 130,
                dropped_frames: 1,
                dropped_sends: 2,
                reconnects: 1,
            }
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let stats = Arc::new(Stats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.add_rx(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.rx_bytes(), 400);
    }
}
