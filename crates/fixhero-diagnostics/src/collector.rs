//! Diagnostics collector: the shared error-context store
//!
//! One collector instance exists per capture session. The instrumentation
//! side appends, issue assembly reads the newest entries; both hold the same
//! cheap-clone handle.

use fixhero_core::config::DiagnosticsConfig;
use fixhero_core::{ConsoleErrorRecord, NetworkErrorRecord};
use regex::Regex;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

use crate::ring::RingBuffer;

struct Buffers {
    console: RingBuffer<ConsoleErrorRecord>,
    network: RingBuffer<NetworkErrorRecord>,
}

/// Bounded buffers of recent console/network errors
///
/// Clones share the same underlying buffers. Appends and reads take a short
/// lock; the worst interleaving with a concurrent append means a snapshot
/// read misses the very newest entry, matching the append-only semantics the
/// capture flow assumes.
#[derive(Clone)]
pub struct DiagnosticsCollector {
    inner: Arc<Mutex<Buffers>>,
}

impl DiagnosticsCollector {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self::with_capacity(config.console_capacity, config.network_capacity)
    }

    pub fn with_capacity(console_capacity: usize, network_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Buffers {
                console: RingBuffer::new(console_capacity),
                network: RingBuffer::new(network_capacity),
            })),
        }
    }

    pub fn record_console(&self, record: ConsoleErrorRecord) {
        debug!("console error buffered: {}", record.message);
        self.lock().console.push(record);
    }

    pub fn record_network(&self, record: NetworkErrorRecord) {
        debug!(
            "network error buffered: {} {} -> {}",
            record.method, record.url, record.status
        );
        self.lock().network.push(record);
    }

    /// The newest `n` console errors, oldest of them first
    pub fn recent_console(&self, n: usize) -> Vec<ConsoleErrorRecord> {
        self.lock().console.last_n(n)
    }

    /// The newest `n` network errors, oldest of them first
    pub fn recent_network(&self, n: usize) -> Vec<NetworkErrorRecord> {
        self.lock().network.last_n(n)
    }

    pub fn console_len(&self) -> usize {
        self.lock().console.len()
    }

    pub fn network_len(&self) -> usize {
        self.lock().network.len()
    }

    /// Drop all buffered entries. Called on navigation, since buffered
    /// context from a previous page would mislabel the next capture.
    pub fn clear(&self) {
        let mut buffers = self.lock();
        buffers.console.clear();
        buffers.network.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Buffers> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(&DiagnosticsConfig::default())
    }
}

/// Heuristic line-number extraction from a stack trace string.
///
/// Picks the line component of the first `file:line:col` frame. Returns 0
/// when the stack has no such frame; never errors.
pub fn line_number_from_stack(stack: &str) -> u32 {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    let re = LINE_RE.get_or_init(|| Regex::new(r":(\d+):\d+").expect("valid literal regex"));

    re.captures(stack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
