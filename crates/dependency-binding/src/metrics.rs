//! Metrics hooks for binding operations
//!
//! Counts accepted and rejected provisioning, callback traffic and resets.
//!
//! ## Usage
//!
//! ```ignore
//! use dependency_binding::{BindingMetrics, DependencyBinding};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(BindingMetrics::new());
//! let binding = DependencyBinding::builder("renderer", expected, catalog)
//!     .metrics(metrics.clone())
//!     .build();
//!
//! binding.provide(renderer);
//! assert_eq!(metrics.snapshot().provides_accepted, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for binding activity.
#[derive(Debug, Default)]
pub struct BindingMetrics {
    /// Successful provisions
    pub provides_accepted: AtomicU64,
    /// Provisions rejected because the slot was bound
    pub provides_duplicate: AtomicU64,
    /// Provisions rejected on type conformance
    pub provides_mismatched: AtomicU64,
    /// Null callbacks rejected
    pub null_callbacks: AtomicU64,
    /// Callbacks accepted (queued or run immediately)
    pub callbacks_registered: AtomicU64,
    /// Callbacks invoked with a value
    pub callbacks_invoked: AtomicU64,
    /// Callbacks dropped by a reset before invocation
    pub callbacks_dropped: AtomicU64,
    /// Resets applied
    pub resets: AtomicU64,
}

impl BindingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            provides_accepted: self.provides_accepted.load(Ordering::Relaxed),
            provides_duplicate: self.provides_duplicate.load(Ordering::Relaxed),
            provides_mismatched: self.provides_mismatched.load(Ordering::Relaxed),
            null_callbacks: self.null_callbacks.load(Ordering::Relaxed),
            callbacks_registered: self.callbacks_registered.load(Ordering::Relaxed),
            callbacks_invoked: self.callbacks_invoked.load(Ordering::Relaxed),
            callbacks_dropped: self.callbacks_dropped.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }

    /// Total rejected operations of any kind.
    pub fn rejections(&self) -> u64 {
        self.provides_duplicate.load(Ordering::Relaxed)
            + self.provides_mismatched.load(Ordering::Relaxed)
            + self.null_callbacks.load(Ordering::Relaxed)
    }

    /// Reset all counters
    pub fn clear(&self) {
        self.provides_accepted.store(0, Ordering::Relaxed);
        self.provides_duplicate.store(0, Ordering::Relaxed);
        self.provides_mismatched.store(0, Ordering::Relaxed);
        self.null_callbacks.store(0, Ordering::Relaxed);
        self.callbacks_registered.store(0, Ordering::Relaxed);
        self.callbacks_invoked.store(0, Ordering::Relaxed);
        self.callbacks_dropped.store(0, Ordering::Relaxed);
        self.resets.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub provides_accepted: u64,
    pub provides_duplicate: u64,
    pub provides_mismatched: u64,
    pub null_callbacks: u64,
    pub callbacks_registered: u64,
    pub callbacks_invoked: u64,
    pub callbacks_dropped: u64,
    pub resets: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward binding activity to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_provide_accepted(&self);

    fn record_provide_duplicate(&self);

    fn record_provide_mismatched(&self);

    fn record_null_callback(&self);

    fn record_callback_registered(&self);

    /// Record `count` callbacks invoked
    fn record_callbacks_invoked(&self, count: u64);

    fn record_reset(&self);

    /// Record `count` callbacks discarded without invocation
    fn record_callbacks_dropped(&self, count: u64);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_provide_accepted(&self) {}
    fn record_provide_duplicate(&self) {}
    fn record_provide_mismatched(&self) {}
    fn record_null_callback(&self) {}
    fn record_callback_registered(&self) {}
    fn record_callbacks_invoked(&self, _: u64) {}
    fn record_reset(&self) {}
    fn record_callbacks_dropped(&self, _: u64) {}
}

impl MetricsRecorder for BindingMetrics {
    fn record_provide_accepted(&self) {
        self.provides_accepted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_provide_duplicate(&self) {
        self.provides_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    fn record_provide_mismatched(&self) {
        self.provides_mismatched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_null_callback(&self) {
        self.null_callbacks.fetch_add(1, Ordering::Relaxed);
    }

    fn record_callback_registered(&self) {
        self.callbacks_registered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_callbacks_invoked(&self, count: u64) {
        self.callbacks_invoked.fetch_add(count, Ordering::Relaxed);
    }

    fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    fn record_callbacks_dropped(&self, count: u64) {
        self.callbacks_dropped.fetch_add(count, Ordering::Relaxed);
    }
}
