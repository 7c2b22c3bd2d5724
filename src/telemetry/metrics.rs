//! Metrics collection for intercepted MQTT operations.
//!
//! Provides in-memory metrics tracking with histograms for latency distribution.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Latency samples kept per operation when no limit is given
pub const DEFAULT_SAMPLE_LIMIT: usize = 10_000;

/// Metrics for one tracer.
pub struct Metrics {
    calls: Mutex<HashMap<String, CallMetrics>>,
    exceptions: AtomicU64,
    sample_limit: usize,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self::with_sample_limit(DEFAULT_SAMPLE_LIMIT)
    }

    /// Create a metrics instance keeping at most `limit` latency samples
    /// per operation.
    pub fn with_sample_limit(limit: usize) -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            exceptions: AtomicU64::new(0),
            sample_limit: limit,
        }
    }

    fn entry<'a>(
        &self,
        calls: &'a mut HashMap<String, CallMetrics>,
        operation: &str,
    ) -> &'a mut CallMetrics {
        calls
            .entry(operation.to_string())
            .or_insert_with(|| CallMetrics::with_sample_limit(self.sample_limit))
    }

    fn calls(&self) -> MutexGuard<'_, HashMap<String, CallMetrics>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a completed call.
    pub fn record_call(&self, operation: &str, duration: Duration, success: bool) {
        let mut calls = self.calls();
        self.entry(&mut calls, operation).record(duration, success);
    }

    /// Record a call whose callback was dropped without firing.
    pub fn record_abandoned(&self, operation: &str) {
        let mut calls = self.calls();
        self.entry(&mut calls, operation).abandoned += 1;
    }

    /// Record a call that did not complete before the settle timeout.
    pub fn record_timeout(&self, operation: &str) {
        let mut calls = self.calls();
        self.entry(&mut calls, operation).timed_out += 1;
    }

    /// Record an instrumentation failure.
    pub fn record_exception(&self) {
        self.exceptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: self.calls().clone(),
            exceptions: self.exceptions.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.calls().clear();
        self.exceptions.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics for one kind of operation.
#[derive(Debug, Clone)]
pub struct CallMetrics {
    pub invocations: u64,
    pub successes: u64,
    pub failures: u64,
    pub abandoned: u64,
    pub timed_out: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub histogram: Histogram,
}

impl CallMetrics {
    /// Create new call metrics.
    pub fn new() -> Self {
        Self::with_sample_limit(DEFAULT_SAMPLE_LIMIT)
    }

    pub fn with_sample_limit(limit: usize) -> Self {
        Self {
            invocations: 0,
            successes: 0,
            failures: 0,
            abandoned: 0,
            timed_out: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::with_capacity(limit),
        }
    }

    /// Record a completed call.
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.invocations += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Get average duration of completed calls.
    pub fn avg_duration(&self) -> Duration {
        if self.invocations == 0 {
            Duration::ZERO
        } else {
            let nanos = self.total_duration.as_nanos() / u128::from(self.invocations);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }

    /// Get success rate of completed calls as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.invocations == 0 {
            100.0
        } else {
            (self.successes as f64 / self.invocations as f64) * 100.0
        }
    }
}

impl Default for CallMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency histogram over the most recent samples.
#[derive(Debug, Clone)]
pub struct Histogram {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_LIMIT)
    }

    /// Keep at most `capacity` samples, evicting the oldest.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(duration);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn p50(&self) -> Option<Duration> {
        self.percentile(50)
    }

    pub fn p99(&self) -> Option<Duration> {
        self.percentile(99)
    }

    /// Get the specified percentile (nearest rank).
    pub fn percentile(&self, p: u8) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort();

        let index = (p as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[index.min(sorted.len() - 1)])
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of all metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub calls: HashMap<String, CallMetrics>,
    pub exceptions: u64,
}

impl MetricsSnapshot {
    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== MQTT Trace Metrics ===\n\n");

        let mut names: Vec<&String> = self.calls.keys().collect();
        names.sort();
        for name in names {
            let metrics = &self.calls[name];
            report.push_str(&format!(
                "  {}: {} calls, {:.1}% success, {} abandoned, {} timed out, avg {:.2}ms\n",
                name,
                metrics.invocations,
                metrics.success_rate(),
                metrics.abandoned,
                metrics.timed_out,
                metrics.avg_duration().as_secs_f64() * 1000.0
            ));
        }

        if self.exceptions > 0 {
            report.push_str(&format!(
                "\nInstrumentation exceptions: {}\n",
                self.exceptions
            ));
        }

        report
    }
}
