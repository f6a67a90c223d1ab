use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::types::CompressionPass;

/// Process-local metrics for scan runs.
///
/// Cheap to clone; every clone records into the same counters.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    // API Metrics
    api_calls_total: AtomicUsize,
    api_calls_success: AtomicUsize,
    api_calls_failed: AtomicUsize,
    api_tokens_input: AtomicU64,
    api_tokens_output: AtomicU64,
    api_latency_ms: RwLock<Vec<u64>>,

    // Optimizer Metrics
    first_pass_payloads: AtomicUsize,
    second_pass_payloads: AtomicUsize,
    payload_bytes: AtomicU64,

    // Pipeline Metrics
    runs_completed: AtomicUsize,
    runs_failed: AtomicUsize,
    runs_rejected: AtomicUsize,
    run_duration_ms: RwLock<Vec<u64>>,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                api_calls_total: AtomicUsize::new(0),
                api_calls_success: AtomicUsize::new(0),
                api_calls_failed: AtomicUsize::new(0),
                api_tokens_input: AtomicU64::new(0),
                api_tokens_output: AtomicU64::new(0),
                api_latency_ms: RwLock::new(Vec::new()),
                first_pass_payloads: AtomicUsize::new(0),
                second_pass_payloads: AtomicUsize::new(0),
                payload_bytes: AtomicU64::new(0),
                runs_completed: AtomicUsize::new(0),
                runs_failed: AtomicUsize::new(0),
                runs_rejected: AtomicUsize::new(0),
                run_duration_ms: RwLock::new(Vec::new()),
                start_time: Instant::now(),
            }),
        }
    }

    // API Metrics
    pub fn record_api_call(&self, success: bool, duration: Duration, input_tokens: u64, output_tokens: u64) {
        self.inner.api_calls_total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.inner.api_calls_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.api_calls_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.api_tokens_input.fetch_add(input_tokens, Ordering::Relaxed);
        self.inner.api_tokens_output.fetch_add(output_tokens, Ordering::Relaxed);
        self.inner.api_latency_ms.write().push(duration.as_millis() as u64);
    }

    // Optimizer Metrics
    pub fn record_payload(&self, pass: CompressionPass, approx_bytes: usize) {
        match pass {
            CompressionPass::First => self.inner.first_pass_payloads.fetch_add(1, Ordering::Relaxed),
            CompressionPass::Second => self.inner.second_pass_payloads.fetch_add(1, Ordering::Relaxed),
        };
        self.inner.payload_bytes.fetch_add(approx_bytes as u64, Ordering::Relaxed);
    }

    // Pipeline Metrics
    pub fn record_run(&self, success: bool, duration: Duration) {
        if success {
            self.inner.runs_completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.runs_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.run_duration_ms.write().push(duration.as_millis() as u64);
    }

    pub fn record_run_rejected(&self) {
        self.inner.runs_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let api_latency = self.inner.api_latency_ms.read();
        let api_latency_avg_ms = avg(&api_latency);
        let api_latency_p95_ms = percentile(&api_latency, 0.95);
        drop(api_latency);

        let run_durations = self.inner.run_duration_ms.read();
        let run_avg_ms = avg(&run_durations);
        drop(run_durations);

        MetricsSnapshot {
            api_calls_total: self.inner.api_calls_total.load(Ordering::Relaxed),
            api_calls_success: self.inner.api_calls_success.load(Ordering::Relaxed),
            api_calls_failed: self.inner.api_calls_failed.load(Ordering::Relaxed),
            api_tokens_input: self.inner.api_tokens_input.load(Ordering::Relaxed),
            api_tokens_output: self.inner.api_tokens_output.load(Ordering::Relaxed),
            api_latency_avg_ms,
            api_latency_p95_ms,
            first_pass_payloads: self.inner.first_pass_payloads.load(Ordering::Relaxed),
            second_pass_payloads: self.inner.second_pass_payloads.load(Ordering::Relaxed),
            payload_bytes_total: self.inner.payload_bytes.load(Ordering::Relaxed),
            runs_completed: self.inner.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.inner.runs_failed.load(Ordering::Relaxed),
            runs_rejected: self.inner.runs_rejected.load(Ordering::Relaxed),
            run_avg_ms,
            uptime_seconds: self.inner.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub api_calls_total: usize,
    pub api_calls_success: usize,
    pub api_calls_failed: usize,
    pub api_tokens_input: u64,
    pub api_tokens_output: u64,
    pub api_latency_avg_ms: u64,
    pub api_latency_p95_ms: u64,
    pub first_pass_payloads: usize,
    pub second_pass_payloads: usize,
    pub payload_bytes_total: u64,
    pub runs_completed: usize,
    pub runs_failed: usize,
    pub runs_rejected: usize,
    pub run_avg_ms: u64,
    pub uptime_seconds: u64,
}

fn percentile(values: &[u64], p: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = ((values.len() as f64 - 1.0) * p) as usize;
    sorted[idx]
}

fn avg(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    values.iter().sum::<u64>() / values.len() as u64
}
