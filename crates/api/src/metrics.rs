use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Default)]
pub struct Metrics {
    // Store mutations
    successful_mutations: AtomicUsize,
    failed_mutations: AtomicUsize,

    // Suggestions
    suggestion_requests: AtomicUsize,
    suggestions_served: AtomicUsize,
    total_suggest_time_us: AtomicU64,

    // Bootstrap
    bootstrap_runs: AtomicUsize,
    documents_bootstrapped: AtomicUsize,
    total_bootstrap_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mutation(&self, success: bool) {
        if success {
            self.successful_mutations.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_mutations.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a mutation outcome and pass the result through.
    pub fn track<T, E>(&self, result: Result<T, E>) -> Result<T, E> {
        self.record_mutation(result.is_ok());
        result
    }

    pub fn record_suggest(&self, duration: Duration, candidates: usize) {
        self.suggestion_requests.fetch_add(1, Ordering::Relaxed);
        self.suggestions_served.fetch_add(candidates, Ordering::Relaxed);
        self.total_suggest_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_bootstrap(&self, duration: Duration, documents: usize) {
        self.bootstrap_runs.fetch_add(1, Ordering::Relaxed);
        self.documents_bootstrapped.fetch_add(documents, Ordering::Relaxed);
        self.total_bootstrap_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            successful_mutations: self.successful_mutations.load(Ordering::Relaxed),
            failed_mutations: self.failed_mutations.load(Ordering::Relaxed),
            suggestion_requests: self.suggestion_requests.load(Ordering::Relaxed),
            suggestions_served: self.suggestions_served.load(Ordering::Relaxed),
            avg_suggest_time_ms: avg_time_ms(
                &self.total_suggest_time_us,
                &self.suggestion_requests,
            ),
            bootstrap_runs: self.bootstrap_runs.load(Ordering::Relaxed),
            documents_bootstrapped: self.documents_bootstrapped.load(Ordering::Relaxed),
            avg_bootstrap_time_ms: avg_time_ms(
                &self.total_bootstrap_time_us,
                &self.bootstrap_runs,
            ),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    let cnt = count.load(Ordering::Relaxed) as f64;
    if cnt > 0.0 {
        total / cnt / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub successful_mutations: usize,
    pub failed_mutations: usize,
    pub suggestion_requests: usize,
    pub suggestions_served: usize,
    pub avg_suggest_time_ms: f64,
    pub bootstrap_runs: usize,
    pub documents_bootstrapped: usize,
    pub avg_bootstrap_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_averages() {
        let metrics = Metrics::new();
        metrics.record_mutation(true);
        let _ = metrics.track::<(), &str>(Err("bad offsets"));
        metrics.record_suggest(Duration::from_millis(2), 3);
        metrics.record_suggest(Duration::from_millis(4), 1);

        let snap = metrics.snapshot();
        assert_eq!(snap.successful_mutations, 1);
        assert_eq!(snap.failed_mutations, 1);
        assert_eq!(snap.suggestion_requests, 2);
        assert_eq!(snap.suggestions_served, 4);
        assert!((snap.avg_suggest_time_ms - 3.0).abs() < 1e-9);
        assert_eq!(snap.avg_bootstrap_time_ms, 0.0);
    }
}
