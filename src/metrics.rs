use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Prometheus-style counters for observability
/// All metrics are atomic for thread-safety
#[derive(Clone, Default)]
pub struct Metrics {
    /// Plan generation calls that produced a plan
    pub generation_success_count: Arc<AtomicU64>,
    /// Plan generation calls that surfaced an error
    pub generation_failure_count: Arc<AtomicU64>,
    /// Explanation requests answered from the cached record
    pub explanation_cache_hit_count: Arc<AtomicU64>,
    /// Explanation requests that went out to the model
    pub explanation_fetch_count: Arc<AtomicU64>,
    /// Explanation fetches that fell back to the error string
    pub explanation_fallback_count: Arc<AtomicU64>,
    /// Keyed mutations rejected with a not-found error
    pub lookup_miss_count: Arc<AtomicU64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generation_success(&self) {
        self.generation_success_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_failure(&self) {
        self.generation_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_explanation_cache_hit(&self) {
        self.explanation_cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_explanation_fetch(&self) {
        self.explanation_fetch_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_explanation_fallback(&self) {
        self.explanation_fallback_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_miss(&self) {
        self.lookup_miss_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn explanation_cache_hits(&self) -> u64 {
        self.explanation_cache_hit_count.load(Ordering::Relaxed)
    }

    pub fn explanation_fetches(&self) -> u64 {
        self.explanation_fetch_count.load(Ordering::Relaxed)
    }

    pub fn explanation_fallbacks(&self) -> u64 {
        self.explanation_fallback_count.load(Ordering::Relaxed)
    }

    pub fn lookup_misses(&self) -> u64 {
        self.lookup_miss_count.load(Ordering::Relaxed)
    }
}
