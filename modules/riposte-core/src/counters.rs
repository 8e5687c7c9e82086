use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Counts how often each pipeline stage fell back to its degraded value.
/// The fallbacks keep the bot replying through provider outages; these
/// counters are what makes those outages visible to operators.
/// Thread-safe via atomic operations.
#[derive(Debug, Default)]
pub struct FallbackCounters {
    embed_failures: AtomicU64,
    retrieval_failures: AtomicU64,
    generation_failures: AtomicU64,
    apologies: AtomicU64,
}

impl FallbackCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_embed_failure(&self) {
        self.embed_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retrieval_failure(&self) {
        self.retrieval_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_failure(&self) {
        self.generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_apology(&self) {
        self.apologies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn embed_failures(&self) -> u64 {
        self.embed_failures.load(Ordering::Relaxed)
    }

    pub fn retrieval_failures(&self) -> u64 {
        self.retrieval_failures.load(Ordering::Relaxed)
    }

    pub fn generation_failures(&self) -> u64 {
        self.generation_failures.load(Ordering::Relaxed)
    }

    pub fn apologies(&self) -> u64 {
        self.apologies.load(Ordering::Relaxed)
    }

    /// Log current counts.
    pub fn log_status(&self) {
        info!(
            embed_failures = self.embed_failures(),
            retrieval_failures = self.retrieval_failures(),
            generation_failures = self.generation_failures(),
            apologies = self.apologies(),
            "Fallback counters"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_stage() {
        let counters = FallbackCounters::new();
        counters.record_embed_failure();
        counters.record_embed_failure();
        counters.record_generation_failure();

        assert_eq!(counters.embed_failures(), 2);
        assert_eq!(counters.generation_failures(), 1);
        assert_eq!(counters.retrieval_failures(), 0);
    }
}
