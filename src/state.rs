use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::configuration::Settings;
use crate::workflow::Workflow;

/// Count of requests served under `/app`
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicU64>);

impl HitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Everything the request handlers share
pub struct AppState {
    pub workflow: Arc<Workflow>,
    pub hits: HitCounter,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_counter_shared_between_clones() {
        let hits = HitCounter::default();
        let other = hits.clone();

        hits.increment();
        other.increment();
        assert_eq!(hits.get(), 2);

        other.reset();
        assert_eq!(hits.get(), 0);
    }
}
