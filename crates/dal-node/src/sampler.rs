use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::error::{NodeError, NodeResult};

/// Data-availability sampler as seen by node startup.
pub trait DataAvailabilitySampler: Send + Sync {
    /// Register the sampler's metrics. Fails if called twice.
    fn init_metrics(&self) -> NodeResult<()>;

    fn metrics_enabled(&self) -> bool;
}

/// Counters exported by [`DaSampler`] once metrics are initialized.
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    sampled_headers: AtomicU64,
    sampled_shares: AtomicU64,
    head_height: AtomicU64,
}

/// Point-in-time copy of [`SamplerMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub sampled_headers: u64,
    pub sampled_shares: u64,
    pub head_height: u64,
}

impl SamplerMetrics {
    fn record(&self, height: u64, shares: usize) {
        self.sampled_headers.fetch_add(1, Ordering::Relaxed);
        self.sampled_shares.fetch_add(shares as u64, Ordering::Relaxed);
        self.head_height.fetch_max(height, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SamplerStats {
        SamplerStats {
            sampled_headers: self.sampled_headers.load(Ordering::Relaxed),
            sampled_shares: self.sampled_shares.load(Ordering::Relaxed),
            head_height: self.head_height.load(Ordering::Relaxed),
        }
    }
}

/// Default sampler. Metrics stay disabled until [`init_metrics`] runs.
///
/// [`init_metrics`]: DataAvailabilitySampler::init_metrics
#[derive(Debug)]
pub struct DaSampler {
    concurrency: usize,
    metrics: OnceLock<SamplerMetrics>,
}

impl DaSampler {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            metrics: OnceLock::new(),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Record that `shares` shares of the header at `height` were sampled.
    pub fn record_sample(&self, height: u64, shares: usize) {
        debug!(height, shares, "sampled header");
        if let Some(metrics) = self.metrics.get() {
            metrics.record(height, shares);
        }
    }

    /// Current counters, or `None` when metrics are disabled.
    pub fn stats(&self) -> Option<SamplerStats> {
        self.metrics.get().map(SamplerMetrics::snapshot)
    }
}

impl DataAvailabilitySampler for DaSampler {
    fn init_metrics(&self) -> NodeResult<()> {
        self.metrics
            .set(SamplerMetrics::default())
            .map_err(|_| NodeError::MetricsAlreadyInitialized)?;
        info!(concurrency = self.concurrency, "sampler metrics initialized");
        Ok(())
    }

    fn metrics_enabled(&self) -> bool {
        self.metrics.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_not_counted_before_init() {
        let sampler = DaSampler::new(4);
        sampler.record_sample(10, 16);
        assert!(!sampler.metrics_enabled());
        assert_eq!(sampler.stats(), None);
    }

    #[test]
    fn init_metrics_enables_counters() {
        let sampler = DaSampler::new(4);
        sampler.init_metrics().unwrap();
        sampler.record_sample(10, 16);
        sampler.record_sample(8, 4);
        assert_eq!(
            sampler.stats(),
            Some(SamplerStats {
                sampled_headers: 2,
                sampled_shares: 20,
                head_height: 10,
            })
        );
    }

    #[test]
    fn init_metrics_twice_fails() {
        let sampler = DaSampler::new(1);
        sampler.init_metrics().unwrap();
        assert!(matches!(
            sampler.init_metrics(),
            Err(NodeError::MetricsAlreadyInitialized)
        ));
    }
}
