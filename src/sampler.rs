//! Turns raw source readings into snapshots

use crate::collector::{MetricsSource, Readings};
use crate::error::SampleError;
use crate::snapshot::{unix_now, Metric, Snapshot};
use tracing::{debug, warn};

/// Metrics whose value in the latest snapshot is a last-known fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staleness {
    metrics: Vec<Metric>,
}

impl Staleness {
    pub fn is_fresh(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn is_stale(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }
}

/// Wraps a [`MetricsSource`], tolerating per-counter failures.
pub struct Sampler<S> {
    source: S,
    last: Option<Snapshot>,
    staleness: Staleness,
}

impl<S: MetricsSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last: None,
            staleness: Staleness::default(),
        }
    }

    pub fn process_id(&self) -> u32 {
        self.source.process_id()
    }

    pub fn collect(&mut self) -> Snapshot {
        self.collect_at(unix_now())
    }

    /// Take one snapshot stamped `timestamp`, clamped so timestamps never go
    /// backwards for this sampler.
    pub fn collect_at(&mut self, timestamp: f64) -> Snapshot {
        let Readings {
            cpu_usage,
            mem_usage,
            tx_count,
            contract_exec,
        } = self.source.read();
        let prev = self.last.unwrap_or_default();
        let mut stale = Vec::new();

        let snapshot = Snapshot {
            timestamp: self.last.map_or(timestamp, |p| timestamp.max(p.timestamp)),
            process_id: self.source.process_id(),
            cpu_usage: resolve(finite(Metric::CpuUsage, cpu_usage), prev.cpu_usage, &mut stale),
            mem_usage: resolve(finite(Metric::MemUsage, mem_usage), prev.mem_usage, &mut stale),
            tx_count: resolve(tx_count, prev.tx_count, &mut stale),
            contract_exec: resolve(contract_exec, prev.contract_exec, &mut stale),
        };

        if !stale.is_empty() {
            warn!(pid = snapshot.process_id, stale = ?stale, "stale sample, using last-known values");
        }
        debug!(
            timestamp = snapshot.timestamp,
            cpu = snapshot.cpu_usage,
            mem_mb = snapshot.mem_usage,
            "sampled"
        );

        self.staleness = Staleness { metrics: stale };
        self.last = Some(snapshot);
        snapshot
    }

    /// Staleness of the most recent snapshot.
    pub fn staleness(&self) -> &Staleness {
        &self.staleness
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }
}

/// NaN and infinities have no JSON number form, so they count as unreadable.
fn finite(metric: Metric, reading: Result<f64, SampleError>) -> Result<f64, SampleError> {
    match reading {
        Ok(value) if !value.is_finite() => Err(SampleError::unreadable(
            metric,
            format!("non-finite value {}", value),
        )),
        other => other,
    }
}

fn resolve<T>(reading: Result<T, SampleError>, fallback: T, stale: &mut Vec<Metric>) -> T {
    match reading {
        Ok(value) => value,
        Err(err) => {
            if err.marks_stale() {
                stale.push(err.metric());
            }
            fallback
        }
    }
}
