//! Metrics sources for the observed process

mod fixed;
#[cfg(target_os = "linux")]
mod linux;

pub use fixed::{FixedSource, ScriptedSource};
#[cfg(target_os = "linux")]
pub use linux::LinuxProcessSource;

use crate::error::SampleError;
use crate::snapshot::Metric;

/// One raw read of every counter. Each field fails independently so a
/// single unreadable counter does not cost the whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub cpu_usage: Result<f64, SampleError>,
    pub mem_usage: Result<f64, SampleError>,
    pub tx_count: Result<u64, SampleError>,
    pub contract_exec: Result<u64, SampleError>,
}

impl Readings {
    pub fn new(cpu_usage: f64, mem_usage: f64, tx_count: u64, contract_exec: u64) -> Self {
        Self {
            cpu_usage: Ok(cpu_usage),
            mem_usage: Ok(mem_usage),
            tx_count: Ok(tx_count),
            contract_exec: Ok(contract_exec),
        }
    }

    /// Every counter failed for the same reason (e.g. the process is gone).
    pub fn unreadable(reason: &str) -> Self {
        Self {
            cpu_usage: Err(SampleError::unreadable(Metric::CpuUsage, reason)),
            mem_usage: Err(SampleError::unreadable(Metric::MemUsage, reason)),
            tx_count: Err(SampleError::unreadable(Metric::TxCount, reason)),
            contract_exec: Err(SampleError::unreadable(Metric::ContractExec, reason)),
        }
    }
}

/// Capability that reads the current metrics of one process.
pub trait MetricsSource: Send {
    /// Identifier of the observed process; constant for the source's lifetime.
    fn process_id(&self) -> u32;

    /// Read every counter once. Must not block on anything slower than
    /// local procfs-style reads.
    fn read(&mut self) -> Readings;
}

impl<S: MetricsSource + ?Sized> MetricsSource for Box<S> {
    fn process_id(&self) -> u32 {
        (**self).process_id()
    }

    fn read(&mut self) -> Readings {
        (**self).read()
    }
}
