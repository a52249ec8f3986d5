//! Metric snapshot record and its trace wire format

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// One timestamped set of metric readings for the observed process.
///
/// Field order and the camelCase names are what trace viewers key off, so
/// they must not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub process_id: u32,
    /// Percent, up to `100 * cores`.
    pub cpu_usage: f64,
    /// Megabytes.
    pub mem_usage: f64,
    pub tx_count: u64,
    pub contract_exec: u64,
}

/// The individual readings a snapshot carries besides its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CpuUsage,
    MemUsage,
    TxCount,
    ContractExec,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuUsage,
        Metric::MemUsage,
        Metric::TxCount,
        Metric::ContractExec,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::CpuUsage => "cpu_usage",
            Metric::MemUsage => "mem_usage",
            Metric::TxCount => "tx_count",
            Metric::ContractExec => "contract_exec",
        };
        f.write_str(name)
    }
}

/// Current wall clock as fractional seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
