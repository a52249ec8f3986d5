use super::{MetricsSource, Readings};
use crate::error::SampleError;
use crate::snapshot::Metric;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy)]
struct CpuSample {
    total_ticks: u64, // utime + stime
    timestamp: Instant,
}

struct StatFields {
    total_ticks: u64,
    rss_pages: u64,
}

/// Reads CPU and resident memory of one process from `/proc/<pid>/stat`.
pub struct LinuxProcessSource {
    pid: u32,
    stat_path: PathBuf,
    page_size: u64,
    clock_ticks: u64,
    previous: Option<CpuSample>,
}

impl LinuxProcessSource {
    pub fn new(pid: u32) -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        let clock_ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        Self {
            pid,
            stat_path: PathBuf::from(format!("/proc/{}/stat", pid)),
            page_size: if page_size > 0 { page_size as u64 } else { 4096 },
            clock_ticks: if clock_ticks > 0 { clock_ticks as u64 } else { 100 },
            previous: None,
        }
    }

    /// Observe the calling process.
    pub fn current() -> Self {
        Self::new(std::process::id())
    }

    fn read_stat(&self) -> Result<StatFields, String> {
        let content = fs::read_to_string(&self.stat_path).map_err(|e| e.to_string())?;
        // comm may contain spaces and parens; fields resume after the last ')'
        let rest = content
            .rfind(')')
            .map(|idx| &content[idx + 1..])
            .ok_or_else(|| "malformed stat line".to_string())?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        if parts.len() < 22 {
            return Err(format!("stat has {} fields after comm", parts.len()));
        }
        let field = |idx: usize| -> Result<u64, String> {
            parts[idx]
                .parse()
                .map_err(|_| format!("bad stat field {:?}", parts[idx]))
        };
        let utime = field(11)?;
        let stime = field(12)?;
        let rss_pages = field(21)?;
        Ok(StatFields {
            total_ticks: utime + stime,
            rss_pages,
        })
    }

    fn cpu_percent(&mut self, total_ticks: u64, now: Instant) -> f64 {
        let percent = match self.previous {
            Some(prev) => {
                let tick_delta = total_ticks.saturating_sub(prev.total_ticks);
                let time_delta = now.duration_since(prev.timestamp).as_secs_f64();
                if time_delta > 0.0 {
                    let cpu_seconds = tick_delta as f64 / self.clock_ticks as f64;
                    (cpu_seconds / time_delta) * 100.0
                } else {
                    0.0
                }
            }
            None => 0.0, // no baseline yet
        };
        self.previous = Some(CpuSample {
            total_ticks,
            timestamp: now,
        });
        percent
    }
}

impl Default for LinuxProcessSource {
    fn default() -> Self {
        Self::current()
    }
}

impl MetricsSource for LinuxProcessSource {
    fn process_id(&self) -> u32 {
        self.pid
    }

    fn read(&mut self) -> Readings {
        let unsupported = |metric| Err(SampleError::Unsupported { metric });
        match self.read_stat() {
            Ok(stat) => {
                let cpu = self.cpu_percent(stat.total_ticks, Instant::now());
                let memory_mb = (stat.rss_pages * self.page_size) as f64 / (1024.0 * 1024.0);
                Readings {
                    cpu_usage: Ok(cpu),
                    mem_usage: Ok(memory_mb),
                    tx_count: unsupported(Metric::TxCount),
                    contract_exec: unsupported(Metric::ContractExec),
                }
            }
            Err(reason) => Readings {
                cpu_usage: Err(SampleError::unreadable(Metric::CpuUsage, reason.clone())),
                mem_usage: Err(SampleError::unreadable(Metric::MemUsage, reason)),
                tx_count: unsupported(Metric::TxCount),
                contract_exec: unsupported(Metric::ContractExec),
            },
        }
    }
}
