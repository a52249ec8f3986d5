//! Collection loop: sampling cadence, history feeding and on-demand export

use crate::collector::MetricsSource;
use crate::config::Config;
use crate::error::LoopError;
use crate::exporter;
use crate::history::HistoryBuffer;
use crate::sampler::{Sampler, Staleness};
use crate::signal::Controls;
use crate::snapshot::{unix_now, Snapshot};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub interval: Duration,
    pub history_capacity: usize,
    pub export_path: PathBuf,
}

impl LoopOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.sample_interval(),
            history_capacity: config.history.capacity,
            export_path: config.export.path.clone(),
        }
    }
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of one export attempt, handed back for the UI to acknowledge.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Completed { path: PathBuf, samples: usize },
    Failed { path: PathBuf, error: String },
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Completed { .. })
    }
}

/// What the render boundary sees on each tick.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Latest snapshot taken, or the zeroed default before the first sample.
    pub latest: &'a Snapshot,
    pub history: &'a HistoryBuffer,
    pub staleness: &'a Staleness,
    pub last_export: Option<&'a ExportOutcome>,
    pub controls: &'a Controls,
}

/// Render boundary implemented by the UI layer. It may only influence the
/// loop through the triggers in [`Frame::controls`].
pub trait Inspector {
    fn render(&mut self, frame: &Frame<'_>);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub state: LoopState,
    pub sampled: bool,
    pub history_cleared: bool,
    pub export: Option<ExportOutcome>,
}

impl TickReport {
    fn stopped() -> Self {
        Self {
            state: LoopState::Stopped,
            sampled: false,
            history_cleared: false,
            export: None,
        }
    }
}

struct Epoch {
    instant: Instant,
    wall: f64,
}

pub struct CollectionLoop<S> {
    sampler: Sampler<S>,
    options: LoopOptions,
    state: LoopState,
    epoch: Option<Epoch>,
    last_sample_at: Option<Instant>,
    latest: Snapshot,
    history: HistoryBuffer,
    trace: Vec<Snapshot>,
    controls: Controls,
    last_export: Option<ExportOutcome>,
    unacknowledged: Option<ExportOutcome>,
}

impl<S: MetricsSource> CollectionLoop<S> {
    pub fn new(sampler: Sampler<S>, options: LoopOptions) -> Self {
        let history = HistoryBuffer::new(options.history_capacity);
        Self {
            sampler,
            options,
            state: LoopState::Idle,
            epoch: None,
            last_sample_at: None,
            latest: Snapshot::default(),
            history,
            trace: Vec::new(),
            controls: Controls::default(),
            last_export: None,
            unacknowledged: None,
        }
    }

    pub fn start(&mut self, now: Instant) -> Result<(), LoopError> {
        if self.state != LoopState::Idle {
            return Err(LoopError::InvalidTransition {
                from: self.state,
                to: LoopState::Running,
            });
        }
        self.begin(now);
        Ok(())
    }

    fn begin(&mut self, now: Instant) {
        self.epoch = Some(Epoch {
            instant: now,
            wall: unix_now(),
        });
        self.state = LoopState::Running;
        info!(
            pid = self.sampler.process_id(),
            interval_ms = self.options.interval.as_millis() as u64,
            "collection loop started"
        );
    }

    /// Drive one iteration of the external render/message cycle.
    pub fn tick<I: Inspector + ?Sized>(&mut self, now: Instant, inspector: &mut I) -> TickReport {
        if self.state == LoopState::Stopped || self.stop_requested() {
            return TickReport::stopped();
        }
        if self.state == LoopState::Idle {
            self.begin(now);
        }

        let sampled = self.sample_if_due(now);

        let frame = Frame {
            latest: &self.latest,
            history: &self.history,
            staleness: self.sampler.staleness(),
            last_export: self.last_export.as_ref(),
            controls: &self.controls,
        };
        inspector.render(&frame);

        // a stop raised during render abandons this tick's pending requests
        if self.stop_requested() {
            return TickReport {
                sampled,
                ..TickReport::stopped()
            };
        }

        let history_cleared = self.controls.clear_history.take();
        if history_cleared {
            self.history.clear();
            debug!("history cleared");
        }

        let export = if self.controls.export.take() {
            Some(self.export_trace())
        } else {
            None
        };

        TickReport {
            state: self.state,
            sampled,
            history_cleared,
            export,
        }
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            info!(samples = self.trace.len(), "collection loop stopped");
        }
    }

    fn stop_requested(&mut self) -> bool {
        if self.controls.stop.take() {
            self.stop();
        }
        self.state == LoopState::Stopped
    }

    fn sample_if_due(&mut self, now: Instant) -> bool {
        let due = match self.last_sample_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.options.interval,
        };
        if !due {
            return false;
        }

        let timestamp = match &self.epoch {
            Some(epoch) => epoch.wall + now.saturating_duration_since(epoch.instant).as_secs_f64(),
            None => unix_now(),
        };
        let snapshot = self.sampler.collect_at(timestamp);
        self.history.append(snapshot);
        self.trace.push(snapshot);
        self.latest = snapshot;
        self.last_sample_at = Some(now);
        true
    }

    fn export_trace(&mut self) -> ExportOutcome {
        let path = self.options.export_path.clone();
        let outcome = match exporter::export(&self.trace, &path) {
            Ok(()) => ExportOutcome::Completed {
                path,
                samples: self.trace.len(),
            },
            Err(e) => {
                warn!(error = %e, "export failed, sampling continues");
                ExportOutcome::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        };
        self.last_export = Some(outcome.clone());
        self.unacknowledged = Some(outcome.clone());
        outcome
    }

    /// One-shot export acknowledgement: returns the newest outcome not yet
    /// taken.
    pub fn take_export_outcome(&mut self) -> Option<ExportOutcome> {
        self.unacknowledged.take()
    }

    pub fn last_export(&self) -> Option<&ExportOutcome> {
        self.last_export.as_ref()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Every snapshot taken since the loop started.
    pub fn trace(&self) -> &[Snapshot] {
        &self.trace
    }

    /// Latest snapshot taken, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.trace.last()
    }

    pub fn staleness(&self) -> &Staleness {
        self.sampler.staleness()
    }

    /// Handles for the UI layer; clones share state with the loop.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn sample_count(&self) -> usize {
        self.trace.len()
    }

    pub fn options(&self) -> &LoopOptions {
        &self.options
    }
}
