//! Headless driver; Unix signals stand in for the inspector's buttons.

#[cfg(unix)]
use anyhow::Result;
#[cfg(unix)]
use hazel_profiler::{
    collector::{FixedSource, MetricsSource},
    config::{Config, SourceKind},
    notifier,
    session::{CollectionLoop, ExportOutcome, Frame, Inspector, LoopOptions, LoopState},
    Sampler,
};
#[cfg(unix)]
use std::time::Instant;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(unix)]
use tracing::{debug, error, info, warn};
#[cfg(unix)]
use tracing_subscriber::EnvFilter;

/// Headless stand-in for the GUI inspector: logs each new sample.
#[cfg(unix)]
struct LogInspector {
    last_rendered: Option<f64>,
}

#[cfg(unix)]
impl Inspector for LogInspector {
    fn render(&mut self, frame: &Frame<'_>) {
        if frame.history.is_empty() || self.last_rendered == Some(frame.latest.timestamp) {
            return;
        }
        self.last_rendered = Some(frame.latest.timestamp);
        let summary = frame.history.summary();
        info!(
            pid = frame.latest.process_id,
            cpu = %format!("{:.2}%", frame.latest.cpu_usage),
            mem = %format!("{:.2} MB", frame.latest.mem_usage),
            tx = frame.latest.tx_count,
            contract_exec = frame.latest.contract_exec,
            history = summary.count,
            avg_cpu = %format!("{:.2}%", summary.average_cpu),
            peak_mem = %format!("{:.2} MB", summary.peak_memory),
            "sample"
        );
        if !frame.staleness.is_fresh() {
            debug!(stale = ?frame.staleness.metrics(), "showing last-known values");
        }
    }
}

#[cfg(unix)]
fn build_source(config: &Config) -> Box<dyn MetricsSource> {
    match config.sampling.source {
        SourceKind::Fixed => Box::new(FixedSource::placeholder()),
        #[cfg(target_os = "linux")]
        SourceKind::Live => {
            let pid = config.sampling.target_pid.unwrap_or_else(std::process::id);
            Box::new(hazel_profiler::collector::LinuxProcessSource::new(pid))
        }
        #[cfg(not(target_os = "linux"))]
        SourceKind::Live => {
            warn!("live sampling is only available on Linux, using fixed source");
            Box::new(FixedSource::placeholder())
        }
    }
}

#[cfg(unix)]
fn acknowledge(outcome: &ExportOutcome, notify: bool) {
    match outcome {
        ExportOutcome::Completed { path, samples } => {
            info!("{} samples exported to {}", samples, path.display())
        }
        ExportOutcome::Failed { path, error } => {
            error!("Export to {} failed: {}", path.display(), error)
        }
    }
    if notify {
        if let Err(e) = notifier::send_export_notification(outcome) {
            warn!("Failed to send notification: {}", e);
        }
    }
}

#[cfg(unix)]
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = Config::config_path();
    let (config, config_problem) = if config_path.exists() {
        match Config::load(&config_path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e.to_string())),
        }
    } else {
        (Config::default(), None)
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Hazel profiler starting...");
    match config_problem {
        Some(e) => warn!("Failed to load config: {}, using defaults", e),
        None if !config_path.exists() => info!("No config file found, using defaults"),
        None => info!("Loaded config from {:?}", config_path),
    }

    let mut collection = CollectionLoop::new(
        Sampler::new(build_source(&config)),
        LoopOptions::from_config(&config),
    );
    let controls = collection.controls().clone();
    let mut inspector = LogInspector { last_rendered: None };

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut export_signal = signal(SignalKind::user_defined1())?;
    let mut clear_signal = signal(SignalKind::user_defined2())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    info!(
        "Running; SIGUSR1 exports {}, SIGUSR2 clears history, Ctrl-C stops",
        config.export.path.display()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = collection.tick(Instant::now(), &mut inspector);
                if let Some(outcome) = collection.take_export_outcome() {
                    acknowledge(&outcome, config.general.notify_on_export);
                }
                if report.state == LoopState::Stopped {
                    break;
                }
            }
            _ = export_signal.recv() => controls.request_export(),
            _ = clear_signal.recv() => controls.request_clear_history(),
            _ = terminate.recv() => controls.request_stop(),
            _ = interrupt.recv() => controls.request_stop(),
        }
    }

    info!("Stopped after {} samples", collection.sample_count());
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("hazel-profiler is driven by Unix signals and only runs on Unix targets");
    std::process::exit(1);
}
