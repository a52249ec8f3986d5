//! Process metrics sampling, rolling history and profile.json trace export.

pub mod collector;
pub mod config;
pub mod error;
pub mod exporter;
pub mod history;
pub mod notifier;
pub mod sampler;
pub mod session;
pub mod signal;
pub mod snapshot;

pub use collector::{MetricsSource, Readings};
pub use error::{ConfigError, ExportError, LoopError, SampleError};
pub use history::HistoryBuffer;
pub use sampler::{Sampler, Staleness};
pub use session::{CollectionLoop, ExportOutcome, Frame, Inspector, LoopOptions, LoopState, TickReport};
pub use signal::{Controls, Trigger};
pub use snapshot::{Metric, Snapshot};
