use super::{MetricsSource, Readings};
use std::collections::VecDeque;

/// Source that returns the same readings on every call.
#[derive(Debug, Clone)]
pub struct FixedSource {
    pid: u32,
    readings: Readings,
}

impl FixedSource {
    pub fn new(pid: u32, readings: Readings) -> Self {
        Self { pid, readings }
    }

    /// The placeholder values used before a live source is wired in.
    pub fn placeholder() -> Self {
        Self::new(1234, Readings::new(10.5, 256.0, 100, 8))
    }
}

impl Default for FixedSource {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl MetricsSource for FixedSource {
    fn process_id(&self) -> u32 {
        self.pid
    }

    fn read(&mut self) -> Readings {
        self.readings.clone()
    }
}

/// Source that replays a prepared sequence of readings, then keeps
/// repeating the last one.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pid: u32,
    script: VecDeque<Readings>,
    last: Readings,
}

impl ScriptedSource {
    pub fn new(pid: u32, script: impl IntoIterator<Item = Readings>) -> Self {
        Self {
            pid,
            script: script.into_iter().collect(),
            last: Readings::new(0.0, 0.0, 0, 0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl MetricsSource for ScriptedSource {
    fn process_id(&self) -> u32 {
        self.pid
    }

    fn read(&mut self) -> Readings {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }
}
