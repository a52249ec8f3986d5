//! One-shot signals raised by the UI layer and consumed by the collection loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Edge-triggered flag shared between the raiser and the consumer.
///
/// Clones share state. `take` atomically reads and resets, so one raise is
/// observed exactly once no matter how many times it is raised before.
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    raised: Arc<AtomicBool>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume a pending raise.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// The handles a render boundary may use to influence the loop.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub export: Trigger,
    pub clear_history: Trigger,
    pub stop: Trigger,
}

impl Controls {
    pub fn request_export(&self) {
        self.export.raise();
    }

    pub fn request_clear_history(&self) {
        self.clear_history.raise();
    }

    pub fn request_stop(&self) {
        self.stop.raise();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn take_clears_the_flag() {
        let trigger = Trigger::new();
        assert!(!trigger.take());
        trigger.raise();
        assert!(trigger.is_raised());
        assert!(trigger.take());
        assert!(!trigger.take());
    }

    #[test]
    fn repeated_raises_are_consumed_once() {
        let trigger = Trigger::new();
        trigger.raise();
        trigger.raise();
        assert!(trigger.take());
        assert!(!trigger.is_raised());
    }

    #[test]
    fn clones_share_state_across_threads() {
        let trigger = Trigger::new();
        let remote = trigger.clone();
        thread::spawn(move || remote.raise()).join().unwrap();
        assert!(trigger.take());
    }

    #[test]
    fn concurrent_takers_see_one_raise() {
        let trigger = Trigger::new();
        trigger.raise();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = trigger.clone();
                thread::spawn(move || t.take())
            })
            .collect();
        let hits = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|taken| *taken)
            .count();
        assert_eq!(hits, 1);
    }
}
