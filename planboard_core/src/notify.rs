use tokio::time::{Duration, Instant};

/// User-visible message emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Another client's edits were folded into the local board.
    RemoteChangesApplied,
}

/// Leading-edge coalescer: the first trigger fires, every further trigger
/// inside the suppression window is swallowed. Suppressed triggers do not
/// extend the window.
///
/// Runs on the tokio clock, so a paused test runtime can drive it.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    suppressed_until: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            suppressed_until: None,
        }
    }

    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// True when this trigger should act; false while suppressed.
    pub fn try_fire(&mut self) -> bool {
        let now = Instant::now();
        match self.suppressed_until {
            Some(until) if now < until => false,
            _ => {
                self.suppressed_until = Some(now + self.window);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_trigger_fires_then_the_window_suppresses() {
        let mut debouncer = Debouncer::from_millis(5_000);
        assert!(debouncer.try_fire());
        assert!(!debouncer.try_fire());

        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert!(!debouncer.try_fire());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(debouncer.try_fire());
    }

    #[tokio::test(start_paused = true)]
    async fn a_burst_fires_exactly_once() {
        let mut debouncer = Debouncer::from_millis(5_000);
        let fired = (0..5).filter(|_| debouncer.try_fire()).count();
        assert_eq!(fired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn suppressed_triggers_do_not_extend_the_window() {
        let mut debouncer = Debouncer::from_millis(1_000);
        assert!(debouncer.try_fire());

        tokio::time::advance(Duration::from_millis(900)).await;
        assert!(!debouncer.try_fire());

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(debouncer.try_fire());
    }
}
