use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct PlanSyncConfig {
    /// Suppression window for the "remote changes applied" notice. The first
    /// remote event fires immediately; further events inside the window are
    /// coalesced into that one notice.
    pub notice_debounce_ms: u64,
    /// Capacity of the notice broadcast channel. Slow subscribers lag rather
    /// than block the feed consumer.
    pub notice_buffer: usize,
    /// Restore the pre-edit item collection when a persistence call fails.
    /// Off by default: optimistic edits stay applied and the error is
    /// reported to the caller.
    pub revert_on_save_failure: bool,
}

impl Default for PlanSyncConfig {
    fn default() -> Self {
        Self {
            notice_debounce_ms: 5_000,
            notice_buffer: 16,
            revert_on_save_failure: false,
        }
    }
}

impl PlanSyncConfig {
    #[tracing::instrument]
    pub fn validate(&self) -> Result<()> {
        if self.notice_debounce_ms == 0 {
            return Err(Error::invalid_input("notice_debounce_ms must be > 0"));
        }
        if self.notice_buffer == 0 {
            return Err(Error::invalid_input("notice_buffer must be > 0"));
        }
        Ok(())
    }
}
