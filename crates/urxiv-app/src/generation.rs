use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic tickets guarding against stale load results.
///
/// Overlapping reloads (rapid channel switching, a mount racing a click)
/// are not cancelled; instead each load takes a ticket and applies its
/// result only if no newer load has started since. The stale completion is
/// simply discarded.
#[derive(Debug, Default)]
pub struct Generations(AtomicU64);

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load; invalidates all earlier tickets.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the latest load.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}
