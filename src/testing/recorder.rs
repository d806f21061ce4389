//! A [`LiveReload`] that counts signals instead of sending them.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::reload::LiveReload;

/// Counts reload signals.
#[derive(Debug, Default)]
pub struct RecordingLiveReload {
    signals: AtomicUsize,
}

impl RecordingLiveReload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far.
    pub fn count(&self) -> usize {
        self.signals.load(Ordering::SeqCst)
    }

    /// Return the count and reset it to zero.
    pub fn take(&self) -> usize {
        self.signals.swap(0, Ordering::SeqCst)
    }
}

impl LiveReload for RecordingLiveReload {
    fn reload(&self) {
        self.signals.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_resets() {
        let recorder = RecordingLiveReload::new();
        recorder.reload();
        recorder.reload();
        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.take(), 2);
        assert_eq!(recorder.count(), 0);
    }
}
