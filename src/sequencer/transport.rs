// Transport state - playback state machine and display-facing shared state
// The scheduler writes, the display layer only ever reads

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Transport state (play/pause/stop)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    /// Check if transport is playing
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing)
    }

    /// Check if transport is stopped or paused
    pub fn is_stopped(&self) -> bool {
        matches!(self, TransportState::Stopped | TransportState::Paused)
    }
}

impl Default for TransportState {
    fn default() -> Self {
        TransportState::Stopped
    }
}

/// Shared transport state published to the display layer
///
/// Thread-safe via atomics. The scheduler is the only writer; the display
/// layer reads the advancing cursor and playing flag through a cloned `Arc`.
/// The armed flag doubles as the cancellation token for the periodic
/// callback: `stop()` clears it, so a callback landing after `stop()`
/// returns is a no-op instead of a leaked tick.
#[derive(Debug, Default)]
pub struct SharedTransportState {
    playing: AtomicBool,
    paused: AtomicBool,
    armed: AtomicBool,
    cursor_beat: AtomicU32,
}

impl SharedTransportState {
    /// Create new shared transport state
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get current transport state
    pub fn state(&self) -> TransportState {
        if self.playing.load(Ordering::Relaxed) {
            TransportState::Playing
        } else if self.paused.load(Ordering::Relaxed) {
            TransportState::Paused
        } else {
            TransportState::Stopped
        }
    }

    /// Current cursor position in beats, for display
    pub fn cursor_beat(&self) -> u32 {
        self.cursor_beat.load(Ordering::Relaxed)
    }

    /// Whether the host's periodic callback should keep firing ticks
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    pub(crate) fn set_state(&self, state: TransportState) {
        self.playing
            .store(state == TransportState::Playing, Ordering::Relaxed);
        self.paused
            .store(state == TransportState::Paused, Ordering::Relaxed);
    }

    pub(crate) fn set_cursor_beat(&self, beat: u32) {
        self.cursor_beat.store(beat, Ordering::Relaxed);
    }

    pub(crate) fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::Relaxed);
    }
}
