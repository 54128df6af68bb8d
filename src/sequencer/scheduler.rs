// Scheduler - lookahead playback against the backend's audio clock
//
// Beat advancement is driven by a fixed seconds-per-beat increment measured
// against the audio clock, not by the periodic callback's own timing. The
// callback may fire late or jitter, but every event is committed ahead of
// time at a precise clock time, so playback stays on the grid as long as
// jitter stays under the lookahead window.

use crate::sequencer::timeline::Timeline;
use crate::sequencer::transport::{SharedTransportState, TransportState};
use log::{debug, warn};
use std::sync::Arc;

/// How far ahead of the audio clock events are committed, in seconds
pub const LOOKAHEAD_WINDOW: f64 = 0.1;

/// Head start applied on `start()`, so the first tick has events ready
const START_DELAY: f64 = 0.1;

/// Offset used to re-anchor the event clock on loop wrap, preventing
/// accumulated rounding from drifting the loop over time
const LOOP_REANCHOR_DELAY: f64 = 0.05;

/// Default loop bounds in beats
const DEFAULT_LOOP_START: u32 = 0;
const DEFAULT_LOOP_END: u32 = 16;

/// Accepted tempo range in BPM
const MIN_BPM: f64 = 20.0;
const MAX_BPM: f64 = 999.0;

/// Audio clock and sound sink contract
///
/// Implementations must accept `start_time` values in the future relative to
/// their own clock, and must never block when called from the tick.
/// Everything is fire-and-forget; a backend that cannot honor a call drops
/// it.
pub trait InstrumentBackend {
    /// Current audio-clock time in seconds, monotonically increasing
    fn now(&self) -> f64;

    /// Schedule a pitched note at the given clock time
    fn play(&self, pitch: u8, start_time: f64, gain: f32, duration: f64);

    /// Schedule a short metronome click at the given clock time
    fn click(&self, start_time: f64);

    /// Set the master gain, effective immediately
    fn set_master_gain(&self, gain: f32);
}

/// Lookahead scheduler, owning the transport
///
/// All long-lived mutable tick state (cursor, next event time, loop bounds,
/// tempo) lives in this one struct; the host's periodic callback drives it by
/// calling [`Scheduler::tick`] with the current timeline. The tick body runs
/// to completion and recovers every failure mode locally, so a bad tick can
/// never stall the transport.
pub struct Scheduler {
    shared: Arc<SharedTransportState>,
    backend: Option<Arc<dyn InstrumentBackend>>,

    bpm: f64,
    volume: f32,
    metronome_on: bool,
    loop_start: u32,
    loop_end: u32,

    /// Logical beat about to be scheduled
    cursor_beat: u32,

    /// Audio-clock time the cursor beat will sound at
    next_event_time: f64,
}

impl Scheduler {
    /// Create a scheduler with no backend attached yet
    pub fn new() -> Self {
        Self {
            shared: SharedTransportState::new(),
            backend: None,
            bpm: 120.0,
            volume: 0.8,
            metronome_on: false,
            loop_start: DEFAULT_LOOP_START,
            loop_end: DEFAULT_LOOP_END,
            cursor_beat: 0,
            next_event_time: 0.0,
        }
    }

    /// Create a scheduler wired to an instrument backend
    pub fn with_backend(backend: Arc<dyn InstrumentBackend>) -> Self {
        let mut scheduler = Self::new();
        scheduler.set_backend(backend);
        scheduler
    }

    /// Attach (or replace) the instrument backend
    ///
    /// The current master volume is pushed to the new backend right away.
    pub fn set_backend(&mut self, backend: Arc<dyn InstrumentBackend>) {
        backend.set_master_gain(self.volume);
        self.backend = Some(backend);
    }

    /// Shared state handle for the display layer (read-only use)
    pub fn shared_state(&self) -> Arc<SharedTransportState> {
        Arc::clone(&self.shared)
    }

    /// Current transport state
    pub fn state(&self) -> TransportState {
        self.shared.state()
    }

    /// Tempo in beats per minute
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Master volume in [0, 1]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether the metronome click is enabled
    pub fn metronome_on(&self) -> bool {
        self.metronome_on
    }

    /// Loop bounds as (start, end) beats
    pub fn loop_bounds(&self) -> (u32, u32) {
        (self.loop_start, self.loop_end)
    }

    /// Start playback from the loop start
    ///
    /// No-op while already playing (the periodic callback must never be
    /// armed twice) and while no backend is attached (there is no audio
    /// clock to schedule against).
    pub fn start(&mut self) {
        if self.shared.state().is_playing() {
            return;
        }
        let Some(backend) = self.backend.as_ref() else {
            debug!("start ignored: no instrument backend attached");
            return;
        };

        self.cursor_beat = self.loop_start;
        self.next_event_time = backend.now() + START_DELAY;
        self.shared.set_cursor_beat(self.cursor_beat);
        self.shared.set_state(TransportState::Playing);
        self.shared.set_armed(true);
    }

    /// Pause playback, keeping the displayed cursor where it is
    pub fn pause(&mut self) {
        if !self.shared.state().is_playing() {
            return;
        }
        self.shared.set_armed(false);
        self.shared.set_state(TransportState::Paused);
    }

    /// Stop playback and rewind the cursor; idempotent
    pub fn stop(&mut self) {
        self.shared.set_armed(false);
        self.cursor_beat = 0;
        self.next_event_time = 0.0;
        self.shared.set_cursor_beat(0);
        self.shared.set_state(TransportState::Stopped);
    }

    /// Set the tempo; takes effect on the next tick
    ///
    /// Finite values are clamped into the 20-999 BPM range; non-finite
    /// values are ignored, never fatal.
    pub fn set_bpm(&mut self, bpm: f64) {
        if bpm.is_finite() {
            self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        } else {
            warn!("ignoring invalid bpm {bpm}");
        }
    }

    /// Set the master volume, effective immediately
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(backend) = self.backend.as_ref() {
            backend.set_master_gain(self.volume);
        }
    }

    /// Enable or disable the metronome click
    pub fn set_metronome(&mut self, enabled: bool) {
        self.metronome_on = enabled;
    }

    /// Set the loop bounds in beats
    ///
    /// An end at or before the start is clamped to `start + 1`, so the tick
    /// never sees an empty loop. A start at the top of the beat range is
    /// pulled back one beat instead.
    pub fn set_loop_bounds(&mut self, start: u32, end: u32) {
        let mut start = start;
        let end = if end > start {
            end
        } else {
            debug!("clamping loop end {end} to follow start {start}");
            start.saturating_add(1)
        };
        if end == start {
            start -= 1;
        }
        self.loop_start = start;
        self.loop_end = end;
    }

    /// One lookahead pass; invoked by the host's periodic callback
    ///
    /// Commits every beat falling inside the lookahead window to the backend
    /// at its exact clock time, then advances the logical cursor. A late or
    /// jittery callback only shrinks the remaining margin; it cannot move
    /// already-committed events.
    pub fn tick(&mut self, timeline: &Timeline) {
        if !self.shared.is_armed() {
            return;
        }
        let Some(backend) = self.backend.clone() else {
            debug!("tick skipped: no instrument backend attached");
            return;
        };

        // Tempo changes apply from here on, not mid-tick
        let seconds_per_beat = self.seconds_per_beat();

        while self.next_event_time < backend.now() + LOOKAHEAD_WINDOW {
            if self.metronome_on {
                backend.click(self.next_event_time);
            }

            for note in timeline.notes_at(self.cursor_beat) {
                let Some(pitch) = note.pitch else {
                    debug!("skipping unpitched note {}", note.id);
                    continue;
                };
                backend.play(pitch, self.next_event_time, note.velocity, note.duration);
            }

            self.shared.set_cursor_beat(self.cursor_beat);

            self.next_event_time += seconds_per_beat;
            self.cursor_beat += 1;

            if self.cursor_beat >= self.loop_end {
                self.cursor_beat = self.loop_start;
                self.next_event_time = backend.now() + LOOP_REANCHOR_DELAY;
                // The re-anchored time always lands back inside the window;
                // the wrapped beat belongs to the next callback, so that the
                // tick terminates even for a one-beat loop
                break;
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
