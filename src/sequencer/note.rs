// Note representation for the timeline
// A note is a fretted event with a beat position, duration, and velocity

use crate::tuning;
use serde::{Deserialize, Serialize};

/// Unique identifier for notes
pub type NoteId = u64;

/// Duration given to newly placed notes, in beats
pub const DEFAULT_DURATION_BEATS: f64 = 1.0;

/// Velocity given to newly placed notes
pub const DEFAULT_VELOCITY: f32 = 0.8;

/// A note placed on the timeline
///
/// Positions and durations are in beats; tempo maps beats to real time at
/// playback and export time. `pitch` is derived from `(string, fret)` at
/// creation so the playback path never recomputes it. It is `None` when the
/// fretted pitch falls outside the MIDI range; such notes are skipped by the
/// scheduler and the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note
    pub id: NoteId,

    /// Instrument course index (0 = high E, 5 = low E)
    pub string: u8,

    /// Fret number
    pub fret: u8,

    /// Derived MIDI note number
    pub pitch: Option<u8>,

    /// Start position in beats
    pub time: f64,

    /// Duration in beats
    pub duration: f64,

    /// Velocity in [0, 1]
    pub velocity: f32,
}

impl Note {
    /// Creates a new note
    ///
    /// Velocity is clamped to [0, 1]; a non-finite velocity falls back to
    /// the default. Time and duration invariants are the timeline's
    /// responsibility; violating them here is a programming error.
    pub fn new(id: NoteId, string: u8, fret: u8, time: f64, duration: f64, velocity: f32) -> Self {
        assert!(time >= 0.0, "Note time must be >= 0");
        assert!(duration > 0.0, "Note duration must be > 0");

        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            DEFAULT_VELOCITY
        };

        Self {
            id,
            string,
            fret,
            pitch: tuning::pitch_for(string, fret),
            time,
            duration,
            velocity,
        }
    }

    /// End position of this note, in beats
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }

    /// Note name of the fretted pitch (e.g. "C4"), if it is in MIDI range
    pub fn note_name(&self) -> Option<String> {
        self.pitch.map(tuning::note_name)
    }
}
