// Timeline - insertion-ordered note collection and edit operations
// The thin edit controller (tap to add, drag to move, delete) lives here

use crate::sequencer::note::{DEFAULT_DURATION_BEATS, DEFAULT_VELOCITY, Note, NoteId};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global note ID generator (atomic for thread-safety)
static NEXT_NOTE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique note ID
pub fn generate_note_id() -> NoteId {
    NEXT_NOTE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Smallest accepted note duration, one MIDI tick at export resolution
const MIN_DURATION_BEATS: f64 = 1.0 / 480.0;

/// Insertion-ordered collection of notes
///
/// Playback never relies on ordering (the scheduler selects notes by exact
/// beat), but insertion order is the stable tie-break for notes that share a
/// tick in the exported file, so the collection is never re-sorted.
///
/// Every mutation is atomic at note granularity: the scheduler borrows the
/// timeline for the length of one tick and always observes whole notes.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    notes: Vec<Note>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Get all notes in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the timeline holds no notes
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Get a note by ID
    pub fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Place a note at the given beat with default duration and velocity
    ///
    /// Returns the fresh note's ID. There is no upper bound on `beat`.
    pub fn add_note(&mut self, string: u8, fret: u8, beat: f64) -> NoteId {
        self.add_note_with(string, fret, beat, DEFAULT_DURATION_BEATS, DEFAULT_VELOCITY)
    }

    /// Place a note with explicit duration and velocity
    ///
    /// Out-of-range values are clamped, never rejected: the beat to >= 0, the
    /// duration to a minimum of one export tick, the velocity to [0, 1].
    pub fn add_note_with(
        &mut self,
        string: u8,
        fret: u8,
        beat: f64,
        duration: f64,
        velocity: f32,
    ) -> NoteId {
        let id = generate_note_id();
        let note = Note::new(
            id,
            string,
            fret,
            beat.max(0.0),
            duration.max(MIN_DURATION_BEATS),
            velocity,
        );
        if note.pitch.is_none() {
            debug!("note {id} (string {string}, fret {fret}) has no MIDI pitch");
        }
        self.notes.push(note);
        id
    }

    /// Move a note to a new start beat, clamped to >= 0; no-op if absent
    pub fn move_note(&mut self, id: NoteId, new_time: f64) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.time = new_time.max(0.0);
        }
    }

    /// Remove a note by ID; no-op if absent
    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    /// Notes starting exactly on the given beat
    ///
    /// Equality, not interval overlap: a note is triggered once, at its start
    /// beat, regardless of its duration.
    pub fn notes_at(&self, beat: u32) -> impl Iterator<Item = &Note> {
        let beat = f64::from(beat);
        self.notes.iter().filter(move |n| n.time == beat)
    }
}
