// Command types - input handlers to engine
// Covers the note edit triggers and the transport key bindings

use crate::messaging::channels::CommandConsumer;
use crate::sequencer::note::NoteId;
use crate::sequencer::{Scheduler, Timeline};
use ringbuf::traits::Consumer;

/// Commands produced by input handlers and consumed by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Note-add trigger (tap): place a note at the target beat
    AddNote { string: u8, fret: u8, beat: u32 },
    /// Note drag: shift a note by whole beats (may be negative)
    DragNote { id: NoteId, beat_delta: i32 },
    /// Explicit delete (delete key)
    DeleteNote { id: NoteId },
    Start,
    Pause,
    Stop,
    SetBpm(f64),
    SetVolume(f32),
    SetMetronome(bool),
    SetLoopBounds { start: u32, end: u32 },
}

impl Command {
    /// Apply this command to the session state
    ///
    /// Edit commands mutate the timeline at note granularity; transport
    /// commands go to the scheduler. Nothing here can fail: out-of-range
    /// values are clamped and absent note ids are ignored.
    pub fn apply(self, timeline: &mut Timeline, scheduler: &mut Scheduler) {
        match self {
            Command::AddNote { string, fret, beat } => {
                timeline.add_note(string, fret, f64::from(beat));
            }
            Command::DragNote { id, beat_delta } => {
                if let Some(note) = timeline.get_note(id) {
                    timeline.move_note(id, note.time + f64::from(beat_delta));
                }
            }
            Command::DeleteNote { id } => {
                timeline.delete_note(id);
            }
            Command::Start => scheduler.start(),
            Command::Pause => scheduler.pause(),
            Command::Stop => scheduler.stop(),
            Command::SetBpm(bpm) => scheduler.set_bpm(bpm),
            Command::SetVolume(volume) => scheduler.set_volume(volume),
            Command::SetMetronome(enabled) => scheduler.set_metronome(enabled),
            Command::SetLoopBounds { start, end } => scheduler.set_loop_bounds(start, end),
        }
    }
}

/// Drain all pending commands before a tick
pub fn drain_commands(
    rx: &mut CommandConsumer,
    timeline: &mut Timeline,
    scheduler: &mut Scheduler,
) {
    while let Some(command) = rx.try_pop() {
        command.apply(timeline, scheduler);
    }
}
