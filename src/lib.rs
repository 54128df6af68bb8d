// Tabline - beat-indexed tablature composer engine
// Timeline data model, lookahead playback scheduler, and MIDI export

pub mod messaging;
pub mod midi;
pub mod sequencer;
pub mod tuning;

// Re-export commonly used types for convenience
pub use messaging::{Command, create_command_channel, drain_commands};
pub use midi::{ExportError, TICKS_PER_BEAT, export, export_to_file};
pub use sequencer::{
    InstrumentBackend, LOOKAHEAD_WINDOW, Note, NoteId, Scheduler, SharedTransportState, Timeline,
    TransportState,
};
