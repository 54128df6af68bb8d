// MIDI module - Standard MIDI File export

pub mod export;

pub use export::{ExportError, TICKS_PER_BEAT, export, export_to_file};
