// Sequencer module - timeline data model and lookahead playback

pub mod note;
pub mod scheduler;
pub mod timeline;
pub mod transport;

pub use note::{Note, NoteId};
pub use scheduler::{InstrumentBackend, LOOKAHEAD_WINDOW, Scheduler};
pub use timeline::Timeline;
pub use transport::{SharedTransportState, TransportState};
