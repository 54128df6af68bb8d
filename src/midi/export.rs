// MIDI export - Timeline snapshot to Standard MIDI File bytes
// Format 0, one track, 480 ticks per beat

use crate::sequencer::Timeline;
use midly::num::{u4, u7, u15, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

/// Standard MIDI resolution used by the exporter (PPQN)
pub const TICKS_PER_BEAT: u16 = 480;

/// Largest tick value a variable-length delta can carry
const MAX_TICK: u32 = (1 << 28) - 1;

/// Errors produced while writing the MIDI file
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write MIDI data: {0}")]
    Io(#[from] std::io::Error),
}

/// Export a timeline as a format-0 Standard MIDI File
///
/// Each pitched note yields a NoteOn at `time * ticks_per_beat` and a NoteOff
/// (velocity 0) at `(time + duration) * ticks_per_beat`, on channel 0. Events
/// are emitted in ascending tick order; notes sharing a tick keep their
/// timeline insertion order. Velocity scales as `floor(velocity * 127)`.
/// Unpitched notes are skipped; an empty timeline yields a valid file with an
/// empty track. The output depends only on the timeline contents, so
/// exporting the same timeline twice is byte-identical.
pub fn export(timeline: &Timeline, ticks_per_beat: u16) -> Result<Vec<u8>, ExportError> {
    let tpb = f64::from(ticks_per_beat);

    let mut events: Vec<(u32, MidiMessage)> = Vec::with_capacity(timeline.len() * 2);
    for note in timeline.notes() {
        let Some(pitch) = note.pitch else {
            continue;
        };
        let start_tick = ((note.time * tpb) as u32).min(MAX_TICK);
        let end_tick = ((note.end_time() * tpb) as u32).min(MAX_TICK);
        let velocity = (f64::from(note.velocity) * 127.0).floor() as u8;

        events.push((
            start_tick,
            MidiMessage::NoteOn {
                key: u7::new(pitch),
                vel: u7::new(velocity),
            },
        ));
        events.push((
            end_tick,
            MidiMessage::NoteOff {
                key: u7::new(pitch),
                vel: u7::new(0),
            },
        ));
    }
    // Stable by construction: ties keep note insertion order, and each
    // note's NoteOn precedes its own NoteOff
    events.sort_by_key(|&(tick, _)| tick);

    let mut track = Vec::with_capacity(events.len() + 1);
    let mut last_tick = 0u32;
    for (tick, message) in events {
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(ticks_per_beat)),
        ),
        tracks: vec![track],
    };

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;
    Ok(bytes)
}

/// Export a timeline to a `.mid` file at the default resolution
pub fn export_to_file(timeline: &Timeline, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let bytes = export(timeline, TICKS_PER_BEAT)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
