//! MIDI export integration tests
//!
//! Every produced file is parsed back with `midly` to check the container,
//! and the delta-time scenarios check exact tick arithmetic at the standard
//! 480 ticks-per-beat resolution.

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use tabline::{TICKS_PER_BEAT, Timeline, export, export_to_file};

/// Flatten a track into (delta, message) pairs, dropping the end marker
fn midi_events(smf: &Smf) -> Vec<(u32, MidiMessage)> {
    smf.tracks[0]
        .iter()
        .filter_map(|event| match event.kind {
            TrackEventKind::Midi { message, .. } => Some((event.delta.as_int(), message)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_single_note_ticks_and_velocity() {
    let mut timeline = Timeline::new();
    // Middle C at beat 4, one beat long, velocity 0.8
    timeline.add_note_with(3, 10, 4.0, 1.0, 0.8);

    let bytes = export(&timeline, TICKS_PER_BEAT).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let events = midi_events(&smf);

    assert_eq!(events.len(), 2);

    // NoteOn at tick 1920, velocity floor(0.8 * 127) = 101
    let (delta, message) = events[0];
    assert_eq!(delta, 1920);
    match message {
        MidiMessage::NoteOn { key, vel } => {
            assert_eq!(key.as_int(), 60);
            assert_eq!(vel.as_int(), 101);
        }
        other => panic!("expected NoteOn, got {other:?}"),
    }

    // NoteOff 480 ticks later, velocity 0
    let (delta, message) = events[1];
    assert_eq!(delta, 480);
    match message {
        MidiMessage::NoteOff { key, vel } => {
            assert_eq!(key.as_int(), 60);
            assert_eq!(vel.as_int(), 0);
        }
        other => panic!("expected NoteOff, got {other:?}"),
    }
}

#[test]
fn test_empty_timeline_yields_valid_file() {
    let bytes = export(&Timeline::new(), TICKS_PER_BEAT).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(smf.tracks.len(), 1);
    assert!(midi_events(&smf).is_empty());
    assert!(matches!(
        smf.tracks[0].last().map(|e| e.kind),
        Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
    ));
}

#[test]
fn test_export_is_deterministic() {
    let mut timeline = Timeline::new();
    timeline.add_note(0, 3, 0.0);
    timeline.add_note(4, 2, 2.0);
    timeline.add_note(2, 0, 7.0);

    let first = export(&timeline, TICKS_PER_BEAT).unwrap();
    let second = export(&timeline, TICKS_PER_BEAT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_out_of_order_notes_sorted_by_tick() {
    let mut timeline = Timeline::new();
    // Inserted back to front; the file must still run in ascending ticks
    timeline.add_note(3, 10, 4.0);
    timeline.add_note(5, 0, 0.0);

    let bytes = export(&timeline, TICKS_PER_BEAT).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let events = midi_events(&smf);

    let deltas: Vec<u32> = events.iter().map(|&(delta, _)| delta).collect();
    assert_eq!(deltas, vec![0, 480, 1440, 480]);

    // First sounding note is the beat-0 low E, not the earlier-inserted C
    match events[0].1 {
        MidiMessage::NoteOn { key, .. } => assert_eq!(key.as_int(), 40),
        other => panic!("expected NoteOn, got {other:?}"),
    }
}

#[test]
fn test_simultaneous_notes_keep_insertion_order() {
    let mut timeline = Timeline::new();
    timeline.add_note(0, 0, 0.0); // 64, added first
    timeline.add_note(1, 0, 0.0); // 59, added second

    let bytes = export(&timeline, TICKS_PER_BEAT).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let events = midi_events(&smf);

    let keys: Vec<u8> = events
        .iter()
        .filter_map(|&(_, message)| match message {
            MidiMessage::NoteOn { key, .. } => Some(key.as_int()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![64, 59]);

    // Both note-offs share tick 480; insertion order holds there too
    let off_keys: Vec<u8> = events
        .iter()
        .filter_map(|&(_, message)| match message {
            MidiMessage::NoteOff { key, .. } => Some(key.as_int()),
            _ => None,
        })
        .collect();
    assert_eq!(off_keys, vec![64, 59]);
}

#[test]
fn test_custom_resolution() {
    let mut timeline = Timeline::new();
    timeline.add_note(3, 10, 2.0);

    let bytes = export(&timeline, 96).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    match smf.header.timing {
        midly::Timing::Metrical(tpb) => assert_eq!(tpb.as_int(), 96),
        other => panic!("expected metrical timing, got {other:?}"),
    }
    assert_eq!(midi_events(&smf)[0].0, 192);
}

#[test]
fn test_export_to_file() {
    let mut timeline = Timeline::new();
    timeline.add_note(0, 0, 0.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("composition.mid");
    export_to_file(&timeline, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], b"MThd");
    Smf::parse(&bytes).unwrap();
}
