// Standard tuning table - string/fret to MIDI pitch conversion
// String 0 is the high E course, string 5 the low E (top row first,
// matching the timeline layout)

/// Number of instrument courses
pub const STRING_COUNT: usize = 6;

/// Open-string MIDI pitches for standard tuning: E4, B3, G3, D3, A2, E2
pub const OPEN_STRING_PITCHES: [u8; STRING_COUNT] = [64, 59, 55, 50, 45, 40];

/// MIDI pitch for a string/fret pair
///
/// Returns `None` when the string index is out of range or the fretted pitch
/// leaves the 0-127 MIDI range.
pub fn pitch_for(string: u8, fret: u8) -> Option<u8> {
    let open = *OPEN_STRING_PITCHES.get(string as usize)?;
    let pitch = u16::from(open) + u16::from(fret);
    if pitch > 127 {
        None
    } else {
        Some(pitch as u8)
    }
}

/// Note name for a MIDI pitch (e.g. "C4", "A#5")
pub fn note_name(pitch: u8) -> String {
    const NOTE_NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    let octave = (pitch / 12) as i32 - 1;
    let note_index = (pitch % 12) as usize;

    format!("{}{}", NOTE_NAMES[note_index], octave)
}
