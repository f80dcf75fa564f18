//! Pitch naming.
//!
//! Key 60 is "C4"; accidentals are spelled with sharps. Octave numbers can
//! go negative ("C-1" is key 0), which the name parser has to account for
//! since '-' also marks the class/octave boundary.

use crate::error::{Error, Result};

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// MIDI key number to pitch name with octave.
pub fn pitch_name(key: u8) -> String {
    let class = (key % 12) as usize;
    let octave = i32::from(key / 12) - 1;
    format!("{}{}", PITCH_NAMES[class], octave)
}

/// Pitch name with octave back to a MIDI key number.
pub fn pitch_key(name: &str) -> Result<u8> {
    let boundary = name
        .find(|c: char| c == '-' || c.is_ascii_digit())
        .ok_or_else(|| Error::UnknownPitchName(name.to_string()))?;
    let (class_str, octave_str) = name.split_at(boundary);

    let class = PITCH_NAMES
        .iter()
        .position(|&p| p == class_str)
        .ok_or_else(|| Error::UnknownPitchName(name.to_string()))?;
    let octave: i32 = octave_str
        .parse()
        .map_err(|_| Error::UnknownPitchName(name.to_string()))?;

    let key = (octave + 1) * 12 + class as i32;
    u8::try_from(key)
        .ok()
        .filter(|&k| k < 128)
        .ok_or_else(|| Error::UnknownPitchName(name.to_string()))
}
