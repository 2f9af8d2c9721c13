// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes, scale degrees and note names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Pitch class (0-11), a semitone value independent of octave
pub type PitchClass = u8;

/// Highest valid MIDI note number
pub const MAX_MIDI_NOTE: MidiNote = 127;

/// Pitch class of a MIDI note
pub fn pitch_class(pitch: MidiNote) -> PitchClass {
    pitch % 12
}

/// Scale degree of a pitch relative to a tonic, as semitones above it (0-11)
pub fn degree(pitch: MidiNote, tonic: PitchClass) -> u8 {
    (pitch as i16 - tonic as i16).rem_euclid(12) as u8
}

/// Note names (pitch classes), spelled with sharps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl NoteName {
    /// All note names in chromatic order
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Pitch class (0-11) for this name
    pub fn pitch_class(self) -> PitchClass {
        self as PitchClass
    }

    /// Name for a pitch class (taken modulo 12)
    pub fn from_pitch_class(pc: PitchClass) -> Self {
        NoteName::ALL[(pc % 12) as usize]
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        };
        f.write_str(name)
    }
}

/// Octave of a MIDI note, with middle C (60) in octave 4
pub fn octave(pitch: MidiNote) -> i8 {
    (pitch / 12) as i8 - 1
}

/// Scientific name of a MIDI note, e.g. 60 -> "C4", 61 -> "C#4", 0 -> "C-1"
pub fn note_name(pitch: MidiNote) -> String {
    format!("{}{}", NoteName::from_pitch_class(pitch_class(pitch)), octave(pitch))
}
