// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note collections.
//!
//! A `NoteCollection` is an ordered list of instruments, each holding the
//! notes it sounds. Only the pitch is ever rewritten by mode conversion;
//! timing and velocity are carried through untouched.

use crate::error::{ModeShiftError, Result};
use crate::music::{MidiNote, MAX_MIDI_NOTE};

/// Location of the MIDI events a note was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EventRef {
    pub track: usize,
    pub note_on: usize,
    pub note_off: Option<usize>,
}

/// A single sounded pitch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pitch: MidiNote,
    /// Velocity (1-127)
    pub velocity: u8,
    /// Start tick
    pub start_tick: u64,
    /// End tick
    pub end_tick: u64,
    pub(crate) source: Option<EventRef>,
}

impl Note {
    /// Create a note, rejecting pitches above 127
    pub fn new(pitch: MidiNote, velocity: u8, start_tick: u64, end_tick: u64) -> Result<Self> {
        if pitch > MAX_MIDI_NOTE {
            return Err(ModeShiftError::InvalidPitch(pitch));
        }
        Ok(Self {
            pitch,
            velocity,
            start_tick,
            end_tick,
            source: None,
        })
    }

    /// MIDI note number
    pub fn pitch(&self) -> MidiNote {
        self.pitch
    }

    /// Replace the pitch, rejecting values above 127
    pub fn set_pitch(&mut self, pitch: MidiNote) -> Result<()> {
        if pitch > MAX_MIDI_NOTE {
            return Err(ModeShiftError::InvalidPitch(pitch));
        }
        self.pitch = pitch;
        Ok(())
    }

    /// Duration in ticks
    pub fn duration(&self) -> u64 {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

/// A group of notes sharing a track and channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    /// Track name, empty if the track has none
    pub name: String,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Program number (0-127)
    pub program: u8,
    /// Percussion channel (channel 10)
    pub is_drum: bool,
    /// Notes in file order
    pub notes: Vec<Note>,
}

impl Instrument {
    /// Create an empty instrument on a channel
    pub fn new(name: impl Into<String>, channel: u8) -> Self {
        Self {
            name: name.into(),
            channel,
            program: 0,
            is_drum: channel == 9,
            notes: Vec::new(),
        }
    }

    /// Add a note
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Builder-style program setter
    pub fn with_program(mut self, program: u8) -> Self {
        self.program = program;
        self
    }
}

/// All notes of a piece, grouped by instrument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    /// Instruments in file order
    pub instruments: Vec<Instrument>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instrument
    pub fn add_instrument(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    /// Total number of notes across all instruments
    pub fn note_count(&self) -> usize {
        self.instruments.iter().map(|i| i.notes.len()).sum()
    }

    /// True when no instrument holds a note
    pub fn is_empty(&self) -> bool {
        self.instruments.iter().all(|i| i.notes.is_empty())
    }

    /// Iterate every note
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.instruments.iter().flat_map(|i| i.notes.iter())
    }

    /// Iterate every note mutably
    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.instruments.iter_mut().flat_map(|i| i.notes.iter_mut())
    }

    /// Every pitch, instrument by instrument
    pub fn pitches(&self) -> Vec<MidiNote> {
        self.notes().map(Note::pitch).collect()
    }
}

impl FromIterator<Instrument> for NoteCollection {
    fn from_iter<T: IntoIterator<Item = Instrument>>(iter: T) -> Self {
        Self {
            instruments: iter.into_iter().collect(),
        }
    }
}

/// Single-instrument collection from bare pitches, mainly for tests and tools
impl TryFrom<&[MidiNote]> for NoteCollection {
    type Error = ModeShiftError;

    fn try_from(pitches: &[MidiNote]) -> Result<Self> {
        let mut instrument = Instrument::new("", 0);
        for (i, &pitch) in pitches.iter().enumerate() {
            let start = i as u64 * 480;
            instrument.add_note(Note::new(pitch, 100, start, start + 480)?);
        }
        Ok(std::iter::once(instrument).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_rejects_invalid_pitch() {
        assert!(Note::new(127, 100, 0, 10).is_ok());
        assert_eq!(Note::new(128, 100, 0, 10), Err(ModeShiftError::InvalidPitch(128)));

        let mut note = Note::new(60, 100, 0, 10).unwrap();
        assert!(note.set_pitch(200).is_err());
        assert_eq!(note.pitch(), 60);
        note.set_pitch(61).unwrap();
        assert_eq!(note.pitch(), 61);
        assert_eq!(note.duration(), 10);
    }

    #[test]
    fn test_collection_counts() {
        let mut collection = NoteCollection::new();
        assert!(collection.is_empty());

        collection.add_instrument(Instrument::new("Empty", 1));
        assert!(collection.is_empty());

        let mut piano = Instrument::new("Piano", 0);
        piano.add_note(Note::new(60, 90, 0, 480).unwrap());
        piano.add_note(Note::new(64, 90, 480, 960).unwrap());
        collection.add_instrument(piano);

        assert!(!collection.is_empty());
        assert_eq!(collection.note_count(), 2);
        assert_eq!(collection.pitches(), vec![60, 64]);
    }

    #[test]
    fn test_drum_channel() {
        assert!(Instrument::new("Kit", 9).is_drum);
        assert!(!Instrument::new("Bass", 1).is_drum);
    }

    #[test]
    fn test_from_pitches() {
        let collection = NoteCollection::try_from(&[60u8, 62, 64][..]).unwrap();
        assert_eq!(collection.instruments.len(), 1);
        assert_eq!(collection.pitches(), vec![60, 62, 64]);
        assert!(NoteCollection::try_from(&[60u8, 130][..]).is_err());
    }
}
