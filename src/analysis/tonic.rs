// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tonic inference from pitch-class frequency.
//!
//! The tonic is the most frequent pitch class across every note of every
//! instrument. Ties go to the lowest pitch class; `TonicAnalysis` keeps the
//! other candidates so callers can report the ambiguity.

use crate::error::{ModeShiftError, Result};
use crate::music::{note_name, pitch_class, MidiNote, NoteName, PitchClass};
use crate::notes::NoteCollection;

/// Result of analysing a note collection's pitch content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonicAnalysis {
    /// Note count per pitch class
    pub histogram: [usize; 12],
    /// Winning pitch class
    pub tonic: PitchClass,
    /// Every pitch class sharing the winning count, ascending
    pub candidates: Vec<PitchClass>,
    /// Median pitch among the notes of the winning class
    pub representative: MidiNote,
}

impl TonicAnalysis {
    /// True when more than one pitch class shares the top count
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Name of the tonic pitch class, e.g. "C#"
    pub fn tonic_name(&self) -> NoteName {
        NoteName::from_pitch_class(self.tonic)
    }

    /// Display name with octave, e.g. "C4". The octave comes from the median
    /// pitch and has no bearing on the conversion.
    pub fn display_name(&self) -> String {
        note_name(self.representative)
    }

    /// Number of notes on the tonic
    pub fn tonic_count(&self) -> usize {
        self.histogram[self.tonic as usize]
    }
}

/// Infer the tonic pitch class of a collection
pub fn infer_tonic(notes: &NoteCollection) -> Result<PitchClass> {
    analyze_tonic(notes).map(|a| a.tonic)
}

/// Full tonic analysis: histogram, winner, ties and representative pitch
pub fn analyze_tonic(notes: &NoteCollection) -> Result<TonicAnalysis> {
    let mut histogram = [0usize; 12];
    for note in notes.notes() {
        histogram[pitch_class(note.pitch()) as usize] += 1;
    }

    let top = histogram.iter().copied().max().unwrap_or(0);
    if top == 0 {
        return Err(ModeShiftError::EmptyInput);
    }

    let candidates: Vec<PitchClass> = (0..12u8)
        .filter(|&pc| histogram[pc as usize] == top)
        .collect();
    let tonic = candidates[0];

    let mut same_class: Vec<MidiNote> = notes
        .notes()
        .map(|n| n.pitch())
        .filter(|&p| pitch_class(p) == tonic)
        .collect();
    same_class.sort_unstable();
    let representative = same_class[same_class.len() / 2];

    Ok(TonicAnalysis {
        histogram,
        tonic,
        candidates,
        representative,
    })
}
