// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Modal transformation.
//!
//! Rewrites every note's pitch according to a mode definition and a tonic:
//! notes on a lowered degree drop a semitone, notes on a raised degree rise
//! a semitone, everything else stays. Each note is handled on its own, so
//! the result never depends on note order or on any other note.
//!
//! The transform is not idempotent. A lowered note sits on a new degree and
//! may be lowered again if the same conversion is applied twice.

use serde::{Deserialize, Serialize};

use crate::error::{ModeShiftError, Result};
use crate::music::{degree, mode_label, MidiNote, ModeDefinition, ModeRegistry, PitchClass, MAX_MIDI_NOTE};
use crate::notes::NoteCollection;

/// What to do with a note that would leave the MIDI range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Fail the whole conversion before touching any note
    #[default]
    Reject,
    /// Leave the note at 0 or 127
    Clamp,
}

/// Summary of an applied conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeConversion {
    /// Mode label, e.g. "harmonic minor"
    pub label: String,
    /// Notes moved down a semitone
    pub lowered: usize,
    /// Notes moved up a semitone
    pub raised: usize,
    /// Notes left in place, including clamped ones
    pub unchanged: usize,
}

impl ModeConversion {
    /// Number of notes whose pitch changed
    pub fn changed(&self) -> usize {
        self.lowered + self.raised
    }
}

/// Convert a collection to a built-in mode, rejecting out-of-range results
pub fn apply_mode(notes: &mut NoteCollection, tonic: PitchClass, mode_id: &str) -> Result<ModeConversion> {
    apply_mode_with(notes, tonic, mode_id, ModeRegistry::builtin(), OverflowPolicy::Reject)
}

/// Convert a collection to a mode resolved from the given registry
pub fn apply_mode_with(
    notes: &mut NoteCollection,
    tonic: PitchClass,
    mode_id: &str,
    registry: &ModeRegistry,
    overflow: OverflowPolicy,
) -> Result<ModeConversion> {
    let (id, definition) = registry.resolve(mode_id)?;
    let mut conversion = apply_definition(notes, tonic, &definition, overflow)?;
    conversion.label = mode_label(id);
    Ok(conversion)
}

/// Apply an already-resolved definition. The returned label is empty.
pub fn apply_definition(
    notes: &mut NoteCollection,
    tonic: PitchClass,
    definition: &ModeDefinition,
    overflow: OverflowPolicy,
) -> Result<ModeConversion> {
    if tonic > 11 {
        return Err(ModeShiftError::InvalidTonic(tonic));
    }

    let mut conversion = ModeConversion {
        label: String::new(),
        lowered: 0,
        raised: 0,
        unchanged: 0,
    };
    if definition.is_identity() {
        conversion.unchanged = notes.note_count();
        return Ok(conversion);
    }

    if overflow == OverflowPolicy::Reject {
        for note in notes.notes() {
            if shift_pitch(note.pitch(), tonic, definition).is_none() {
                return Err(ModeShiftError::PitchOutOfRange {
                    pitch: note.pitch(),
                    shift: definition.shift_for(degree(note.pitch(), tonic)),
                });
            }
        }
    }

    for note in notes.notes_mut() {
        let shift = definition.shift_for(degree(note.pitch(), tonic));
        match shifted(note.pitch(), shift) {
            Some(pitch) if shift != 0 => {
                note.set_pitch(pitch)?;
                if shift < 0 {
                    conversion.lowered += 1;
                } else {
                    conversion.raised += 1;
                }
            }
            // Unshifted, or clamped at the range edge
            _ => conversion.unchanged += 1,
        }
    }

    Ok(conversion)
}

/// New pitch for a single note, or `None` when it would leave 0-127
pub fn shift_pitch(pitch: MidiNote, tonic: PitchClass, definition: &ModeDefinition) -> Option<MidiNote> {
    shifted(pitch, definition.shift_for(degree(pitch, tonic)))
}

fn shifted(pitch: MidiNote, shift: i8) -> Option<MidiNote> {
    let result = pitch as i16 + shift as i16;
    if (0..=MAX_MIDI_NOTE as i16).contains(&result) {
        Some(result as MidiNote)
    } else {
        None
    }
}
