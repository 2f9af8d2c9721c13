// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities.
//!
//! Pitch classes, note names and the table of modes a piece can be
//! converted into.

pub mod mode;
pub mod pitch;

pub use mode::{lookup_mode, mode_label, ConversionPreset, CustomModeDefinition, DegreeSet, ModeDefinition, ModeRegistry};
pub use pitch::{degree, note_name, pitch_class, MidiNote, NoteName, PitchClass, MAX_MIDI_NOTE};
