// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Modal conversion of MIDI note collections.
//!
//! Infers the tonic of a piece from its pitch-class frequencies, then
//! rewrites note pitches a semitone at a time so the piece moves into a
//! different mode on the same tonic.

pub mod analysis;
pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod notes;
pub mod pipeline;
pub mod transform;

pub use analysis::{analyze_tonic, infer_tonic, TonicAnalysis};
pub use config::ConverterConfig;
pub use error::{ModeShiftError, Result};
pub use music::{lookup_mode, ModeDefinition, ModeRegistry, PitchClass};
pub use notes::{Instrument, Note, NoteCollection};
pub use transform::{apply_mode, apply_mode_with, ModeConversion, OverflowPolicy};
