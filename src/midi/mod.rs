// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file input and output.
//!
//! This module provides:
//! - Parsing MIDI files into note collections
//! - Writing converted pitches back into the original file
//! - Exporting standalone note collections

pub mod document;
pub mod export;

pub use document::{ensure_mid_extension, MidiDocument};
pub use export::{MidiExporter, MidiFileFormat};
