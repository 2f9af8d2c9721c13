// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for mode conversion.

use thiserror::Error;

/// Errors surfaced by tonic inference, mode lookup and the modal transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeShiftError {
    /// The note collection holds no notes, so no tonic can be inferred
    #[error("no notes found to infer a tonic from")]
    EmptyInput,

    /// The requested mode identifier is not registered
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    /// A tonic pitch class outside 0-11
    #[error("invalid tonic pitch class {0} (expected 0-11)")]
    InvalidTonic(u8),

    /// A note would leave the MIDI range 0-127 after shifting
    #[error("pitch {pitch} shifted by {shift:+} leaves the MIDI range 0-127")]
    PitchOutOfRange { pitch: u8, shift: i8 },

    /// A note was constructed with a pitch above 127
    #[error("invalid pitch {0} (expected 0-127)")]
    InvalidPitch(u8),

    /// A scale degree outside 0-11
    #[error("scale degree {0} is outside 0-11")]
    InvalidDegree(u8),

    /// Degrees that a mode would both lower and raise
    #[error("degrees {0} are both lowered and raised")]
    OverlappingDegrees(String),

    /// A custom mode definition breaks the mode table invariants
    #[error("invalid mode definition '{name}': {reason}")]
    InvalidModeDefinition { name: String, reason: String },

    /// The MIDI file could not be parsed or written
    #[error("midi error: {0}")]
    Midi(String),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ModeShiftError>;
