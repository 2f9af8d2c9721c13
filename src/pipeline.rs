// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File-to-file mode conversion.
//!
//! Reads a MIDI file, infers its tonic, converts it to the requested mode
//! and writes the result. Acquiring the MIDI file (downloads, audio
//! transcription) happens before this point.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::analysis::{analyze_tonic, TonicAnalysis};
use crate::config::ConverterConfig;
use crate::midi::{ensure_mid_extension, MidiDocument};
use crate::transform::{apply_mode_with, ModeConversion};

/// Outcome of converting one file
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Tonic analysis of the input
    pub tonic: TonicAnalysis,
    /// Applied conversion
    pub conversion: ModeConversion,
    /// Where the converted file was written
    pub output: PathBuf,
}

impl ConversionReport {
    /// One-line description, e.g. "Detected tonic C4; converted to aeolian"
    pub fn summary(&self) -> String {
        format!(
            "Detected tonic {}; converted to {}",
            self.tonic.display_name(),
            self.conversion.label
        )
    }
}

/// Convert MIDI bytes to a mode. `mode` may be an identifier or a preset number.
pub fn convert_bytes(bytes: &[u8], mode: &str, config: &ConverterConfig) -> Result<(Vec<u8>, TonicAnalysis, ModeConversion)> {
    let registry = config.registry()?;
    // Resolve before reading so a bad mode fails fast
    let (mode_id, _) = registry.resolve_choice(mode)?;

    let mut document = MidiDocument::parse(bytes)?;
    let mut notes = document.notes()?;
    debug!(
        instruments = notes.instruments.len(),
        notes = notes.note_count(),
        ticks_per_beat = ?document.ticks_per_beat(),
        "Parsed MIDI"
    );

    let tonic = analyze_tonic(&notes)?;
    if tonic.is_ambiguous() {
        warn!(
            candidates = ?tonic.candidates,
            chosen = %tonic.tonic_name(),
            "Tonic is ambiguous, using the lowest pitch class"
        );
    }
    info!(tonic = %tonic.display_name(), count = tonic.tonic_count(), "Detected tonic");

    let conversion = apply_mode_with(&mut notes, tonic.tonic, mode_id, &registry, config.overflow)?;
    info!(
        mode = %conversion.label,
        lowered = conversion.lowered,
        raised = conversion.raised,
        "Converted"
    );

    let written = document.apply_pitches(&notes)?;
    debug!(written, "Wrote pitches back");

    Ok((document.to_bytes()?, tonic, conversion))
}

/// Convert a MIDI file and save the result. The output gets a ".mid"
/// extension if it lacks one; `mode` falls back to the configured default.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    mode: Option<&str>,
    config: &ConverterConfig,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output = ensure_mid_extension(output);
    let mode = mode.unwrap_or(config.default_mode.as_str());

    info!(input = ?input, output = ?output, mode, "Converting");
    let bytes = fs::read(input).with_context(|| format!("Failed to read MIDI file: {:?}", input))?;
    let (converted, tonic, conversion) =
        convert_bytes(&bytes, mode, config).with_context(|| format!("Failed to convert {:?}", input))?;
    fs::write(&output, converted).with_context(|| format!("Failed to write MIDI file: {:?}", output))?;

    Ok(ConversionReport {
        tonic,
        conversion,
        output,
    })
}

/// Infer the tonic of a MIDI file without converting it
pub fn analyze_file<P: AsRef<Path>>(input: P) -> Result<TonicAnalysis> {
    let input = input.as_ref();
    let bytes = fs::read(input).with_context(|| format!("Failed to read MIDI file: {:?}", input))?;
    let notes = MidiDocument::parse(&bytes)?.notes()?;
    analyze_tonic(&notes).with_context(|| format!("Failed to analyze {:?}", input))
}
