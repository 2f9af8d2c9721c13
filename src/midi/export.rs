// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes a note collection that has no source file as a Type 0 or Type 1
//! MIDI file. Converted files normally go through `MidiDocument` instead,
//! which keeps the original events.

use std::fs;
use std::path::Path;

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

use crate::error::{ModeShiftError, Result};
use crate::notes::{Instrument, NoteCollection};

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Tempo track plus one track per instrument
    #[default]
    Type1,
}

/// Note collection exporter
#[derive(Debug, Clone)]
pub struct MidiExporter {
    format: MidiFileFormat,
    ppqn: u16,
    tempo: f64,
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiExporter {
    /// Create an exporter writing Type 1 files at 480 PPQN and 120 BPM
    pub fn new() -> Self {
        Self {
            format: MidiFileFormat::Type1,
            ppqn: 480,
            tempo: 120.0,
        }
    }

    pub fn format(&self) -> MidiFileFormat {
        self.format
    }

    pub fn set_format(&mut self, format: MidiFileFormat) {
        self.format = format;
    }

    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Set PPQN (1-32767)
    pub fn set_ppqn(&mut self, ppqn: u16) {
        self.ppqn = ppqn.clamp(1, 0x7FFF);
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Set tempo in BPM
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = bpm.clamp(20.0, 300.0);
    }

    /// Export to a file
    pub fn export<P: AsRef<Path>>(&self, notes: &NoteCollection, path: P) -> Result<()> {
        let bytes = self.export_to_bytes(notes)?;
        fs::write(path.as_ref(), bytes)
            .map_err(|e| ModeShiftError::Midi(format!("Failed to write {:?}: {}", path.as_ref(), e)))
    }

    /// Export to bytes. Type 0 files carry no track names, since all
    /// instruments share the one track.
    pub fn export_to_bytes(&self, notes: &NoteCollection) -> Result<Vec<u8>> {
        let (format, tracks) = match self.format {
            MidiFileFormat::Type0 => {
                let mut events: Vec<(u64, u8, TrackEventKind<'_>)> = self.tempo_events();
                for instrument in &notes.instruments {
                    events.extend(instrument_events(instrument, false));
                }
                (Format::SingleTrack, vec![finish_track(events)?])
            }
            MidiFileFormat::Type1 => {
                let mut tracks = vec![finish_track(self.tempo_events())?];
                for instrument in &notes.instruments {
                    tracks.push(finish_track(instrument_events(instrument, true))?);
                }
                (Format::Parallel, tracks)
            }
        };

        let smf = Smf {
            header: Header {
                format,
                timing: Timing::Metrical(self.ppqn.into()),
            },
            tracks,
        };

        let mut out = Vec::new();
        smf.write(&mut out)
            .map_err(|e| ModeShiftError::Midi(format!("Failed to write MIDI: {}", e)))?;
        Ok(out)
    }

    fn tempo_events(&self) -> Vec<(u64, u8, TrackEventKind<'static>)> {
        let microseconds = (60_000_000.0 / self.tempo) as u32;
        vec![(0, 0, TrackEventKind::Meta(MetaMessage::Tempo(microseconds.into())))]
    }
}

/// Absolute-tick events for one instrument. The middle field orders events
/// sharing a tick: meta, program, note-off, zero-length notes, then note-on.
/// A zero-length note opens and closes before any other note starts, so
/// its note-off cannot end a neighbouring note of the same key.
fn instrument_events(instrument: &Instrument, named: bool) -> Vec<(u64, u8, TrackEventKind<'_>)> {
    let channel = instrument.channel.into();
    let mut events = Vec::with_capacity(instrument.notes.len() * 2 + 2);

    if named && !instrument.name.is_empty() {
        events.push((0, 0, TrackEventKind::Meta(MetaMessage::TrackName(instrument.name.as_bytes()))));
    }
    events.push((
        0,
        1,
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: instrument.program.into(),
            },
        },
    ));

    for note in &instrument.notes {
        let zero_length = note.end_tick <= note.start_tick;
        let (on_order, off_order) = if zero_length { (3, 4) } else { (5, 2) };
        events.push((
            note.start_tick,
            on_order,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: note.pitch().into(),
                    vel: note.velocity.clamp(1, 127).into(),
                },
            },
        ));
        events.push((
            note.end_tick.max(note.start_tick),
            off_order,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: note.pitch().into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    events
}

/// Largest delta time a variable-length quantity can hold
const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Sort absolute events, convert to deltas and terminate the track
fn finish_track(mut events: Vec<(u64, u8, TrackEventKind<'_>)>) -> Result<Track<'_>> {
    events.sort_by_key(|(tick, order, _)| (*tick, *order));

    let mut track = Vec::with_capacity(events.len() + 1);
    let mut last_tick = 0u64;
    for (tick, _, kind) in events {
        let gap = tick - last_tick;
        if gap > MAX_DELTA {
            return Err(ModeShiftError::Midi(format!(
                "Gap of {} ticks before tick {} exceeds the maximum delta of {}",
                gap, tick, MAX_DELTA
            )));
        }
        let delta = gap as u32;
        track.push(TrackEvent {
            delta: delta.into(),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::MidiDocument;
    use crate::notes::Note;

    fn sample() -> NoteCollection {
        let mut piano = Instrument::new("Piano", 0).with_program(1);
        piano.add_note(Note::new(60, 100, 0, 480).unwrap());
        piano.add_note(Note::new(64, 100, 480, 960).unwrap());

        let mut bass = Instrument::new("Bass", 1).with_program(33);
        bass.add_note(Note::new(36, 110, 0, 960).unwrap());

        vec![piano, bass].into_iter().collect()
    }

    #[test]
    fn test_exporter_defaults() {
        let exporter = MidiExporter::new();
        assert_eq!(exporter.format(), MidiFileFormat::Type1);
        assert_eq!(exporter.ppqn(), 480);
        assert_eq!(exporter.tempo(), 120.0);
    }

    #[test]
    fn test_exporter_clamps_settings() {
        let mut exporter = MidiExporter::new();
        exporter.set_tempo(1000.0);
        exporter.set_ppqn(0);
        assert_eq!(exporter.tempo(), 300.0);
        assert_eq!(exporter.ppqn(), 1);
    }

    #[test]
    fn test_type1_round_trip() {
        let bytes = MidiExporter::new().export_to_bytes(&sample()).unwrap();
        assert_eq!(&bytes[0..4], b"MThd");

        let doc = MidiDocument::parse(&bytes).unwrap();
        assert_eq!(doc.track_count(), 3);

        let notes = doc.notes().unwrap();
        assert_eq!(notes.instruments.len(), 2);
        assert_eq!(notes.instruments[0].name, "Piano");
        assert_eq!(notes.instruments[1].program, 33);
        assert_eq!(notes.pitches(), vec![60, 64, 36]);
        let ticks: Vec<(u64, u64)> = notes.notes().map(|n| (n.start_tick, n.end_tick)).collect();
        assert_eq!(ticks, vec![(0, 480), (480, 960), (0, 960)]);
    }

    #[test]
    fn test_type0_single_track() {
        let mut exporter = MidiExporter::new();
        exporter.set_format(MidiFileFormat::Type0);
        let bytes = exporter.export_to_bytes(&sample()).unwrap();

        let doc = MidiDocument::parse(&bytes).unwrap();
        assert_eq!(doc.track_count(), 1);
        let notes = doc.notes().unwrap();
        assert_eq!(notes.note_count(), 3);
        assert_eq!(notes.instruments.len(), 2);
    }

    #[test]
    fn test_back_to_back_notes_stay_separate() {
        let mut lead = Instrument::new("Lead", 0);
        lead.add_note(Note::new(60, 100, 0, 480).unwrap());
        lead.add_note(Note::new(60, 100, 480, 960).unwrap());
        let notes: NoteCollection = std::iter::once(lead).collect();

        let bytes = MidiExporter::new().export_to_bytes(&notes).unwrap();
        let reread = MidiDocument::parse(&bytes).unwrap().notes().unwrap();
        let ticks: Vec<(u64, u64)> = reread.notes().map(|n| (n.start_tick, n.end_tick)).collect();
        assert_eq!(ticks, vec![(0, 480), (480, 960)]);
    }

    fn reread_ticks(notes: &NoteCollection) -> Vec<(u64, u64)> {
        let bytes = MidiExporter::new().export_to_bytes(notes).unwrap();
        let reread = MidiDocument::parse(&bytes).unwrap().notes().unwrap();
        reread.notes().map(|n| (n.start_tick, n.end_tick)).collect()
    }

    #[test]
    fn test_zero_length_note_survives() {
        let mut lead = Instrument::new("Lead", 0);
        lead.add_note(Note::new(60, 100, 240, 240).unwrap());
        let notes: NoteCollection = std::iter::once(lead).collect();
        assert_eq!(reread_ticks(&notes), vec![(240, 240)]);
    }

    #[test]
    fn test_zero_length_note_between_same_key_notes() {
        let mut lead = Instrument::new("Lead", 0);
        lead.add_note(Note::new(60, 100, 0, 480).unwrap());
        lead.add_note(Note::new(60, 90, 480, 960).unwrap());
        // Listed last, but sits exactly where the other two meet
        lead.add_note(Note::new(60, 80, 480, 480).unwrap());
        let notes: NoteCollection = std::iter::once(lead).collect();

        let bytes = MidiExporter::new().export_to_bytes(&notes).unwrap();
        let reread = MidiDocument::parse(&bytes).unwrap().notes().unwrap();
        let ticks: Vec<(u64, u64, u8)> = reread
            .notes()
            .map(|n| (n.start_tick, n.end_tick, n.velocity))
            .collect();
        assert_eq!(ticks, vec![(0, 480, 100), (480, 480, 80), (480, 960, 90)]);
    }

    #[test]
    fn test_oversized_gap_is_an_error() {
        let mut lead = Instrument::new("Lead", 0);
        lead.add_note(Note::new(60, 100, 0, 480).unwrap());
        lead.add_note(Note::new(62, 100, 480 + MAX_DELTA + 1, 960 + MAX_DELTA).unwrap());
        let notes: NoteCollection = std::iter::once(lead).collect();

        let err = MidiExporter::new().export_to_bytes(&notes).unwrap_err();
        assert!(matches!(err, ModeShiftError::Midi(_)));

        // The largest representable gap still exports exactly
        let mut far = Instrument::new("Far", 0);
        far.add_note(Note::new(60, 100, MAX_DELTA, MAX_DELTA + 10).unwrap());
        let notes: NoteCollection = std::iter::once(far).collect();
        assert_eq!(reread_ticks(&notes), vec![(MAX_DELTA, MAX_DELTA + 10)]);
    }

    #[test]
    fn test_type0_drops_track_names() {
        let mut exporter = MidiExporter::new();
        exporter.set_format(MidiFileFormat::Type0);
        let bytes = exporter.export_to_bytes(&sample()).unwrap();
        let notes = MidiDocument::parse(&bytes).unwrap().notes().unwrap();
        assert!(notes.instruments.iter().all(|i| i.name.is_empty()));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.mid");
        MidiExporter::new().export(&sample(), &path).unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"MThd"));
    }
}
