// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file reading and in-place pitch rewriting.
//!
//! A parsed file yields a `NoteCollection` whose notes remember the
//! note-on/note-off events they came from. After conversion the new
//! pitches are written back onto exactly those events, so everything else
//! in the file (timing, controllers, meta events) survives unchanged.

use std::collections::{HashMap, VecDeque};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::error::{ModeShiftError, Result};
use crate::notes::{EventRef, Instrument, Note, NoteCollection};

/// A parsed MIDI file borrowing its source bytes
#[derive(Debug, Clone)]
pub struct MidiDocument<'a> {
    smf: Smf<'a>,
}

impl<'a> MidiDocument<'a> {
    /// Parse a Standard MIDI File
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let smf = Smf::parse(bytes).map_err(|e| ModeShiftError::Midi(format!("Failed to parse MIDI: {}", e)))?;
        Ok(Self { smf })
    }

    /// Number of track chunks
    pub fn track_count(&self) -> usize {
        self.smf.tracks.len()
    }

    /// Ticks per quarter note, for metrical files
    pub fn ticks_per_beat(&self) -> Option<u16> {
        match self.smf.header.timing {
            Timing::Metrical(tpb) => Some(tpb.as_int()),
            Timing::Timecode(..) => None,
        }
    }

    /// Collect the notes of every track, one instrument per track and channel.
    ///
    /// Note-on with velocity 0 ends a note. Repeated note-ons of the same key
    /// are closed first-in first-out. Notes still sounding when the track
    /// ends are closed at the track's last tick.
    pub fn notes(&self) -> Result<NoteCollection> {
        let mut collection = NoteCollection::new();

        for (track_index, track) in self.smf.tracks.iter().enumerate() {
            let mut track_name = String::new();
            let mut programs = [0u8; 16];
            let mut instruments: Vec<Instrument> = Vec::new();
            let mut by_channel: HashMap<u8, usize> = HashMap::new();
            let mut open: HashMap<(u8, u8), VecDeque<(usize, usize)>> = HashMap::new();
            let mut tick = 0u64;

            for (event_index, event) in track.iter().enumerate() {
                tick += event.delta.as_int() as u64;

                let (channel, message) = match event.kind {
                    TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                        track_name = String::from_utf8_lossy(name).into_owned();
                        continue;
                    }
                    TrackEventKind::Midi { channel, message } => (channel.as_int(), message),
                    _ => continue,
                };

                match message {
                    MidiMessage::ProgramChange { program } => {
                        programs[channel as usize] = program.as_int();
                    }
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        let slot = *by_channel.entry(channel).or_insert_with(|| {
                            instruments.push(Instrument::new("", channel).with_program(programs[channel as usize]));
                            instruments.len() - 1
                        });
                        let mut note = Note::new(key.as_int(), vel.as_int(), tick, tick)?;
                        note.source = Some(EventRef {
                            track: track_index,
                            note_on: event_index,
                            note_off: None,
                        });
                        let notes = &mut instruments[slot].notes;
                        notes.push(note);
                        open.entry((channel, key.as_int()))
                            .or_default()
                            .push_back((slot, notes.len() - 1));
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let pending = open.get_mut(&(channel, key.as_int())).and_then(VecDeque::pop_front);
                        if let Some((slot, index)) = pending {
                            let note = &mut instruments[slot].notes[index];
                            note.end_tick = tick;
                            if let Some(source) = note.source.as_mut() {
                                source.note_off = Some(event_index);
                            }
                        }
                    }
                    _ => {}
                }
            }

            let unterminated: usize = open.values().map(VecDeque::len).sum();
            if unterminated > 0 {
                tracing::warn!(track = track_index, unterminated, "Notes still sounding at end of track");
                for (slot, index) in open.into_values().flatten() {
                    instruments[slot].notes[index].end_tick = tick;
                }
            }

            for mut instrument in instruments {
                instrument.name = track_name.clone();
                tracing::debug!(
                    track = track_index,
                    channel = instrument.channel,
                    notes = instrument.notes.len(),
                    "Read instrument"
                );
                collection.add_instrument(instrument);
            }
        }

        Ok(collection)
    }

    /// Write each note's pitch back onto the events it was read from.
    ///
    /// Notes that did not come from this document are skipped. Returns the
    /// number of notes written.
    pub fn apply_pitches(&mut self, notes: &NoteCollection) -> Result<usize> {
        let mut written = 0;
        for note in notes.notes() {
            let Some(source) = note.source else {
                continue;
            };
            let track = self
                .smf
                .tracks
                .get_mut(source.track)
                .ok_or_else(|| ModeShiftError::Midi(format!("Note refers to missing track {}", source.track)))?;

            for index in std::iter::once(source.note_on).chain(source.note_off) {
                let event = track
                    .get_mut(index)
                    .ok_or_else(|| ModeShiftError::Midi(format!("Note refers to missing event {}", index)))?;
                if !set_key(event, note.pitch()) {
                    return Err(ModeShiftError::Midi(format!(
                        "Event {} in track {} is not a note event",
                        index, source.track
                    )));
                }
            }
            written += 1;
        }
        Ok(written)
    }

    /// Encode the document back into Standard MIDI File bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.smf
            .write(&mut out)
            .map_err(|e| ModeShiftError::Midi(format!("Failed to write MIDI: {}", e)))?;
        Ok(out)
    }
}

fn set_key(event: &mut TrackEvent<'_>, pitch: u8) -> bool {
    match &mut event.kind {
        TrackEventKind::Midi {
            message: MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. },
            ..
        } => {
            *key = pitch.into();
            true
        }
        _ => false,
    }
}

/// Append ".mid" unless the path already ends in it (any case)
pub fn ensure_mid_extension<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let has_mid = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("mid"))
        .unwrap_or(false);
    if has_mid {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".mid");
    PathBuf::from(name)
}
