// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Mode table.
//!
//! Each mode is expressed relative to a major (ionian) reading of the
//! source material: the scale degrees to lower by a semitone and the
//! degrees to raise by a semitone. Degrees are semitone offsets above the
//! tonic, so 4 is the major third and 11 the leading tone.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ModeShiftError, Result};

/// Set of scale degrees (0-11) stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DegreeSet(u16);

impl DegreeSet {
    /// The empty set
    pub const EMPTY: DegreeSet = DegreeSet(0);

    /// Build a set from degrees known to be in range
    const fn of(degrees: &[u8]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < degrees.len() {
            bits |= 1 << degrees[i];
            i += 1;
        }
        DegreeSet(bits)
    }

    /// Build a set from arbitrary degrees, rejecting anything above 11
    pub fn from_degrees(degrees: &[u8]) -> Result<Self> {
        let mut bits = 0u16;
        for &d in degrees {
            if d > 11 {
                return Err(ModeShiftError::InvalidDegree(d));
            }
            bits |= 1 << d;
        }
        Ok(DegreeSet(bits))
    }

    /// Check membership
    pub fn contains(self, degree: u8) -> bool {
        degree < 12 && self.0 & (1 << degree) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check that no degree is in both sets
    pub fn is_disjoint(self, other: DegreeSet) -> bool {
        self.0 & other.0 == 0
    }

    /// Degrees in ascending order
    pub fn degrees(self) -> impl Iterator<Item = u8> {
        (0..12u8).filter(move |&d| self.contains(d))
    }
}

impl TryFrom<Vec<u8>> for DegreeSet {
    type Error = ModeShiftError;

    fn try_from(degrees: Vec<u8>) -> Result<Self> {
        DegreeSet::from_degrees(&degrees)
    }
}

impl From<DegreeSet> for Vec<u8> {
    fn from(set: DegreeSet) -> Self {
        set.degrees().collect()
    }
}

impl fmt::Display for DegreeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees: Vec<String> = self.degrees().map(|d| d.to_string()).collect();
        write!(f, "{{{}}}", degrees.join(","))
    }
}

/// The degrees a mode lowers and raises, relative to the tonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeDefinition {
    lower: DegreeSet,
    raise: DegreeSet,
}

impl ModeDefinition {
    /// Create a definition, enforcing that no degree is both lowered and raised
    pub fn new(lower: DegreeSet, raise: DegreeSet) -> Result<Self> {
        if !lower.is_disjoint(raise) {
            return Err(ModeShiftError::OverlappingDegrees(DegreeSet(lower.0 & raise.0).to_string()));
        }
        Ok(Self { lower, raise })
    }

    const fn fixed(lower: &[u8], raise: &[u8]) -> Self {
        Self {
            lower: DegreeSet::of(lower),
            raise: DegreeSet::of(raise),
        }
    }

    /// Degrees lowered by one semitone
    pub fn lower(&self) -> DegreeSet {
        self.lower
    }

    /// Degrees raised by one semitone
    pub fn raise(&self) -> DegreeSet {
        self.raise
    }

    /// True when the mode changes nothing
    pub fn is_identity(&self) -> bool {
        self.lower.is_empty() && self.raise.is_empty()
    }

    /// Semitone shift for a note at the given degree (-1, 0 or +1)
    pub fn shift_for(&self, degree: u8) -> i8 {
        if self.lower.contains(degree) {
            -1
        } else if self.raise.contains(degree) {
            1
        } else {
            0
        }
    }
}

/// Built-in modes, in menu order
const BUILTIN_MODES: [(&str, ModeDefinition); 9] = [
    ("ionian", ModeDefinition::fixed(&[], &[])),
    ("aeolian", ModeDefinition::fixed(&[4, 9, 11], &[])),
    ("harmonic_minor", ModeDefinition::fixed(&[4, 9], &[])),
    ("dorian", ModeDefinition::fixed(&[4, 11], &[])),
    ("phrygian", ModeDefinition::fixed(&[2, 4, 9, 11], &[])),
    ("lydian", ModeDefinition::fixed(&[], &[5])),
    ("mixolydian", ModeDefinition::fixed(&[11], &[])),
    ("locrian", ModeDefinition::fixed(&[2, 4, 7, 9, 11], &[])),
    // Minor source material to major
    ("major", ModeDefinition::fixed(&[], &[3, 8, 10])),
];

static BUILTIN_REGISTRY: Lazy<ModeRegistry> = Lazy::new(ModeRegistry::with_builtins);

/// A user-supplied mode, e.g. from a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomModeDefinition {
    /// Identifier used to select the mode
    pub name: String,
    /// Degrees to lower
    #[serde(default)]
    pub lower: DegreeSet,
    /// Degrees to raise
    #[serde(default)]
    pub raise: DegreeSet,
}

/// Read-only mapping from mode identifier to definition
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: BTreeMap<String, ModeDefinition>,
}

impl ModeRegistry {
    /// The process-wide registry of built-in modes
    pub fn builtin() -> &'static ModeRegistry {
        &BUILTIN_REGISTRY
    }

    /// A registry holding only the built-in modes
    pub fn with_builtins() -> Self {
        let modes = BUILTIN_MODES
            .iter()
            .map(|(id, def)| (id.to_string(), *def))
            .collect();
        Self { modes }
    }

    /// Built-ins plus custom definitions. Custom names may not shadow built-ins.
    pub fn with_custom(custom: &[CustomModeDefinition]) -> Result<Self> {
        let mut registry = Self::with_builtins();
        for def in custom {
            let id = normalize_id(&def.name);
            let invalid = |reason: String| ModeShiftError::InvalidModeDefinition {
                name: def.name.clone(),
                reason,
            };
            if id.is_empty() {
                return Err(invalid("mode name is empty".to_string()));
            }
            if registry.modes.contains_key(&id) {
                return Err(invalid("name is already registered".to_string()));
            }
            let definition = ModeDefinition::new(def.lower, def.raise).map_err(|e| invalid(e.to_string()))?;
            registry.modes.insert(id, definition);
        }
        Ok(registry)
    }

    /// Look up a mode definition by identifier
    pub fn lookup(&self, mode_id: &str) -> Result<ModeDefinition> {
        self.resolve(mode_id).map(|(_, def)| def)
    }

    /// Look up a mode, returning its canonical identifier alongside the definition
    pub fn resolve(&self, mode_id: &str) -> Result<(&str, ModeDefinition)> {
        let id = normalize_id(mode_id);
        self.modes
            .get_key_value(&id)
            .map(|(k, v)| (k.as_str(), *v))
            .ok_or_else(|| ModeShiftError::UnsupportedMode(mode_id.to_string()))
    }

    /// Resolve either a preset number ("1"-"9") or a mode identifier
    pub fn resolve_choice(&self, choice: &str) -> Result<(&str, ModeDefinition)> {
        match ConversionPreset::find(choice) {
            Some(preset) => self.resolve(preset.mode),
            None => self.resolve(choice),
        }
    }

    pub fn contains(&self, mode_id: &str) -> bool {
        self.modes.contains_key(&normalize_id(mode_id))
    }

    /// All registered identifiers, sorted
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// Look up a built-in mode
pub fn lookup_mode(mode_id: &str) -> Result<ModeDefinition> {
    ModeRegistry::builtin().lookup(mode_id)
}

/// Human-readable label for a mode identifier ("harmonic_minor" -> "harmonic minor")
pub fn mode_label(mode_id: &str) -> String {
    mode_id.replace('_', " ")
}

fn normalize_id(mode_id: &str) -> String {
    mode_id.trim().to_lowercase().replace([' ', '-'], "_")
}

/// A numbered conversion choice as offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPreset {
    /// Selection key
    pub key: &'static str,
    /// What the conversion does
    pub description: &'static str,
    /// Target mode identifier
    pub mode: &'static str,
}

impl ConversionPreset {
    pub const ALL: [ConversionPreset; 9] = [
        ConversionPreset::new("1", "Major → Natural minor (Aeolian)", "aeolian"),
        ConversionPreset::new("2", "Major → Harmonic minor", "harmonic_minor"),
        ConversionPreset::new("3", "Minor → Major", "major"),
        ConversionPreset::new("4", "Major → Dorian", "dorian"),
        ConversionPreset::new("5", "Major → Phrygian", "phrygian"),
        ConversionPreset::new("6", "Major → Lydian", "lydian"),
        ConversionPreset::new("7", "Major → Mixolydian", "mixolydian"),
        ConversionPreset::new("8", "Major → Locrian", "locrian"),
        ConversionPreset::new("9", "No conversion (Ionian)", "ionian"),
    ];

    const fn new(key: &'static str, description: &'static str, mode: &'static str) -> Self {
        Self {
            key,
            description,
            mode,
        }
    }

    /// Find a preset by its selection key
    pub fn find(key: &str) -> Option<&'static ConversionPreset> {
        let key = key.trim();
        Self::ALL.iter().find(|p| p.key == key)
    }
}

impl fmt::Display for ConversionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.description)
    }
}
