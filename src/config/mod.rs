// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Converter configuration.
//!
//! Settings can be written as TOML or YAML; the format is picked from the
//! file extension. Every field has a default, so an empty file is valid.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::music::{CustomModeDefinition, ModeRegistry};
use crate::transform::OverflowPolicy;

/// Root configuration for the converter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Mode used when none is given on the command line
    pub default_mode: String,
    /// Handling of notes pushed outside 0-127
    pub overflow: OverflowPolicy,
    /// Extra modes registered alongside the built-in ones
    pub modes: Vec<CustomModeDefinition>,
}

fn default_mode() -> String {
    "aeolian".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            overflow: OverflowPolicy::default(),
            modes: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Load a configuration file, TOML or YAML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            Some("toml") => Self::from_toml(&contents)?,
            other => bail!("Unsupported config format {:?} for {:?}", other, path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse TOML configuration")
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save to a file, TOML or YAML by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => self.to_yaml()?,
            _ => self.to_toml()?,
        };
        fs::write(path, contents).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Build the mode registry this configuration describes
    pub fn registry(&self) -> Result<ModeRegistry> {
        ModeRegistry::with_custom(&self.modes).context("Invalid custom mode")
    }

    /// Check that the custom modes are well formed and the default mode exists
    pub fn validate(&self) -> Result<()> {
        let registry = self.registry()?;
        if !registry.contains(&self.default_mode) {
            bail!("Default mode '{}' is not a known mode", self.default_mode);
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.default_mode, "aeolian");
        assert_eq!(config.overflow, OverflowPolicy::Reject);
        assert!(config.modes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ConverterConfig::from_toml("").unwrap();
        assert_eq!(config, ConverterConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
default_mode = "dorian"
overflow = "clamp"

[[modes]]
name = "melodic_minor"
lower = [4]

[[modes]]
name = "lydian_dominant"
lower = [11]
raise = [5]
"#;
        let config = ConverterConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.default_mode, "dorian");
        assert_eq!(config.overflow, OverflowPolicy::Clamp);
        assert_eq!(config.modes.len(), 2);
        assert!(config.modes[0].raise.is_empty());

        let registry = config.registry().unwrap();
        let def = registry.lookup("lydian_dominant").unwrap();
        assert_eq!(def.shift_for(5), 1);
        assert_eq!(def.shift_for(11), -1);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
default_mode: melodic_minor
modes:
  - name: melodic_minor
    lower: [4]
"#;
        let config = ConverterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.overflow, OverflowPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_degree_out_of_range_fails_to_parse() {
        let toml_str = r#"
[[modes]]
name = "broken"
lower = [12]
"#;
        let err = ConverterConfig::from_toml(toml_str).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("scale degree 12 is outside 0-11"), "{}", message);
        assert!(!message.contains("''"), "{}", message);
    }

    #[test]
    fn test_validate_rejects_overlap_and_unknown_default() {
        let overlap = ConverterConfig::from_toml(
            r#"
[[modes]]
name = "confused"
lower = [4]
raise = [4]
"#,
        )
        .unwrap();
        assert!(overlap.validate().is_err());

        let unknown = ConverterConfig {
            default_mode: "dummy".to_string(),
            ..Default::default()
        };
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConverterConfig::from_toml(
            r#"
default_mode = "phrygian"
[[modes]]
name = "neapolitan"
lower = [2]
"#,
        )
        .unwrap();
        let serialized = config.to_toml().unwrap();
        assert_eq!(ConverterConfig::from_toml(&serialized).unwrap(), config);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modeshift.yaml");

        let config = ConverterConfig {
            default_mode: "mixolydian".to_string(),
            overflow: OverflowPolicy::Clamp,
            modes: Vec::new(),
        };
        config.save(&path).unwrap();
        assert_eq!(ConverterConfig::load(&path).unwrap(), config);

        let bad = dir.path().join("modeshift.ini");
        fs::write(&bad, "").unwrap();
        assert!(ConverterConfig::load(&bad).is_err());
    }
}
