//! Mix configuration, loadable from JSON.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Error type for settings IO, parsing, and validation.
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Parse(err) => write!(f, "settings parse error: {}", err),
            Self::Invalid(err) => write!(f, "invalid settings: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunable parameters for segmentation, mix discovery, and rendering.
///
/// Every field falls back to its default when missing from a settings file,
/// so partial files are fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Minimum trend segment length, in frames.
    pub min_seg_length: usize,
    /// Maximum distance (frames) between boundary indices treated as the
    /// same boundary.
    pub tolerance: usize,
    /// Fraction of feature channels that must corroborate a boundary.
    pub threshold: f64,
    /// Fade-in envelope length in seconds.
    pub fade_in_secs: f64,
    /// Fade-out envelope length in seconds.
    pub fade_out_secs: f64,
    /// Lead-in before the matched section of the incoming track, in seconds.
    pub pre_roll_secs: f64,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            min_seg_length: 5,
            tolerance: 2,
            threshold: 0.6,
            fade_in_secs: 5.0,
            fade_out_secs: 7.0,
            pre_roll_secs: 3.0,
        }
    }
}

impl MixSettings {
    /// Load and validate settings from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn from_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate settings from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: MixSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    /// Returns `SettingsError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_seg_length < 3 {
            return Err(SettingsError::Invalid(
                "min_seg_length must be at least 3".to_string(),
            ));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(SettingsError::Invalid(
                "threshold must be within (0, 1]".to_string(),
            ));
        }
        for (name, value) in [
            ("fade_in_secs", self.fade_in_secs),
            ("fade_out_secs", self.fade_out_secs),
            ("pre_roll_secs", self.pre_roll_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{} must be a finite value >= 0",
                    name
                )));
            }
        }
        Ok(())
    }
}
