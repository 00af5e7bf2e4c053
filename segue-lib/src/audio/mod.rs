//! Decoded audio tracks.

mod decode;

pub use decode::{decode_file, DecodeError};

/// A decoded track: mono float samples plus the rate they were decoded at.
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Track {
    pub fn new(name: impl Into<String>, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            name: name.into(),
            samples,
            sample_rate,
        }
    }

    /// Track length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}
