//! Feature extraction from raw sample buffers.

use std::fmt;

use crate::analysis::FrameSeries;

mod spectral;

pub use spectral::SpectralAnalyzer;

/// Errors raised while turning samples into feature frames.
#[derive(Debug)]
pub enum ExtractError {
    InvalidInput(String),
    Fft(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidInput(message) => {
                write!(f, "invalid extractor input: {}", message)
            }
            ExtractError::Fft(message) => write!(f, "fft error: {}", message),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Anything that can turn a sample buffer into a frame series.
///
/// The mix planner only depends on this trait, so tests can feed it
/// hand-built series and alternative analyzers can slot in without
/// touching the planning code.
pub trait FeatureExtractor {
    /// Extract one frame per analysis window from `samples`.
    ///
    /// # Errors
    ///
    /// Implementations reject input they cannot analyze at all; windows
    /// that fail individually are skipped instead.
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FrameSeries, ExtractError>;
}
