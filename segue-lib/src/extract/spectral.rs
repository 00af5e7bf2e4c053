//! Windowed spectral and time-domain feature extraction.

use std::collections::BTreeMap;

use log::warn;
use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

use crate::analysis::{FeatureKind, Frame, FrameSeries};
use crate::extract::{ExtractError, FeatureExtractor};

/// Extracts one feature frame per fixed-length analysis window.
///
/// Each window yields energy, RMS level, and zero-crossing rate from the
/// time domain, and centroid, rolloff, and flux from the magnitude
/// spectrum. Windows containing non-finite samples are skipped; the frames
/// that follow close the gap in index while keeping their absolute times.
pub struct SpectralAnalyzer {
    window_secs: f64,
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self { window_secs: 1.0 }
    }
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer with a custom window length in seconds.
    pub fn with_window_secs(window_secs: f64) -> Self {
        Self { window_secs }
    }
}

impl FeatureExtractor for SpectralAnalyzer {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FrameSeries, ExtractError> {
        if samples.is_empty() {
            return Err(ExtractError::InvalidInput("no samples".into()));
        }
        if sample_rate == 0 {
            return Err(ExtractError::InvalidInput("sample rate is zero".into()));
        }
        let window_len = (self.window_secs * f64::from(sample_rate)).round() as usize;
        if window_len == 0 {
            return Err(ExtractError::InvalidInput(
                "analysis window is shorter than one sample".into(),
            ));
        }

        let mut real_planner = RealFftPlanner::<f32>::new();
        let r2c = real_planner.plan_fft_forward(window_len);
        let spectrum_len = window_len / 2 + 1;
        let bin_hz = f64::from(sample_rate) / window_len as f64;

        let mut frames: Vec<Frame> = Vec::new();
        let mut previous_magnitudes: Option<Vec<f64>> = None;
        for (position, window) in samples.chunks_exact(window_len).enumerate() {
            let time = position as f64 * self.window_secs;
            if window.iter().any(|sample| !sample.is_finite()) {
                warn!("skipping window at {:.1}s: non-finite samples", time);
                previous_magnitudes = None;
                continue;
            }

            // The forward transform consumes its input, so feed it a copy
            // and keep the window for the time-domain features.
            let mut time_domain = window.to_vec();
            let mut spectrum = vec![Complex { re: 0.0, im: 0.0 }; spectrum_len];
            if let Err(err) = r2c.process(&mut time_domain, &mut spectrum) {
                warn!("skipping window at {:.1}s: {}", time, err);
                previous_magnitudes = None;
                continue;
            }
            let magnitudes: Vec<f64> = spectrum.iter().map(|bin| f64::from(bin.norm())).collect();

            let energy: f64 = window
                .iter()
                .map(|sample| f64::from(*sample) * f64::from(*sample))
                .sum();
            let flux = match &previous_magnitudes {
                Some(previous) => spectral_flux(&magnitudes, previous),
                None => 0.0,
            };

            let mut features = BTreeMap::new();
            features.insert(FeatureKind::Energy, energy);
            features.insert(FeatureKind::Rms, (energy / window_len as f64).sqrt());
            features.insert(FeatureKind::Zcr, zero_crossings(window) as f64);
            features.insert(
                FeatureKind::SpectralCentroid,
                spectral_centroid(&magnitudes, bin_hz),
            );
            features.insert(
                FeatureKind::SpectralRolloff,
                spectral_rolloff(&magnitudes, bin_hz),
            );
            features.insert(FeatureKind::SpectralFlux, flux);

            frames.push(Frame {
                index: frames.len(),
                time,
                features,
            });
            previous_magnitudes = Some(magnitudes);
        }

        Ok(FrameSeries::new(frames))
    }
}

/// Number of sign changes between consecutive samples.
fn zero_crossings(window: &[f32]) -> usize {
    window
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count()
}

/// Magnitude-weighted mean frequency, in Hz. Zero for a silent spectrum.
fn spectral_centroid(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let weighted: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(bin, magnitude)| bin as f64 * bin_hz * magnitude)
        .sum();
    weighted / total
}

/// Frequency below which 85% of the spectral power sits, in Hz.
fn spectral_rolloff(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let total: f64 = magnitudes.iter().map(|magnitude| magnitude * magnitude).sum();
    if total == 0.0 {
        return 0.0;
    }
    let threshold = 0.85 * total;
    let mut cumulative = 0.0;
    for (bin, magnitude) in magnitudes.iter().enumerate() {
        cumulative += magnitude * magnitude;
        if cumulative >= threshold {
            return bin as f64 * bin_hz;
        }
    }
    (magnitudes.len() - 1) as f64 * bin_hz
}

/// Squared spectral difference from the previous window.
fn spectral_flux(magnitudes: &[f64], previous: &[f64]) -> f64 {
    magnitudes
        .iter()
        .zip(previous)
        .map(|(current, prior)| (current - prior) * (current - prior))
        .sum()
}
