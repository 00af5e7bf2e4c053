//! Feature frames and per-track frame series.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A named audio descriptor carried by every [`Frame`].
///
/// The analysis pipeline treats the set opaquely; nothing downstream
/// special-cases a particular descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKind {
    Energy,
    Rms,
    Zcr,
    SpectralCentroid,
    SpectralRolloff,
    SpectralFlux,
}

impl FeatureKind {
    /// Every descriptor the built-in extractor produces, in map order.
    pub const ALL: [FeatureKind; 6] = [
        FeatureKind::Energy,
        FeatureKind::Rms,
        FeatureKind::Zcr,
        FeatureKind::SpectralCentroid,
        FeatureKind::SpectralRolloff,
        FeatureKind::SpectralFlux,
    ];
}

impl Display for FeatureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Energy => "energy",
            Self::Rms => "rms",
            Self::Zcr => "zcr",
            Self::SpectralCentroid => "spectral_centroid",
            Self::SpectralRolloff => "spectral_rolloff",
            Self::SpectralFlux => "spectral_flux",
        };
        write!(f, "{}", name)
    }
}

/// One timestamped set of feature values covering a fixed analysis window.
///
/// `index` is the frame's position within its owning series and is
/// renumbered when a series is sliced; `time` is absolute within the track
/// and survives slicing.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    pub time: f64,
    pub features: BTreeMap<FeatureKind, f64>,
}

impl Frame {
    /// Value of `kind` in this frame, if present.
    pub fn feature(&self, kind: FeatureKind) -> Option<f64> {
        self.features.get(&kind).copied()
    }
}

/// Ordered feature frames for one track.
///
/// Frames are expected to carry strictly increasing `time` values and
/// contiguous `index` values starting at 0; extractors construct series
/// that way.
#[derive(Debug, Clone, Default)]
pub struct FrameSeries {
    frames: Vec<Frame>,
}

impl FrameSeries {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Copy of the series without its first `count` frames.
    ///
    /// Positions are renumbered from 0; absolute times are kept.
    pub fn skipped(&self, count: usize) -> FrameSeries {
        let frames = self
            .frames
            .iter()
            .skip(count)
            .cloned()
            .enumerate()
            .map(|(index, mut frame)| {
                frame.index = index;
                frame
            })
            .collect();
        FrameSeries { frames }
    }
}

/// Average feature values over `frames`, keyed by the first frame's
/// features. Frames missing a feature, or carrying a non-finite value,
/// contribute zero.
pub(crate) fn average_features(frames: &[Frame]) -> BTreeMap<FeatureKind, f64> {
    let mut averages = BTreeMap::new();
    let Some(first) = frames.first() else {
        return averages;
    };
    let count = frames.len() as f64;
    for kind in first.features.keys() {
        let sum: f64 = frames
            .iter()
            .map(|frame| {
                frame
                    .feature(*kind)
                    .filter(|value| value.is_finite())
                    .unwrap_or(0.0)
            })
            .sum();
        averages.insert(*kind, sum / count);
    }
    averages
}
