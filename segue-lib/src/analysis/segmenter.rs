//! Whole-track segmentation across every extracted feature channel.

use log::{debug, info, warn};

use crate::analysis::consensus::ConsensusAggregator;
use crate::analysis::frame::{average_features, FeatureKind, Frame, FrameSeries};
use crate::analysis::trend::TrendSegmenter;
use crate::constants::MIN_CHANNEL_SEGMENTS;
use crate::extract::{ExtractError, FeatureExtractor};
use crate::settings::MixSettings;
use std::collections::BTreeMap;

/// A run of consecutive frames that belong to one musical section.
#[derive(Debug, Clone)]
pub struct Segment {
    pub frames: Vec<Frame>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mean value of every feature present in the first frame.
    pub fn feature_averages(&self) -> BTreeMap<FeatureKind, f64> {
        average_features(&self.frames)
    }
}

/// The ordered segments of one track. Empty when the track has too little
/// structure for the channels to agree on boundaries.
#[derive(Debug, Clone, Default)]
pub struct TrackSegmentation {
    pub segments: Vec<Segment>,
}

impl TrackSegmentation {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Runs trend segmentation on each feature channel and keeps the
/// boundaries the channels agree on.
pub struct TrackSegmenter {
    min_seg_length: usize,
    tolerance: usize,
    threshold: f64,
}

impl TrackSegmenter {
    pub fn new(settings: &MixSettings) -> Self {
        Self {
            min_seg_length: settings.min_seg_length,
            tolerance: settings.tolerance,
            threshold: settings.threshold,
        }
    }

    /// Extract features from `samples` and segment the resulting series.
    ///
    /// # Errors
    ///
    /// Returns an error when feature extraction fails outright. A track
    /// that merely lacks structure yields an empty segmentation instead.
    pub fn segment(
        &self,
        extractor: &dyn FeatureExtractor,
        samples: &[f32],
        sample_rate: u32,
        skip_secs: f64,
    ) -> Result<TrackSegmentation, ExtractError> {
        let series = extractor.extract(samples, sample_rate)?;
        Ok(self.segment_series(&series, skip_secs))
    }

    /// Segment an already-extracted frame series, ignoring the first
    /// `skip_secs` worth of frames.
    pub fn segment_series(&self, series: &FrameSeries, skip_secs: f64) -> TrackSegmentation {
        let series = series.skipped(skip_secs.max(0.0).floor() as usize);
        let frames = series.frames();
        let Some(first) = frames.first() else {
            debug!("no frames left to segment");
            return TrackSegmentation::default();
        };

        let kinds: Vec<FeatureKind> = first.features.keys().copied().collect();
        let mut channels: Vec<Vec<_>> = Vec::new();
        let segmenter = TrendSegmenter::new(self.min_seg_length);
        for kind in &kinds {
            let values: Vec<f64> = frames
                .iter()
                .map(|frame| match frame.feature(*kind) {
                    Some(value) => value,
                    None => {
                        warn!("frame {} is missing a {} value, using 0", frame.index, kind);
                        0.0
                    }
                })
                .collect();
            let spans = segmenter.segment(&values);
            if spans.len() >= MIN_CHANNEL_SEGMENTS {
                channels.push(spans);
            } else {
                debug!("dropping {} channel: only {} segments", kind, spans.len());
            }
        }

        if channels.is_empty() {
            info!("no feature channel produced enough segments");
            return TrackSegmentation::default();
        }

        let aggregator = ConsensusAggregator::new(self.tolerance, self.threshold);
        let Some(ranges) = aggregator.consensus_ranges(&channels) else {
            info!("feature channels did not agree on segment boundaries");
            return TrackSegmentation::default();
        };

        let mut segments = Vec::with_capacity(ranges.len());
        for range in ranges {
            let end = range.end.min(frames.len() - 1);
            if range.start > end {
                continue;
            }
            segments.push(Segment {
                frames: frames[range.start..=end].to_vec(),
            });
        }
        TrackSegmentation { segments }
    }
}
