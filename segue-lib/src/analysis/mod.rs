//! Feature-series analysis: framing, trend segmentation, and consensus.

mod consensus;
mod frame;
mod segmenter;
mod trend;

pub use consensus::ConsensusAggregator;
pub use frame::{FeatureKind, Frame, FrameSeries};
pub use segmenter::{Segment, TrackSegmentation, TrackSegmenter};
pub use trend::TrendSegmenter;

pub(crate) use frame::average_features;

use log::warn;

/// An inclusive range of frame indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    pub start: usize,
    pub end: usize,
}

/// Round to two decimal places. Non-finite values collapse to zero.
pub(crate) fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        warn!("non-finite feature value replaced with 0");
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}
