//! Shared constants for the mix search and the encode pipeline.

/// Fraction of the average inter-segment distance below which a segment pair
/// counts as a mix-point candidate.
pub const DISTANCE_RATIO: f64 = 0.2;

/// Minimum similarity (percent) the segments following a candidate pair must
/// reach for the candidate to be kept.
pub const CONTINUATION_MIN_SIMILARITY: f64 = 60.0;

/// Number of frames compared when refining a mix point to a frame offset.
pub const REFINE_WINDOW_FRAMES: usize = 7;

/// Minimum number of segments a feature channel must produce before it is
/// trusted for boundary consensus.
pub const MIN_CHANNEL_SEGMENTS: usize = 4;

/// Number of samples handed to an encoder per call, one MPEG-1 Layer III
/// frame.
pub const ENCODER_CHUNK_SAMPLES: usize = 1152;
