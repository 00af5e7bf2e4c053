//! Refining a segment-level mix point into exact fade timestamps.

use std::collections::BTreeMap;

use log::info;

use crate::analysis::{average_features, FeatureKind, TrackSegmentation};
use crate::constants::REFINE_WINDOW_FRAMES;
use crate::mix::point::find_mix_point;

/// Concrete times, in seconds, for fading between two tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixTime {
    /// When the outgoing track starts fading out.
    pub fade_out_time: f64,
    /// When the incoming track enters, pre-roll already applied.
    pub fade_in_time: f64,
    /// Timestamp of the incoming track's last analyzed frame.
    pub reference_end_time: f64,
}

/// Turn the best segment pair into fade timestamps.
///
/// The first frames of B's matched segment form a target window that slides
/// over A's matched segment; the fade-out starts where the two windows sound
/// most alike. The fade-in starts `pre_roll_secs` before B's matched segment
/// so the incoming track is already moving when it becomes audible.
///
/// Returns `None` when no mix point exists or when either matched segment
/// is shorter than the refinement window.
pub fn find_mix_time(
    a: &TrackSegmentation,
    b: &TrackSegmentation,
    pre_roll_secs: f64,
) -> Option<MixTime> {
    let point = find_mix_point(a, b)?;
    let a_seg = &a.segments[point.segment_a];
    let b_seg = &b.segments[point.segment_b];
    if a_seg.len() < REFINE_WINDOW_FRAMES || b_seg.len() < REFINE_WINDOW_FRAMES {
        info!(
            "matched segments too short to refine: {} and {} frames",
            a_seg.len(),
            b_seg.len()
        );
        return None;
    }

    let target = average_features(&b_seg.frames[..REFINE_WINDOW_FRAMES]);
    let mut best_offset = 0;
    let mut best_score = 0.0;
    for offset in 0..=a_seg.len() - REFINE_WINDOW_FRAMES {
        let window = &a_seg.frames[offset..offset + REFINE_WINDOW_FRAMES];
        let score = window_similarity(&target, &average_features(window));
        if score > best_score {
            best_score = score;
            best_offset = offset;
        }
    }

    let fade_out_time = a_seg.frames[best_offset].time;
    let fade_in_time = (b_seg.frames[0].time - pre_roll_secs).max(0.0);
    let reference_end_time = b
        .segments
        .last()
        .and_then(|segment| segment.frames.last())
        .map(|frame| frame.time)
        .unwrap_or(0.0);

    Some(MixTime {
        fade_out_time,
        fade_in_time,
        reference_end_time,
    })
}

/// Mean per-feature similarity between a target window and a candidate
/// window. Features absent from the candidate score zero.
fn window_similarity(
    target: &BTreeMap<FeatureKind, f64>,
    window: &BTreeMap<FeatureKind, f64>,
) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0;
    for (kind, value) in target {
        let Some(counterpart) = window.get(kind) else {
            continue;
        };
        sum += feature_similarity(*value, *counterpart);
    }
    sum / target.len() as f64
}

/// Similarity of two scalar feature values on a 0..=1 scale, relative to
/// the larger of the two.
fn feature_similarity(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }
    let scale = a.max(b);
    if scale == 0.0 {
        return 1.0;
    }
    1.0 - (a - b).abs() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Frame, FrameSeries, Segment, TrackSegmenter};
    use crate::settings::MixSettings;

    fn segment(values: &[f64], start_time: f64) -> Segment {
        let frames = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let mut features = BTreeMap::new();
                features.insert(FeatureKind::Energy, *value);
                Frame {
                    index: i,
                    time: start_time + i as f64,
                    features,
                }
            })
            .collect();
        Segment { frames }
    }

    fn handoff_pair(outgoing_mid: &[f64]) -> (TrackSegmentation, TrackSegmentation) {
        let a = TrackSegmentation {
            segments: vec![
                segment(&[0.0; 5], 0.0),
                segment(outgoing_mid, 5.0),
                segment(&[50.0; 7], 5.0 + outgoing_mid.len() as f64),
                segment(&[100.0; 5], 12.0 + outgoing_mid.len() as f64),
            ],
        };
        let b = TrackSegmentation {
            segments: vec![
                segment(&[10.0; 8], 0.0),
                segment(&[50.0; 7], 8.0),
                segment(&[100.0; 5], 15.0),
            ],
        };
        (a, b)
    }

    fn staircase_segmentation() -> TrackSegmentation {
        let frames: Vec<Frame> = (0..30)
            .map(|index| {
                let section = match index {
                    0..=7 => 0,
                    8..=14 => 1,
                    15..=22 => 2,
                    _ => 3,
                };
                let mut features = BTreeMap::new();
                features.insert(FeatureKind::Energy, [0.2, 1.0, 50.0, 120.0][section]);
                features.insert(FeatureKind::Rms, [2.0, 18.0, 100.0, 240.0][section]);
                Frame {
                    index,
                    time: index as f64,
                    features,
                }
            })
            .collect();
        TrackSegmenter::new(&MixSettings::default())
            .segment_series(&FrameSeries::new(frames), 0.0)
    }

    #[test]
    fn identical_tracks_fade_at_the_matched_segment() {
        let a = staircase_segmentation();
        let b = staircase_segmentation();

        let time = find_mix_time(&a, &b, 3.0).expect("mix time");
        assert_eq!(time.fade_out_time, 10.0);
        assert_eq!(time.fade_in_time, 7.0);
        assert_eq!(time.reference_end_time, 28.0);
    }

    #[test]
    fn fade_in_never_goes_negative() {
        let a = staircase_segmentation();
        let b = staircase_segmentation();
        let time = find_mix_time(&a, &b, 15.0).expect("mix time");
        assert_eq!(time.fade_in_time, 0.0);
    }

    #[test]
    fn sliding_window_picks_the_best_offset() {
        // Middle segment averages 10.0 but only the window starting at
        // offset 2 is flat at the target level.
        let mid = [3.0, 3.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 24.0];
        let (a, b) = handoff_pair(&mid);

        let time = find_mix_time(&a, &b, 3.0).expect("mix time");
        assert_eq!(time.fade_out_time, 7.0);
        assert_eq!(time.fade_in_time, 0.0);
        assert_eq!(time.reference_end_time, 19.0);
    }

    #[test]
    fn short_matched_segments_yield_none() {
        let (a, b) = handoff_pair(&[10.0; 5]);
        assert!(find_mix_time(&a, &b, 3.0).is_none());
    }

    #[test]
    fn absent_features_score_zero_in_window_similarity() {
        let mut target = BTreeMap::new();
        target.insert(FeatureKind::Energy, 10.0);
        target.insert(FeatureKind::Rms, 5.0);
        let mut window = BTreeMap::new();
        window.insert(FeatureKind::Energy, 10.0);

        assert_eq!(window_similarity(&target, &window), 0.5);
        assert_eq!(window_similarity(&BTreeMap::new(), &window), 0.0);
    }

    #[test]
    fn feature_similarity_is_relative_to_the_larger_value() {
        assert_eq!(feature_similarity(10.0, 10.0), 1.0);
        assert_eq!(feature_similarity(0.0, 0.0), 1.0);
        assert_eq!(feature_similarity(10.0, 5.0), 0.5);
        assert_eq!(feature_similarity(10.0, 0.0), 0.0);
        assert_eq!(feature_similarity(f64::NAN, 1.0), 0.0);
    }
}
