//! Locating the pair of segments where two tracks sound most alike.

use std::collections::BTreeMap;

use log::debug;

use crate::analysis::{round2, FeatureKind, TrackSegmentation};
use crate::constants::{CONTINUATION_MIN_SIMILARITY, DISTANCE_RATIO};

/// The best segment pair to hand playback from track A to track B.
///
/// `segment_a` indexes into A's segmentation, `segment_b` into B's.
/// `similarity_pct` is 100 for a perfect feature match and falls toward 0
/// as the segment averages drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixPoint {
    pub segment_a: usize,
    pub segment_b: usize,
    pub similarity_pct: f64,
}

/// Search every eligible segment pair for the closest feature match.
///
/// A's first and last segments are excluded so the mix never cuts the
/// opening or tail of the outgoing track; B's last segment is excluded so
/// the incoming track still has somewhere to go. A candidate pair must be
/// within a fifth of the average pair distance, and the pair right after it
/// must still be similar, so one coincidental match cannot fool the search.
///
/// Returns `None` when either track has too few segments or when the
/// tracks are so uniform that no average distance can be established.
pub fn find_mix_point(a: &TrackSegmentation, b: &TrackSegmentation) -> Option<MixPoint> {
    if a.len() < 3 || b.len() < 2 {
        debug!(
            "not enough segments to mix: {} outgoing, {} incoming",
            a.len(),
            b.len()
        );
        return None;
    }

    let averages_a: Vec<BTreeMap<FeatureKind, f64>> = a
        .segments
        .iter()
        .map(|segment| segment.feature_averages())
        .collect();
    let averages_b: Vec<BTreeMap<FeatureKind, f64>> = b
        .segments
        .iter()
        .map(|segment| segment.feature_averages())
        .collect();

    let mut total = 0.0;
    let mut measured = 0usize;
    for from in &averages_a {
        for to in &averages_b {
            if let Some(distance) = euclidean_distance(from, to) {
                total += distance;
                measured += 1;
            }
        }
    }
    if measured == 0 {
        debug!("no comparable segment pairs between tracks");
        return None;
    }
    let average = total / measured as f64;
    if average <= 0.0 {
        debug!("tracks are feature-identical everywhere, no reference distance");
        return None;
    }
    let cutoff = DISTANCE_RATIO * average;

    let mut best: Option<MixPoint> = None;
    for i in 1..a.len() - 1 {
        for j in 0..b.len() - 1 {
            let Some(distance) = euclidean_distance(&averages_a[i], &averages_b[j]) else {
                continue;
            };
            if distance > cutoff {
                continue;
            }
            let Some(next_distance) = euclidean_distance(&averages_a[i + 1], &averages_b[j + 1])
            else {
                continue;
            };
            let continuation = (1.0 - next_distance / average) * 100.0;
            if continuation < CONTINUATION_MIN_SIMILARITY {
                continue;
            }

            let similarity = round2((1.0 - distance / average) * 100.0);
            let better = match best {
                Some(current) => similarity > current.similarity_pct,
                None => true,
            };
            if better {
                best = Some(MixPoint {
                    segment_a: i,
                    segment_b: j,
                    similarity_pct: similarity,
                });
            }
        }
    }
    best
}

/// Euclidean distance between two feature-average maps, or `None` when the
/// maps do not cover the same features.
pub(crate) fn euclidean_distance(
    a: &BTreeMap<FeatureKind, f64>,
    b: &BTreeMap<FeatureKind, f64>,
) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let mut sum = 0.0;
    for (kind, value_a) in a {
        let value_b = b.get(kind)?;
        sum += (value_a - value_b) * (value_a - value_b);
    }
    Some(sum.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Frame, FrameSeries, TrackSegmenter};
    use crate::settings::MixSettings;

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
    fn identical_tracks_match_at_the_first_interior_segment() {
        let a = staircase_segmentation();
        let b = staircase_segmentation();

        let point = find_mix_point(&a, &b).expect("mix point");
        assert_eq!(point.segment_a, 1);
        assert_eq!(point.segment_b, 1);
        assert!(point.similarity_pct >= 99.0);
    }

    #[test]
    fn search_is_not_commutative() {
        let a = staircase_segmentation();
        let mut b = staircase_segmentation();
        b.segments.drain(..2);

        // Forward still has enough segments on both sides.
        assert!(find_mix_point(&a, &b).is_some());
        // Reversed, the two-segment side cannot host an interior match.
        assert!(find_mix_point(&b, &a).is_none());
    }

    #[test]
    fn too_few_segments_yield_none() {
        let a = staircase_segmentation();
        let empty = TrackSegmentation::default();
        assert!(find_mix_point(&empty, &a).is_none());
        assert!(find_mix_point(&a, &empty).is_none());
    }

    #[test]
    fn uniform_tracks_have_no_reference_distance() {
        let frames: Vec<Frame> = (0..30)
            .map(|index| {
                let mut features = BTreeMap::new();
                features.insert(FeatureKind::Energy, 1.0);
                Frame {
                    index,
                    time: index as f64,
                    features,
                }
            })
            .collect();
        let series = FrameSeries::new(frames);
        let mut segmentation = TrackSegmentation::default();
        for chunk in series.frames().chunks(10) {
            segmentation.segments.push(crate::analysis::Segment {
                frames: chunk.to_vec(),
            });
        }

        assert!(find_mix_point(&segmentation, &segmentation.clone()).is_none());
    }

    #[test]
    fn distance_requires_matching_feature_sets() {
        let mut a = BTreeMap::new();
        a.insert(FeatureKind::Energy, 3.0);
        a.insert(FeatureKind::Rms, 0.0);
        let mut b = BTreeMap::new();
        b.insert(FeatureKind::Energy, 0.0);
        b.insert(FeatureKind::Rms, 4.0);

        assert_eq!(euclidean_distance(&a, &b), Some(5.0));

        let mut c = BTreeMap::new();
        c.insert(FeatureKind::Zcr, 1.0);
        c.insert(FeatureKind::Rms, 4.0);
        assert!(euclidean_distance(&a, &c).is_none());
        assert!(euclidean_distance(&BTreeMap::new(), &BTreeMap::new()).is_none());
    }
}
