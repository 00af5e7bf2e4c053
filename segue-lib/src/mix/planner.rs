//! Sequential mix planning across a whole playlist.

use log::info;
use serde::Serialize;

use crate::analysis::{FrameSeries, TrackSegmenter};
use crate::audio::Track;
use crate::extract::FeatureExtractor;
use crate::mix::time::find_mix_time;
use crate::mix::MixError;
use crate::settings::MixSettings;

/// Fade times for one track in the plan, in seconds from its own start.
/// `None` means the track starts or ends unfaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlanEntry {
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
}

/// One entry per input track, in playback order.
#[derive(Debug, Clone, Serialize)]
pub struct MixPlan {
    pub entries: Vec<PlanEntry>,
}

/// Plans fades for consecutive track pairs.
///
/// Each track is analyzed once; the resulting frame series are reused for
/// every pair the track participates in. When a track fades in somewhere
/// past its start, the search for its own fade-out skips the part of the
/// track that will already have played, so the next mix point lands in
/// material the listener has not heard yet.
pub struct MixPlanner {
    settings: MixSettings,
}

impl MixPlanner {
    pub fn new(settings: MixSettings) -> Self {
        Self { settings }
    }

    /// Build a plan for `tracks` in playback order.
    ///
    /// # Errors
    ///
    /// Fails when `tracks` is empty or when feature extraction fails for
    /// any track. A pair with no usable mix point is not an error; those
    /// tracks simply play back to back.
    pub fn plan(
        &self,
        tracks: &[Track],
        extractor: &dyn FeatureExtractor,
    ) -> Result<MixPlan, MixError> {
        if tracks.is_empty() {
            return Err(MixError::NoTracks);
        }

        let mut series: Vec<FrameSeries> = Vec::with_capacity(tracks.len());
        for track in tracks {
            let extracted = extractor.extract(&track.samples, track.sample_rate)?;
            info!("analyzed {}: {} frames", track.name, extracted.len());
            series.push(extracted);
        }

        let segmenter = TrackSegmenter::new(&self.settings);
        let mut entries = vec![PlanEntry::default(); tracks.len()];
        for i in 0..tracks.len() - 1 {
            let duration = series[i].len() as f64;
            let skip = match entries[i].fade_in {
                Some(fade_in) if i > 0 => {
                    let remaining = duration - fade_in;
                    if remaining > 0.0 {
                        fade_in + remaining / 2.0
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };

            let outgoing = segmenter.segment_series(&series[i], skip);
            let incoming = segmenter.segment_series(&series[i + 1], 0.0);
            match find_mix_time(&outgoing, &incoming, self.settings.pre_roll_secs) {
                Some(time) => {
                    info!(
                        "mix point between {} and {}: fade out at {:.1}s, fade in at {:.1}s",
                        tracks[i].name, tracks[i + 1].name, time.fade_out_time, time.fade_in_time
                    );
                    entries[i].fade_out = Some(time.fade_out_time);
                    entries[i + 1].fade_in = Some(time.fade_in_time);
                }
                None => {
                    info!(
                        "no usable mix point between {} and {}; the tracks will butt together",
                        tracks[i].name,
                        tracks[i + 1].name
                    );
                }
            }
        }

        Ok(MixPlan { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FeatureKind, Frame};
    use crate::extract::ExtractError;
    use std::collections::BTreeMap;

    /// Hands back a canned series per track; the first sample value selects
    /// which one.
    struct LookupExtractor {
        series: Vec<FrameSeries>,
    }

    impl FeatureExtractor for LookupExtractor {
        fn extract(&self, samples: &[f32], _sample_rate: u32) -> Result<FrameSeries, ExtractError> {
            Ok(self.series[samples[0] as usize].clone())
        }
    }

    fn staircase_series() -> FrameSeries {
        let frames = (0..30)
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
        FrameSeries::new(frames)
    }

    fn flat_series() -> FrameSeries {
        let frames = (0..30)
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
        FrameSeries::new(frames)
    }

    fn track(name: &str, selector: f32) -> Track {
        Track::new(name, vec![selector], 8000)
    }

    #[test]
    fn adjacent_tracks_get_matching_fade_times() {
        let extractor = LookupExtractor {
            series: vec![staircase_series(), staircase_series()],
        };
        let tracks = vec![track("one", 0.0), track("two", 1.0)];

        let plan = MixPlanner::new(MixSettings::default())
            .plan(&tracks, &extractor)
            .expect("plan");

        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].fade_in, None);
        assert_eq!(plan.entries[0].fade_out, Some(10.0));
        assert_eq!(plan.entries[1].fade_in, Some(7.0));
        assert_eq!(plan.entries[1].fade_out, None);
    }

    #[test]
    fn fade_in_offsets_the_next_search_past_played_material() {
        let extractor = LookupExtractor {
            series: vec![staircase_series(), staircase_series(), staircase_series()],
        };
        let tracks = vec![track("one", 0.0), track("two", 1.0), track("three", 2.0)];

        let plan = MixPlanner::new(MixSettings::default())
            .plan(&tracks, &extractor)
            .expect("plan");

        // Track two fades in at 7s, so its own mix search starts at
        // 7 + (30 - 7) / 2 = 18.5s. Only 12 frames remain, not enough
        // structure, so the second pair butts together.
        assert_eq!(plan.entries[1].fade_in, Some(7.0));
        assert_eq!(plan.entries[1].fade_out, None);
        assert_eq!(plan.entries[2], PlanEntry::default());
    }

    #[test]
    fn unstructured_tracks_still_produce_a_plan() {
        let extractor = LookupExtractor {
            series: vec![flat_series(), flat_series()],
        };
        let tracks = vec![track("one", 0.0), track("two", 1.0)];

        let plan = MixPlanner::new(MixSettings::default())
            .plan(&tracks, &extractor)
            .expect("plan");
        assert!(plan
            .entries
            .iter()
            .all(|entry| entry.fade_in.is_none() && entry.fade_out.is_none()));
    }

    #[test]
    fn empty_playlist_is_an_error() {
        let extractor = LookupExtractor { series: vec![] };
        let result = MixPlanner::new(MixSettings::default()).plan(&[], &extractor);
        assert!(matches!(result, Err(MixError::NoTracks)));
    }

    #[test]
    fn single_track_plans_without_fades() {
        let extractor = LookupExtractor {
            series: vec![staircase_series()],
        };
        let tracks = vec![track("only", 0.0)];

        let plan = MixPlanner::new(MixSettings::default())
            .plan(&tracks, &extractor)
            .expect("plan");
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0], PlanEntry::default());
    }
}
