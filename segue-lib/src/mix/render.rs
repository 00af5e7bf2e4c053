//! Rendering a planned mix into a single sample buffer.

use log::debug;

use crate::audio::Track;
use crate::mix::{MixError, MixPlan};

/// Renders tracks into one buffer, overlapping linear fades where the plan
/// calls for them.
pub struct CrossfadeRenderer {
    fade_in_secs: f64,
    fade_out_secs: f64,
}

impl CrossfadeRenderer {
    pub fn new(fade_in_secs: f64, fade_out_secs: f64) -> Self {
        Self {
            fade_in_secs,
            fade_out_secs,
        }
    }

    /// Mix `tracks` according to `plan`.
    ///
    /// Every track contributes the part of its buffer between its fade-in
    /// start and the end of its fade-out window. Wherever a fade-out and
    /// the next fade-in overlap, the buffers sum, so both tracks stay
    /// audible through the transition.
    ///
    /// # Errors
    ///
    /// Fails when the plan and track list disagree in length, when a track
    /// has no samples or no sample rate, or when the tracks do not share
    /// one sample rate.
    pub fn render(&self, tracks: &[Track], plan: &MixPlan) -> Result<Vec<f32>, MixError> {
        if tracks.is_empty() {
            return Err(MixError::NoTracks);
        }
        if plan.entries.len() != tracks.len() {
            return Err(MixError::PlanMismatch(format!(
                "plan has {} entries for {} tracks",
                plan.entries.len(),
                tracks.len()
            )));
        }
        let rate = tracks[0].sample_rate;
        for track in tracks {
            if track.samples.is_empty() {
                return Err(MixError::InvalidTrack(format!(
                    "{} has no samples",
                    track.name
                )));
            }
            if track.sample_rate == 0 {
                return Err(MixError::InvalidTrack(format!(
                    "{} has no sample rate",
                    track.name
                )));
            }
            if track.sample_rate != rate {
                return Err(MixError::InvalidTrack(format!(
                    "{} runs at {} Hz, expected {}",
                    track.name, track.sample_rate, rate
                )));
            }
        }

        let fade_in_samples = (self.fade_in_secs * f64::from(rate)).floor() as usize;
        let fade_out_samples = (self.fade_out_secs * f64::from(rate)).floor() as usize;

        let mut output: Vec<f32> = Vec::new();
        let mut write_offset = 0usize;
        let mut previous_faded_out = false;
        for (position, (track, entry)) in tracks.iter().zip(plan.entries.iter()).enumerate() {
            let is_last = position == tracks.len() - 1;
            let mut samples = track.samples.clone();

            let fade_in_start = entry
                .fade_in
                .map(|secs| (secs * f64::from(rate)).floor() as usize);
            let fade_out_start = entry
                .fade_out
                .map(|secs| (secs * f64::from(rate)).floor() as usize);

            if let Some(start) = fade_in_start {
                apply_fade_in(&mut samples, start, fade_in_samples);
            }
            if let Some(start) = fade_out_start {
                apply_fade_out(&mut samples, start, fade_out_samples);
            }

            let contribution_start = fade_in_start.unwrap_or(0).min(samples.len());
            let contribution_end = match fade_out_start {
                Some(start) if !is_last => samples.len().min(start + fade_out_samples),
                _ => samples.len(),
            };

            if previous_faded_out {
                // Overlap this track with the previous fade-out window.
                write_offset = write_offset.saturating_sub(fade_out_samples);
            }

            if contribution_end > contribution_start {
                let contribution = &samples[contribution_start..contribution_end];
                let needed = write_offset + contribution.len();
                if output.len() < needed {
                    output.resize(needed, 0.0);
                }
                for (target, sample) in output[write_offset..needed].iter_mut().zip(contribution) {
                    *target += *sample;
                }
                write_offset = needed;
            } else {
                debug!("{} contributes no samples to the mix", track.name);
            }

            previous_faded_out = entry.fade_out.is_some() && !is_last;
        }

        Ok(output)
    }
}

/// Ramp `fade_samples` samples from silence to full level, starting at
/// `start`. Stops quietly at the end of the buffer.
fn apply_fade_in(samples: &mut [f32], start: usize, fade_samples: usize) {
    for j in 0..fade_samples {
        let Some(sample) = samples.get_mut(start + j) else {
            break;
        };
        *sample *= j as f32 / fade_samples as f32;
    }
}

/// Ramp `fade_samples` samples from full level to silence, starting at
/// `start`.
fn apply_fade_out(samples: &mut [f32], start: usize, fade_samples: usize) {
    for j in 0..fade_samples {
        let Some(sample) = samples.get_mut(start + j) else {
            break;
        };
        *sample *= 1.0 - j as f32 / fade_samples as f32;
    }
}
