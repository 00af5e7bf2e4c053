//! Mix planning and rendering.

use std::fmt;

use crate::audio::Track;
use crate::extract::{ExtractError, FeatureExtractor};
use crate::settings::MixSettings;

mod planner;
mod point;
mod render;
mod time;

pub use planner::{MixPlan, MixPlanner, PlanEntry};
pub use point::{find_mix_point, MixPoint};
pub use render::CrossfadeRenderer;
pub use time::{find_mix_time, MixTime};

/// Errors raised while planning or rendering a mix.
#[derive(Debug)]
pub enum MixError {
    NoTracks,
    PlanMismatch(String),
    InvalidTrack(String),
    Extract(ExtractError),
}

impl fmt::Display for MixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixError::NoTracks => write!(f, "no tracks to mix"),
            MixError::PlanMismatch(message) => write!(f, "plan mismatch: {}", message),
            MixError::InvalidTrack(message) => write!(f, "invalid track: {}", message),
            MixError::Extract(err) => write!(f, "extraction failed: {}", err),
        }
    }
}

impl std::error::Error for MixError {}

impl From<ExtractError> for MixError {
    fn from(err: ExtractError) -> Self {
        MixError::Extract(err)
    }
}

/// High-level entry point: plan fades for a playlist, then render it.
pub struct Mixer {
    settings: MixSettings,
}

impl Mixer {
    pub fn new(settings: MixSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MixSettings {
        &self.settings
    }

    /// Analyze the playlist and decide where each crossfade happens.
    ///
    /// # Errors
    ///
    /// Fails on an empty playlist or when feature extraction fails.
    pub fn plan(
        &self,
        tracks: &[Track],
        extractor: &dyn FeatureExtractor,
    ) -> Result<MixPlan, MixError> {
        MixPlanner::new(self.settings.clone()).plan(tracks, extractor)
    }

    /// Render a previously computed plan into one sample buffer.
    ///
    /// # Errors
    ///
    /// Fails when the plan does not match the track list or a track is
    /// unusable.
    pub fn render(&self, tracks: &[Track], plan: &MixPlan) -> Result<Vec<f32>, MixError> {
        CrossfadeRenderer::new(self.settings.fade_in_secs, self.settings.fade_out_secs)
            .render(tracks, plan)
    }

    /// Plan and render in one step.
    ///
    /// # Errors
    ///
    /// Combines the failure modes of [`Mixer::plan`] and [`Mixer::render`].
    pub fn mix(
        &self,
        tracks: &[Track],
        extractor: &dyn FeatureExtractor,
    ) -> Result<Vec<f32>, MixError> {
        let plan = self.plan(tracks, extractor)?;
        self.render(tracks, &plan)
    }
}
