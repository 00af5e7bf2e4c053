//! # Segue
//!
//! Automatic music mixing: decode a playlist, segment each track by its
//! spectral features, find where consecutive tracks sound most alike, and
//! render one continuous mix with crossfades at those points.
//!
//! The pipeline runs in stages that can also be used on their own:
//!
//! * [`audio`] decodes files into mono sample buffers.
//! * [`extract`] turns samples into per-window feature frames.
//! * [`analysis`] segments the frame series and reconciles the feature
//!   channels.
//! * [`mix`] plans fade times across the playlist and renders the result.
//! * [`encode`] writes the rendered buffer through a pluggable sink.
//! * [`playback`] plays a rendered buffer on the default output device.

pub mod analysis;
pub mod audio;
pub mod constants;
pub mod encode;
pub mod extract;
pub mod mix;
pub mod playback;
pub mod settings;
