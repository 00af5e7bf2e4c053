//! Playing a rendered mix on the default output device.

use std::fmt;

use log::info;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamBuilder, Sink};

/// Errors raised while setting up or feeding the output device.
#[derive(Debug)]
pub enum PlaybackError {
    Device(String),
    InvalidBuffer(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::Device(message) => write!(f, "audio device error: {}", message),
            PlaybackError::InvalidBuffer(message) => write!(f, "invalid buffer: {}", message),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Play a mono sample buffer on the default output device, blocking until
/// it finishes.
///
/// # Errors
///
/// Fails when the buffer is unplayable or no output device can be opened.
pub fn play_buffer(samples: Vec<f32>, sample_rate: u32) -> Result<(), PlaybackError> {
    if sample_rate == 0 {
        return Err(PlaybackError::InvalidBuffer("sample rate is zero".into()));
    }
    if samples.is_empty() {
        return Err(PlaybackError::InvalidBuffer("no samples to play".into()));
    }

    let duration_secs = samples.len() as f64 / f64::from(sample_rate);
    let stream = OutputStreamBuilder::open_default_stream()
        .map_err(|err| PlaybackError::Device(err.to_string()))?;
    let sink = Sink::connect_new(stream.mixer());

    info!("playing {:.1}s of audio", duration_secs);
    sink.append(SamplesBuffer::new(1, sample_rate, samples));
    sink.sleep_until_end();
    Ok(())
}
