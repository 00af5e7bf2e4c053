//! Chunked PCM encoding through a pluggable sink.

use std::fmt;
use std::io;

use crate::constants::ENCODER_CHUNK_SAMPLES;

/// Errors raised while encoding samples to a sink.
#[derive(Debug)]
pub enum EncodeError {
    Io(io::Error),
    Sink(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Io(err) => write!(f, "io error: {}", err),
            EncodeError::Sink(message) => write!(f, "sink error: {}", message),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> Self {
        EncodeError::Io(err)
    }
}

/// Receives 16-bit PCM in chunks. Implementations wrap a file format or
/// stream writer.
pub trait Encoder {
    /// Consume one chunk of samples.
    ///
    /// # Errors
    ///
    /// Fails when the sink can no longer accept samples.
    fn encode(&mut self, samples: &[i16]) -> Result<(), EncodeError>;

    /// Finish the stream. Called once, after the last chunk.
    ///
    /// # Errors
    ///
    /// Fails when the sink cannot be finalized.
    fn flush(&mut self) -> Result<(), EncodeError>;
}

/// Convert a float buffer to 16-bit PCM and feed it to `encoder` in
/// fixed-size chunks, then flush once.
///
/// # Errors
///
/// Propagates the first sink failure.
pub fn encode_pcm(samples: &[f32], encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
    let mut converted: Vec<i16> = Vec::with_capacity(ENCODER_CHUNK_SAMPLES);
    for chunk in samples.chunks(ENCODER_CHUNK_SAMPLES) {
        converted.clear();
        converted.extend(chunk.iter().map(|sample| pcm16_from_f32(*sample)));
        encoder.encode(&converted)?;
    }
    encoder.flush()
}

fn pcm16_from_f32(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 0x8000 as f32
    } else {
        clamped * 0x7FFF as f32
    };
    // NaN converts to 0 through the saturating cast.
    scaled as i16
}
