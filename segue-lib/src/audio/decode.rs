//! Decoding audio files into mono sample buffers.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use log::warn;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::Track;

/// Errors raised while opening or decoding an audio file.
#[derive(Debug)]
pub enum DecodeError {
    Io(io::Error),
    Probe(String),
    Decode(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(err) => write!(f, "io error: {}", err),
            DecodeError::Probe(message) => write!(f, "probe error: {}", message),
            DecodeError::Decode(message) => write!(f, "decode error: {}", message),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError::Io(err)
    }
}

/// Decode the first audio stream of `path` into a mono track.
///
/// Multi-channel sources keep only their first channel, which is enough
/// for the analysis and keeps every format on the same code path. Packets
/// that fail to decode are skipped with a warning; the rest of the stream
/// still comes through.
///
/// # Errors
///
/// Fails when the file cannot be opened, no decodable audio stream is
/// found, or the stream is corrupt beyond individual packets.
pub fn decode_file(path: &str) -> Result<Track, DecodeError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = Path::new(path).extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| DecodeError::Probe(err.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::Decode("no supported audio tracks".into()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::Decode("missing sample rate in codec parameters".into()))?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| DecodeError::Decode(err.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(Error::ResetRequired) => {
                return Err(DecodeError::Decode(
                    "decoder reset required mid-stream".into(),
                ))
            }
            Err(err) => return Err(DecodeError::Decode(err.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => push_channel_samples(decoded, &mut samples),
            Err(Error::DecodeError(err)) => {
                warn!("skipping undecodable packet in {}: {}", path, err);
                continue;
            }
            Err(err) => return Err(DecodeError::Decode(err.to_string())),
        }
    }

    let name = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(Track::new(name, samples, sample_rate))
}

/// Append the first channel of a decoded buffer as f32 samples.
fn push_channel_samples(decoded: AudioBufferRef<'_>, samples: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_u8(*sample)));
        }
        AudioBufferRef::S8(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_i8(*sample)));
        }
        AudioBufferRef::U16(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_u16(*sample)));
        }
        AudioBufferRef::S16(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_i16(*sample)));
        }
        AudioBufferRef::U24(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_u24(sample.0)));
        }
        AudioBufferRef::S24(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_i24(sample.0)));
        }
        AudioBufferRef::U32(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_u32(*sample)));
        }
        AudioBufferRef::S32(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| f32_from_i32(*sample)));
        }
        AudioBufferRef::F32(buf) => samples.extend_from_slice(buf.chan(0)),
        AudioBufferRef::F64(buf) => {
            samples.extend(buf.chan(0).iter().map(|sample| *sample as f32));
        }
    }
}

fn f32_from_u8(sample: u8) -> f32 {
    (f32::from(sample) - 128.0) / 128.0
}

fn f32_from_i8(sample: i8) -> f32 {
    f32::from(sample) / 128.0
}

fn f32_from_u16(sample: u16) -> f32 {
    (f32::from(sample) - 32_768.0) / 32_768.0
}

fn f32_from_i16(sample: i16) -> f32 {
    f32::from(sample) / 32_768.0
}

fn f32_from_u24(sample: u32) -> f32 {
    (sample as f32 - 8_388_608.0) / 8_388_608.0
}

fn f32_from_i24(sample: i32) -> f32 {
    // Sign-extend from 24 bits before scaling.
    ((sample << 8) >> 8) as f32 / 8_388_608.0
}

fn f32_from_u32(sample: u32) -> f32 {
    ((f64::from(sample) - 2_147_483_648.0) / 2_147_483_648.0) as f32
}

fn f32_from_i32(sample: i32) -> f32 {
    (f64::from(sample) / 2_147_483_648.0) as f32
}
