//! WAV file sink for the encoder.

use std::fs::File;
use std::io::BufWriter;

use hound::{SampleFormat, WavSpec, WavWriter};
use segue_lib::encode::{EncodeError, Encoder};

/// Writes 16-bit mono PCM to a WAV file.
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl WavSink {
    /// Open `path` for writing at the given sample rate.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created.
    pub fn create(path: &str, sample_rate: u32) -> Result<Self, EncodeError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)
            .map_err(|err| EncodeError::Sink(err.to_string()))?;
        Ok(Self {
            writer: Some(writer),
        })
    }
}

impl Encoder for WavSink {
    fn encode(&mut self, samples: &[i16]) -> Result<(), EncodeError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| EncodeError::Sink("wav writer already finalized".to_string()))?;
        for sample in samples {
            writer
                .write_sample(*sample)
                .map_err(|err| EncodeError::Sink(err.to_string()))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), EncodeError> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|err| EncodeError::Sink(err.to_string()))?;
        }
        Ok(())
    }
}
