// Media frames as delivered by the call session, and their conversion to
// the linear 16-bit PCM chunks the transcription stream carries.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Sample encoding of a media frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaFormat {
    /// 16-bit signed little-endian PCM
    L16,
    /// G.711 mu-law, one byte per sample
    #[serde(rename = "PCMU")]
    Pcmu,
}

impl MediaFormat {
    fn bytes_per_sample(self) -> usize {
        match self {
            MediaFormat::L16 => 2,
            MediaFormat::Pcmu => 1,
        }
    }
}

/// One unit of captured call audio (interleaved channels)
#[derive(Debug, Clone)]
pub struct MediaFrame {
    pub format: MediaFormat,
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Raw payload in `format`
    pub data: Bytes,
}

impl MediaFrame {
    pub fn new(format: MediaFormat, channels: u16, sample_rate: u32, data: Bytes) -> Self {
        Self {
            format,
            channels,
            sample_rate,
            data,
        }
    }

    /// Build an L16 frame from interleaved samples
    pub fn from_samples(samples: &[i16], channels: u16, sample_rate: u32) -> Self {
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::new(MediaFormat::L16, channels, sample_rate, Bytes::from(data))
    }

    /// Linear 16-bit LE PCM view of the frame.
    ///
    /// L16 payloads are handed out as a view over the existing buffer; PCMU is
    /// decoded into a new buffer.
    pub fn as_l16(&self) -> Result<Bytes, FrameError> {
        if self.channels == 0 {
            return Err(FrameError::NoChannels);
        }

        let frame_width = self.format.bytes_per_sample() * self.channels as usize;
        if self.data.len() % frame_width != 0 {
            return Err(FrameError::Misaligned {
                len: self.data.len(),
                channels: self.channels,
            });
        }

        match self.format {
            MediaFormat::L16 => Ok(self.data.clone()),
            MediaFormat::Pcmu => {
                let pcm: Vec<u8> = self
                    .data
                    .iter()
                    .flat_map(|&b| ulaw_to_linear(b).to_le_bytes())
                    .collect();
                Ok(Bytes::from(pcm))
            }
        }
    }
}

/// G.711 mu-law expansion
fn ulaw_to_linear(byte: u8) -> i16 {
    let u = !byte;
    let exponent = (u >> 4) & 0x07;
    let mantissa = (u & 0x0F) as i32;
    let magnitude = (((mantissa << 3) + 0x84) << exponent) - 0x84;

    if u & 0x80 != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}
