//! Audio tone playback.
//!
//! A single sine tone on the default output device, switched on and off from
//! the GUI through [`ToneControl`].

mod device;
pub mod waveform;

pub use device::ToneDevice;
pub use waveform::SineWave;

use crate::errors::Result;

/// Playback switch the frame loop forwards GUI toggles to.
pub trait ToneControl {
    fn is_playing(&self) -> bool;
    fn set_playing(&mut self, playing: bool) -> Result<()>;

    fn toggle(&mut self) -> Result<()> {
        let playing = self.is_playing();
        self.set_playing(!playing)
    }
}

/// Tone and stream parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Tone frequency in Hz.
    pub frequency: f32,
    /// Peak amplitude, `0.0..=1.0`.
    pub amplitude: f32,
    /// Preferred stream sample rate.
    pub sample_rate: u32,
    /// Preferred channel count.
    pub channels: u16,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 0.2,
            sample_rate: 48_000,
            channels: 2,
        }
    }
}
