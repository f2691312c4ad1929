//! cpal output stream for the tone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfig};

use crate::errors::{GlintError, Result};

use super::waveform::SineWave;
use super::{AudioSettings, ToneControl};

/// Default output device playing a sine tone while enabled.
///
/// The stream runs continuously once built; the callback writes silence
/// unless the playing flag is set.
pub struct ToneDevice {
    stream: Stream,
    playing: Arc<AtomicBool>,
    device_name: String,
    config: StreamConfig,
}

impl ToneDevice {
    /// Opens the default output device and builds the (silent) stream.
    pub fn open(settings: &AudioSettings) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(GlintError::NoAudioDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());

        let supported = select_config(&device, settings)?;
        let config: StreamConfig = supported.config();
        let channels = config.channels as usize;

        let playing = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&playing);
        let mut wave = SineWave::new(settings.frequency, settings.amplitude, config.sample_rate.0);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if gate.load(Ordering::Acquire) {
                    wave.fill_interleaved(data, channels);
                } else {
                    data.fill(0.0);
                }
            },
            move |err| {
                log::error!("Audio output stream error: {err}");
            },
            None,
        )?;

        log::info!(
            "Audio device: {device_name} ({} ch @ {} Hz)",
            config.channels,
            config.sample_rate.0
        );

        Ok(Self {
            stream,
            playing,
            device_name,
            config,
        })
    }

    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    #[must_use]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl ToneControl for ToneDevice {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    fn set_playing(&mut self, playing: bool) -> Result<()> {
        if playing {
            self.stream
                .play()
                .map_err(|e| GlintError::AudioStreamError(e.to_string()))?;
        } else {
            self.stream
                .pause()
                .map_err(|e| GlintError::AudioStreamError(e.to_string()))?;
        }
        self.playing.store(playing, Ordering::Release);
        log::info!("Audio = {playing}");
        Ok(())
    }
}

/// Prefers an exact f32 match for the requested channels and rate, then the
/// device default if that is f32.
fn select_config(device: &Device, settings: &AudioSettings) -> Result<SupportedStreamConfig> {
    let sample_rate = cpal::SampleRate(settings.sample_rate);

    let configs = device
        .supported_output_configs()
        .map_err(|e| GlintError::AudioConfigError(e.to_string()))?;

    for supported in configs {
        if supported.channels() == settings.channels
            && supported.min_sample_rate() <= sample_rate
            && supported.max_sample_rate() >= sample_rate
            && supported.sample_format() == SampleFormat::F32
        {
            return Ok(supported.with_sample_rate(sample_rate));
        }
    }

    let fallback = device.default_output_config()?;
    if fallback.sample_format() == SampleFormat::F32 {
        log::warn!(
            "No {} ch @ {} Hz f32 output config; using device default",
            settings.channels,
            settings.sample_rate
        );
        return Ok(fallback);
    }

    Err(GlintError::AudioConfigError(format!(
        "No f32 output config for {} channels @ {}Hz",
        settings.channels, settings.sample_rate
    )))
}
