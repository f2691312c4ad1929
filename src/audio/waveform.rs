//! Sine tone synthesis.

use std::f32::consts::TAU;

/// Phase-accumulating sine oscillator.
#[derive(Debug, Clone)]
pub struct SineWave {
    amplitude: f32,
    /// Phase advance per frame, in radians.
    step: f32,
    phase: f32,
}

impl SineWave {
    #[must_use]
    pub fn new(frequency: f32, amplitude: f32, sample_rate: u32) -> Self {
        Self {
            amplitude,
            step: TAU * frequency / sample_rate.max(1) as f32,
            phase: 0.0,
        }
    }

    /// Returns the next sample and advances by one frame.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = self.amplitude * self.phase.sin();
        self.phase += self.step;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        value
    }

    /// Fills an interleaved buffer, writing the same sample to every channel
    /// of a frame.
    pub fn fill_interleaved(&mut self, out: &mut [f32], channels: usize) {
        for frame in out.chunks_mut(channels.max(1)) {
            let value = self.next_sample();
            frame.fill(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_matches_amplitude() {
        let mut wave = SineWave::new(440.0, 0.2, 48_000);
        let mut buf = vec![0.0f32; 48_000 * 2];
        wave.fill_interleaved(&mut buf, 2);

        let peak = buf.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= 0.2 + 1e-6);
        assert!(peak > 0.199);
    }

    #[test]
    fn channels_carry_identical_samples() {
        let mut wave = SineWave::new(440.0, 0.2, 48_000);
        let mut buf = vec![0.0f32; 64];
        wave.fill_interleaved(&mut buf, 2);
        for frame in buf.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn period_matches_frequency() {
        // 480 Hz at 48 kHz repeats every 100 frames.
        let mut wave = SineWave::new(480.0, 1.0, 48_000);
        let first: Vec<f32> = (0..100).map(|_| wave.next_sample()).collect();
        let second: Vec<f32> = (0..100).map(|_| wave.next_sample()).collect();
        for (a, b) in first.iter().zip(&second) {
            assert!((a - b).abs() < 1e-3);
        }
        assert!(first[0].abs() < 1e-6);
        assert!((first[25] - 1.0).abs() < 1e-3);
    }
}
