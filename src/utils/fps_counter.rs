use std::time::{Duration, Instant};

/// Averages frame rate and frame time over one-second windows.
pub struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
    accumulated_time: Duration,
    pub current_fps: f32,
    /// Average frame time of the last completed window, in milliseconds.
    pub frame_time_ms: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
            accumulated_time: Duration::ZERO,
            current_fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Records a frame ending now. Returns the new average when a window
    /// completes.
    pub fn update(&mut self) -> Option<f32> {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        self.record(delta)
    }

    /// Records a frame that took `delta`.
    pub fn record(&mut self, delta: Duration) -> Option<f32> {
        self.frame_count += 1;
        self.accumulated_time += delta;

        if self.accumulated_time < Self::WINDOW {
            return None;
        }

        let secs = self.accumulated_time.as_secs_f32();
        self.current_fps = self.frame_count as f32 / secs;
        self.frame_time_ms = secs * 1000.0 / self.frame_count as f32;

        self.accumulated_time = Duration::ZERO;
        self.frame_count = 0;

        Some(self.current_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut fps = FpsCounter::new();
        let frame = Duration::from_millis(20);
        for _ in 0..49 {
            assert_eq!(fps.record(frame), None);
        }
        let reported = fps.record(frame);
        assert!(matches!(reported, Some(v) if (v - 50.0).abs() < 0.01));
        assert!((fps.frame_time_ms - 20.0).abs() < 0.01);
    }

    #[test]
    fn window_resets_after_report() {
        let mut fps = FpsCounter::new();
        assert!(fps.record(Duration::from_secs(2)).is_some());
        assert!((fps.current_fps - 0.5).abs() < 1e-6);
        assert_eq!(fps.record(Duration::from_millis(10)), None);
    }
}
