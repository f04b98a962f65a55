//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer for the run loop
pub struct Timer {
    last_frame: Instant,
    delta: Duration,
    total: Duration,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            total: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Restart measuring from now without touching the totals
    ///
    /// Used when a scene gains focus so that the time it spent hidden is not
    /// reported as one long frame.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta = Duration::ZERO;
    }

    /// Advance one frame and return the time since the previous one
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_frame);
        self.total += self.delta;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta
    }

    /// Time between the last two ticks
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Sum of all frame times
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        let seconds = self.total.as_secs_f32();
        if seconds > 0.0 {
            self.frame_count as f32 / seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates() {
        let mut timer = Timer::new();
        std::thread::sleep(Duration::from_millis(2));
        let first = timer.tick();
        let second = timer.tick();

        assert!(first >= Duration::from_millis(2));
        assert_eq!(timer.frame_count(), 2);
        assert_eq!(timer.total(), first + second);
        assert_eq!(timer.delta(), second);
    }

    #[test]
    fn test_reset_keeps_totals() {
        let mut timer = Timer::new();
        timer.tick();
        let total = timer.total();

        timer.reset();

        assert_eq!(timer.delta(), Duration::ZERO);
        assert_eq!(timer.total(), total);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn test_average_fps_without_time() {
        assert_eq!(Timer::new().average_fps(), 0.0);
    }
}
