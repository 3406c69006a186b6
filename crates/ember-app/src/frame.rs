//! Frame timing and pacing.

use std::time::{Duration, Instant};

/// Frame rate statistics over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub frames: u64,
}

/// Measures delta time between frames and computes how long to sleep to hit
/// a target frame rate.
#[derive(Debug)]
pub(crate) struct FrameClock {
    last_tick: Instant,
    target_frame_time: Option<Duration>,
    min_fps: f64,
    max_fps: f64,
    fps_sum: f64,
    frames: u64,
}

impl FrameClock {
    /// A target of zero fps means unlimited.
    pub fn new(target_fps: Option<u32>, now: Instant) -> Self {
        Self {
            last_tick: now,
            target_frame_time: target_fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps))),
            min_fps: f64::MAX,
            max_fps: 0.0,
            fps_sum: 0.0,
            frames: 0,
        }
    }

    /// Start a new frame at `now`. Returns the delta time in seconds.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.frames += 1;
        if dt > 0.0 {
            let fps = 1.0 / dt;
            self.min_fps = self.min_fps.min(fps);
            self.max_fps = self.max_fps.max(fps);
            self.fps_sum += fps;
        }
        dt as f32
    }

    /// Time left in the current frame's budget at `now`, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let target = self.target_frame_time?;
        target
            .checked_sub(now.saturating_duration_since(self.last_tick))
            .filter(|left| !left.is_zero())
    }

    /// Statistics so far, `None` before any measurable frame.
    pub fn stats(&self) -> Option<FpsStats> {
        (self.fps_sum > 0.0).then(|| FpsStats {
            min: self.min_fps,
            max: self.max_fps,
            avg: self.fps_sum / self.frames as f64,
            frames: self.frames,
        })
    }
}
