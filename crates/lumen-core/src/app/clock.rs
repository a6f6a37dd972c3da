// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::{Duration, Instant};

use crate::config::RenderSettings;

/// Timing of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Sum of every clamped `dt` so far, in seconds.
    pub elapsed: f64,
    /// Monotonic frame counter, starting at zero.
    pub frame_index: u64,
    /// Frames per second averaged over the last full second. Zero until the
    /// first second has passed.
    pub fps: f32,
}

/// Produces one [`FrameTime`] per frame.
///
/// The delta is clamped so that a debugger pause or a minimised window does
/// not feed a huge step to the application, and a zero-length frame on a
/// coarse timer still advances time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    dt_min: Duration,
    dt_max: Duration,
    frame_index: u64,
    elapsed: f64,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

const FPS_WINDOW: Duration = Duration::from_secs(1);

impl FrameClock {
    /// Creates a clock with a 0.1 ms minimum and 250 ms maximum delta.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta clamps.
    ///
    /// ## Arguments
    /// * `dt_min` - Smallest reported delta.
    /// * `dt_max` - Largest reported delta. Raised to `dt_min` if smaller.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        let now = Instant::now();
        Self {
            last: now,
            dt_min,
            dt_max: dt_max.max(dt_min),
            frame_index: 0,
            elapsed: 0.0,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Creates a clock using the clamps from `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let seconds = |s: f32| Duration::try_from_secs_f32(s.max(0.0)).unwrap_or(Duration::MAX);
        Self::with_clamps(
            seconds(settings.min_frame_time),
            seconds(settings.max_frame_time),
        )
    }

    /// Restarts the delta measurement, e.g. after the loop was suspended.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last = now;
        self.window_start = now;
        self.window_frames = 0;
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.advance(Instant::now())
    }

    /// Advances the clock to `now`.
    pub(crate) fn advance(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.elapsed += dt.as_secs_f64();

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_start = now;
            self.window_frames = 0;
        }

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            frame_index: self.frame_index,
            fps: self.fps,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }

    /// The number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
