//! Interpolation cursor driven by the frame clock.
//!
//! A [`MoveAnimation`] advances a cursor from 0 towards its stop value (normally 1)
//! proportionally to the wall-clock time elapsed since the first frame. Owners never
//! reset one: when the animated thing changes identity they build a fresh instance.

use std::time::{Duration, Instant};

use log::debug;

/// Default duration of a move animation
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Settled,
}

#[derive(Clone, Debug)]
pub struct MoveAnimation {
    duration: Duration,
    stop_value: f32,
    started_at: Option<Instant>,
    cursor: f32,
    state: AnimationState,
}

impl MoveAnimation {
    pub fn new(duration: Duration) -> Self {
        Self::with_stop_value(duration, 1.0)
    }

    /// Animation that freezes at `stop_value` instead of running to completion.
    /// Used by test harnesses to capture intermediate frames. A non-finite
    /// stop value runs to completion.
    pub fn with_stop_value(duration: Duration, stop_value: f32) -> Self {
        let stop_value = if stop_value.is_finite() {
            stop_value.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let state = if stop_value <= 0.0 {
            AnimationState::Settled
        } else {
            AnimationState::Running
        };
        Self {
            duration,
            stop_value,
            started_at: None,
            cursor: 0.0,
            state,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn stop_value(&self) -> f32 {
        self.stop_value
    }

    /// Whether another frame must be scheduled
    pub fn needs_frame(&self) -> bool {
        self.state == AnimationState::Running
    }

    /// Process one frame callback at time `now` and return the new cursor.
    ///
    /// The first frame anchors the clock. Once the cursor reaches the stop value
    /// the animation settles and later calls leave it unchanged.
    pub fn on_frame(&mut self, now: Instant) -> f32 {
        if self.state == AnimationState::Settled {
            return self.cursor;
        }
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);

        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        // never move backwards, even if the clock does
        self.cursor = progress.clamp(self.cursor, self.stop_value);

        if self.cursor >= self.stop_value {
            self.cursor = self.stop_value;
            self.state = AnimationState::Settled;
            debug!("animation settled at cursor {}", self.cursor);
        }
        self.cursor
    }
}

impl Default for MoveAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_DURATION)
    }
}
