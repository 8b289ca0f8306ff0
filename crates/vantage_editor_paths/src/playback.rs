// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock driving objects along their paths.

use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped at the start
    #[default]
    Stopped,
    /// Advancing
    Playing,
    /// Holding the current time
    Paused,
}

/// Global path clock.
///
/// Paths clamp or wrap the time themselves, so the clock only ever moves
/// forward from zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathPlayback {
    time: f32,
    state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f32,
}

impl PathPlayback {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: PlaybackState::Stopped,
            speed: 1.0,
        }
    }

    /// Advance the clock. Returns true when the time changed.
    ///
    /// Non-finite and non-positive steps are ignored.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.state != PlaybackState::Playing || !delta_time.is_finite() || delta_time <= 0.0 {
            return false;
        }
        self.time += delta_time * self.speed.max(0.0);
        true
    }

    /// Current time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind to zero
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Jump to a time
    pub fn seek(&mut self, time: f32) {
        if !time.is_finite() {
            return;
        }
        self.time = time.max(0.0);
    }

    /// Whether the clock is advancing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PathPlayback {
    fn default() -> Self {
        Self::new()
    }
}
