// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The morph between two locations.
//!
//! At any instant the engine knows how far through the current blend it
//! is, as a fraction clamped to [0, 1], and what the blended parameters
//! look like at that fraction.  It never fetches anything: once the
//! fraction reaches 1 the caller is expected to find the next location
//! and `advance` onto it.

use crate::error::Error;
use crate::mapper::{map, FractalParameters};
use crate::weather::WeatherRecord;

/// One resolved stop on the tour.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Display name of the location.
    pub label: String,
    /// The readings fetched for it.
    pub record: WeatherRecord,
    /// `record` run through the mapper.
    pub params: FractalParameters,
}

impl Keyframe {
    /// Map `record` once and keep both.
    pub fn new(label: &str, record: WeatherRecord) -> Self {
        Keyframe {
            label: label.to_string(),
            record,
            params: map(&record),
        }
    }
}

/// The blend currently playing.  Replaced wholesale on `advance`.
#[derive(Clone, Debug)]
pub struct TransitionState {
    /// Where the blend starts.
    pub from: Keyframe,
    /// Where it ends.
    pub to: Keyframe,
    /// Loop-clock seconds at which the blend began.
    pub start: f64,
    /// Length of every blend, in seconds.
    pub duration: f64,
}

impl TransitionState {
    /// Progress at `now`, clamped to [0, 1].
    pub fn fraction(&self, now: f64) -> f64 {
        ((now - self.start) / self.duration).max(0.0).min(1.0)
    }
}

/// A snapshot of the blend at one instant.
#[derive(Clone, Debug)]
pub struct Blend<'a> {
    /// Progress, in [0, 1].
    pub fraction: f64,
    /// Parameters to render with.
    pub params: FractalParameters,
    /// The readings blended the same way, for the overlay.
    pub weather: WeatherRecord,
    /// Label of the origin keyframe.
    pub from_label: &'a str,
    /// Label of the destination keyframe.
    pub to_label: &'a str,
}

impl<'a> Blend<'a> {
    /// True once the destination has been reached.
    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }
}

/// Owns the current blend and moves it on when asked.
#[derive(Debug)]
pub struct TransitionEngine {
    state: TransitionState,
}

impl TransitionEngine {
    /// Start blending `from` into `to` at `start`.  The duration is
    /// fixed for the life of the engine.
    pub fn new(from: Keyframe, to: Keyframe, start: f64, duration: f64) -> Result<Self, Error> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(Error::Config(format!(
                "transition duration must be a positive number of seconds, not {}",
                duration
            )));
        }
        Ok(TransitionEngine {
            state: TransitionState {
                from,
                to,
                start,
                duration,
            },
        })
    }

    /// The blend currently playing.
    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// The blend at `now`.
    pub fn tick(&self, now: f64) -> Blend<'_> {
        let t = self.state.fraction(now);
        let (from, to) = (&self.state.from, &self.state.to);
        Blend {
            fraction: t,
            params: from.params.lerp(&to.params, t),
            weather: from.record.lerp(&to.record, t),
            from_label: &from.label,
            to_label: &to.label,
        }
    }

    /// The old destination becomes the new origin, `next` the new
    /// destination, and the clock restarts at `now`.
    pub fn advance(&mut self, next: Keyframe, now: f64) {
        let from = std::mem::replace(&mut self.state.to, next);
        self.state.from = from;
        self.state.start = now;
    }
}
