// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame loop.
//!
//! One thread owns everything.  Each pass checks for a quit request,
//! reads the clock, asks the transition engine for the current blend,
//! computes and paints the field, and hands the picture to the display.
//! When a blend finishes, the loop blocks while the rotation finds the
//! next location, then carries on.

use crate::color::encode;
use crate::config::Config;
use crate::display::DisplaySink;
use crate::error::Error;
use crate::field::{compute_banded, drifting_constant};
use crate::mapper::FractalParameters;
use crate::overlay::Overlay;
use crate::rotation::{label, Rotation};
use crate::transition::{Keyframe, TransitionEngine};
use crate::weather::{WeatherRecord, WeatherSource};
use image::RgbImage;
use log::{error, info, trace};
use std::thread;
use std::time::{Duration, Instant};

/// How a show ended, when it ended without an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The display asked to stop.
    Quit,
    /// A full pass over the rotation found no usable weather.
    Exhausted,
}

/// Source of loop time, in seconds.
pub trait Clock {
    /// Seconds since the clock was created.
    fn now(&self) -> f64;

    /// Wait out the rest of a frame that began at `frame_start`.
    fn pace(&mut self, frame_start: f64, budget: Duration);
}

/// Monotonic wall time.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    /// A clock reading zero now.
    pub fn new() -> Self {
        WallClock {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn pace(&mut self, frame_start: f64, budget: Duration) {
        let spent = (self.now() - frame_start).max(0.0);
        let budget = budget.as_secs_f64();
        if spent < budget {
            thread::sleep(Duration::from_secs_f64(budget - spent));
        }
    }
}

/// Compute and paint one frame.
pub fn render_frame(
    params: &FractalParameters,
    elapsed: f64,
    width: usize,
    height: usize,
    threads: usize,
) -> RgbImage {
    let c = drifting_constant(params.c_real, params.c_imag, elapsed);
    let field = compute_banded(width, height, params.zoom, c, params.max_iterations, threads);
    encode(
        &field,
        params.hue_offset,
        params.saturation,
        params.value,
        elapsed,
    )
}

fn keyframe(rotation: &Rotation, index: usize, record: WeatherRecord) -> Keyframe {
    Keyframe::new(label(rotation.location(index)), record)
}

/// Run the show until the display quits or the rotation runs dry.
/// The display is neither opened nor closed here.
pub fn run<S, D, C>(
    config: &Config,
    source: &mut S,
    display: &mut D,
    clock: &mut C,
) -> Result<Outcome, Error>
where
    S: WeatherSource + ?Sized,
    D: DisplaySink + ?Sized,
    C: Clock + ?Sized,
{
    config.validate()?;
    let timeout = config.timeout();
    let mut rotation = Rotation::new(config.locations.clone());

    let (first, record) = rotation
        .resolve(source, 0, timeout)
        .ok_or_else(|| Error::Bootstrap("no location returned usable weather".to_string()))?;
    let from = keyframe(&rotation, first, record);
    let (mut current, record) = rotation
        .resolve(source, first + 1, timeout)
        .ok_or_else(|| Error::Bootstrap("no second location returned usable weather".to_string()))?;
    let to = keyframe(&rotation, current, record);

    let start = clock.now();
    let mut engine = TransitionEngine::new(from, to, start, config.transition_seconds)?;
    info!(
        "starting with {} -> {}",
        engine.state().from.label,
        engine.state().to.label
    );

    let budget = config.frame_budget();
    let mut frames: u64 = 0;
    loop {
        if display.quit_requested() {
            info!("quit requested after {} frames", frames);
            return Ok(Outcome::Quit);
        }

        let now = clock.now();
        let elapsed = now - start;
        let blend = engine.tick(now);
        let image = render_frame(
            &blend.params,
            elapsed,
            config.width,
            config.height,
            config.threads,
        );
        let overlay = Overlay::from_blend(&blend);
        let complete = blend.is_complete();
        display.present(&image, &overlay)?;
        frames += 1;
        trace!("frame {} rendered in {:.1} ms", frames, (clock.now() - now) * 1e3);

        if complete {
            match rotation.resolve(source, current + 1, timeout) {
                Some((index, record)) => {
                    engine.advance(keyframe(&rotation, index, record), now);
                    current = index;
                    info!(
                        "now showing {} -> {}",
                        engine.state().from.label,
                        engine.state().to.label
                    );
                }
                None => {
                    error!("every location failed in a full pass of the rotation; stopping");
                    return Ok(Outcome::Exhausted);
                }
            }
        }

        clock.pace(now, budget);
    }
}
