// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a weather reading into the knobs of a Julia set.
//!
//! Every field is a plain affine rescale of one reading.  The input
//! ranges are the "usual" weather ranges, but nothing is clamped:
//! a 45° day simply extrapolates past the end of the palette.

use crate::weather::WeatherRecord;

/// Below this the viewport would collapse to a point (or flip).
const MIN_ZOOM: f64 = 1e-6;

/// The full set of values one frame of the fractal needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractalParameters {
    /// Divides the sample plane; larger values zoom in.
    pub zoom: f64,
    /// Real part of the Julia constant.
    pub c_real: f64,
    /// Imaginary part of the Julia constant.
    pub c_imag: f64,
    /// Escape-time budget per pixel.
    pub max_iterations: usize,
    /// Base hue rotation, nominally [0, 1).
    pub hue_offset: f64,
    /// Frame-wide saturation, nominally [0.5, 1].
    pub saturation: f64,
    /// Frame-wide value, nominally [0.5, 1].
    pub value: f64,
}

impl FractalParameters {
    /// Field-wise blend toward `other`.  The iteration budget is blended
    /// as a real number and then truncated.
    pub fn lerp(&self, other: &FractalParameters, t: f64) -> FractalParameters {
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        let iterations = mix(self.max_iterations as f64, other.max_iterations as f64);
        FractalParameters {
            zoom: mix(self.zoom, other.zoom),
            c_real: mix(self.c_real, other.c_real),
            c_imag: mix(self.c_imag, other.c_imag),
            max_iterations: (iterations as usize).max(1),
            hue_offset: mix(self.hue_offset, other.hue_offset),
            saturation: mix(self.saturation, other.saturation),
            value: mix(self.value, other.value),
        }
    }
}

/// Rescale `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
/// Values outside the input range extrapolate.
pub fn map_value(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// The weather-to-fractal mapping.  Pure and total.
pub fn map(record: &WeatherRecord) -> FractalParameters {
    let zoom = map_value(record.wind_speed, 0.0, 20.0, 0.5, 2.0);
    let iterations = 50.0 + record.cloud_cover.round();
    FractalParameters {
        zoom: if zoom > MIN_ZOOM { zoom } else { MIN_ZOOM },
        c_real: map_value(record.temperature, -10.0, 40.0, -1.0, 1.0),
        c_imag: map_value(record.humidity, 0.0, 100.0, -1.0, 1.0),
        max_iterations: if iterations >= 1.0 {
            iterations as usize
        } else {
            1
        },
        hue_offset: map_value(record.temperature, -10.0, 40.0, 0.0, 1.0),
        saturation: map_value(record.humidity, 0.0, 100.0, 0.5, 1.0),
        value: map_value(record.cloud_cover, 0.0, 100.0, 0.5, 1.0),
    }
}
