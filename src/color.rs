// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Paints a scalar field.  Each cell's value becomes a hue offset; the
//! saturation and value are shared by the whole frame.  The palette
//! also rotates slowly with time, one full turn every twenty seconds.

use crate::field::ScalarField;
use image::{Rgb, RgbImage};

/// Hue turns per second.
const HUE_DRIFT: f64 = 0.05;

/// Reduce a hue into [0, 1).  `rem_euclid` alone can round a tiny
/// negative input up to exactly 1.0.
pub fn wrap_hue(hue: f64) -> f64 {
    let h = hue.rem_euclid(1.0);
    if h >= 1.0 {
        0.0
    } else {
        h
    }
}

/// Sector-based HSV to RGB, all components in [0, 1] for inputs in
/// [0, 1].
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

fn channel(component: f64) -> u8 {
    // Float-to-int `as` saturates, so out-of-range components pin to 0 or 255.
    (component * 255.0) as u8
}

/// Color a field.  `elapsed` is the seconds since the show started.
pub fn encode(
    field: &ScalarField,
    hue_offset: f64,
    saturation: f64,
    value: f64,
    elapsed: f64,
) -> RgbImage {
    let shift = hue_offset + elapsed * HUE_DRIFT;
    let mut image = RgbImage::new(field.width() as u32, field.height() as u32);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let hue = wrap_hue(field.get(x as usize, y as usize) + shift);
        let [r, g, b] = hsv_to_rgb(hue, saturation, value);
        *pixel = Rgb([channel(r), channel(g), channel(b)]);
    }
    image
}
