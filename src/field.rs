// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time field for the quadratic Julia map.
//!
//! Every cell of the grid seeds `z` with its own point on the complex
//! plane (scaled down by the zoom), then repeatedly applies
//! `z <- z*z + c` with a single frame-wide `c`.  The number of steps
//! it takes `z` to leave the radius-2 disc is the cell's "velocity".
//! Cells that never leave within the budget are recorded with the full
//! budget.  The counts are finally divided by the largest count in
//! the field, so that whatever the budget, the brightest cell is 1.0.

use crate::planes::{julia_viewport, Pixel, PlaneMapper};
use itertools::iproduct;
use num::Complex;

/// How far `c` wanders from its weather-derived centre.
const DRIFT_RADIUS: f64 = 0.1;

/// A normalized escape-time grid, row-major, every value in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl ScalarField {
    /// Wrap an existing row-major grid.  Values are taken as given.
    #[cfg(test)]
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<f64>) -> Self {
        assert!(cells.len() == width * height);
        ScalarField {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    /// The whole grid, row-major.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
}

/// The frame's Julia constant.  It circles the weather-derived value
/// once every 2π seconds, independently of any weather transition.
pub fn drifting_constant(c_real: f64, c_imag: f64, elapsed: f64) -> Complex<f64> {
    Complex::new(
        c_real + DRIFT_RADIUS * elapsed.sin(),
        c_imag + DRIFT_RADIUS * elapsed.cos(),
    )
}

/// This is our classic iterator function.  Returns the number of steps
/// taken before `z` escaped, or `max_iterations` if it never did.  The
/// escape test happens before each step, so a seed already outside the
/// disc scores zero.
pub fn escape_time(z0: Complex<f64>, c: Complex<f64>, max_iterations: usize) -> usize {
    let mut z = z0;
    for n in 0..max_iterations {
        if z.norm_sqr() > 4.0 {
            return n;
        }
        z = z * z + c;
    }
    max_iterations
}

/// Fill `counts` with raw escape times for the rows starting at
/// `first_row`.  `counts` must hold a whole number of rows.
fn fill_rows(
    plane: &PlaneMapper,
    zoom: f64,
    c: Complex<f64>,
    max_iterations: usize,
    first_row: usize,
    counts: &mut [usize],
) {
    let width = plane.integral_plane.0;
    let rows = counts.len() / width;
    for ((row, column), count) in iproduct!(first_row..first_row + rows, 0..width).zip(counts) {
        let z0 = plane.pixel_to_point(&Pixel(column, row)) / zoom;
        *count = escape_time(z0, c, max_iterations);
    }
}

fn normalize(plane: &PlaneMapper, counts: Vec<usize>) -> ScalarField {
    let max = counts.iter().cloned().max().unwrap_or(0);
    let cells = if max == 0 {
        vec![0.0; counts.len()]
    } else {
        let max = max as f64;
        counts.into_iter().map(|n| n as f64 / max).collect()
    };
    ScalarField {
        width: plane.integral_plane.0,
        height: plane.integral_plane.1,
        cells,
    }
}

/// The reference, single-threaded field computation.
pub fn compute(
    width: usize,
    height: usize,
    zoom: f64,
    c: Complex<f64>,
    max_iterations: usize,
) -> ScalarField {
    let plane = julia_viewport(width, height);
    let mut counts = vec![0 as usize; plane.len()];
    if !plane.is_empty() {
        fill_rows(&plane, zoom, c, max_iterations, 0, &mut counts);
    }
    normalize(&plane, counts)
}

/// Same field as `compute`, with the rows split into contiguous bands
/// and each band handed to its own scoped thread.  The per-cell work is
/// identical, so the result is identical.
pub fn compute_banded(
    width: usize,
    height: usize,
    zoom: f64,
    c: Complex<f64>,
    max_iterations: usize,
    threads: usize,
) -> ScalarField {
    if threads <= 1 {
        return compute(width, height, zoom, c, max_iterations);
    }

    let plane = julia_viewport(width, height);
    let mut counts = vec![0 as usize; plane.len()];
    if !plane.is_empty() {
        let band_rows = (height + threads - 1) / threads;
        let plane = &plane;
        let result = crossbeam::scope(|spawner| {
            for (band, region) in counts.chunks_mut(band_rows * width).enumerate() {
                spawner.spawn(move |_| {
                    fill_rows(plane, zoom, c, max_iterations, band * band_rows, region);
                });
            }
        });
        if let Err(panic) = result {
            std::panic::resume_unwind(panic);
        }
    }
    normalize(&plane, counts)
}
