// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners.  Unlike a texture mapping, both edges of the complex
//! rectangle are sampled: the last column lands exactly on the right
//! edge, the last row exactly on the top edge.
use num::Complex;

/// Width and height of an integral plane that starts at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// The lower-left corner and upper-right corner of the Complex
/// plane, treating the real part of each value as the x-component
/// and the imaginary part of each value as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Column, row of a cell in the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps grid cells onto sample points of the complex plane.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// The two corners defining the complex plane, left-lower and
    /// right-upper.
    pub complex_plane: ComplexPlane,
    // Distance in the complex plane between neighbouring cells, along
    // the real and imaginary axes.
    steps: (f64, f64),
}

/// The fixed Julia viewport: -2..2 on both axes, sampled by a
/// `width` x `height` grid.
pub fn julia_viewport(width: usize, height: usize) -> PlaneMapper {
    PlaneMapper {
        integral_plane: IntegralPlane(width, height),
        complex_plane: ComplexPlane(Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0)),
        steps: (step(4.0, width), step(4.0, height)),
    }
}

fn step(extent: f64, cells: usize) -> f64 {
    if cells > 1 {
        extent / ((cells - 1) as f64)
    } else {
        0.0
    }
}

impl PlaneMapper {
    /// The total number of cells in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// True when either side of the grid is zero.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral plane, return the sample point on
    /// the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.complex_plane.0.re + (pixel.0 as f64) * self.steps.0,
            self.complex_plane.0.im + (pixel.1 as f64) * self.steps.1,
        )
    }
}
