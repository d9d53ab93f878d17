#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Weather-driven Julia set renderer
//!
//! A Julia set is what you get by taking every point `z` of a patch of
//! the complex plane and repeatedly replacing it with `z*z + c` for some
//! fixed constant `c`, counting how many steps it takes each point to
//! run off toward infinity.  That count, the "velocity", is what gets
//! painted.  Small changes in `c` reshape the whole picture, which is
//! what makes it fun to steer with something as restless as the
//! weather.
//!
//! The show visits a list of places in turn.  For each one, the current
//! temperature, humidity, wind and cloud cover become a zoom, a `c`,
//! an iteration budget and a palette (`mapper`).  Over a fixed window
//! the picture morphs from one place's parameters to the next
//! (`transition`), while `c` also wanders in a small circle and the
//! palette slowly rotates, so the picture never holds still.  When a
//! morph completes, the next place in the `rotation` is fetched and
//! the morph begins again.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod field;
pub mod mapper;
pub mod overlay;
pub mod planes;
pub mod render;
pub mod rotation;
pub mod transition;
pub mod weather;

pub use config::Config;
pub use error::Error;
pub use render::{run, Outcome, WallClock};
pub use weather::{WeatherRecord, WeatherSource};
