// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Caption text shown over the picture.

use crate::transition::Blend;
use std::fmt;

/// A headline naming the two locations, plus one line per reading.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// `Transitioning: <from> -> <to>`.
    pub headline: String,
    /// Temperature, humidity, wind speed and cloud cover, in that order.
    pub lines: Vec<String>,
}

impl Overlay {
    /// Caption for one blend snapshot.
    pub fn from_blend(blend: &Blend) -> Self {
        let w = &blend.weather;
        Overlay {
            headline: format!("Transitioning: {} -> {}", blend.from_label, blend.to_label),
            lines: vec![
                format!("Temperature: {:.1}°C", w.temperature),
                format!("Humidity: {:.1}%", w.humidity),
                format!("Wind Speed: {:.1} m/s", w.wind_speed),
                format!("Cloud Cover: {:.1}%", w.cloud_cover),
            ],
        }
    }
}

impl fmt::Display for Overlay {
    /// Single-line form, for window titles and logs.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.headline)?;
        for line in &self.lines {
            write!(f, " | {}", line)?;
        }
        Ok(())
    }
}
