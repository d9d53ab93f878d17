// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Weather readings and the places they come from.
//!
//! A `WeatherSource` takes a location id (an OpenWeatherMap style
//! `"City,CC"` query) and hands back a single `WeatherRecord`, or a
//! `FetchError` explaining why it could not.  The renderer never
//! retries a failed location on the spot; it just moves on to the next
//! one in the rotation.

use failure::Fail;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::time::Duration;

/// One normalized reading for one location.  Temperatures are in
/// Celsius, humidity and cloud cover are percentages, and wind speed
/// is in meters per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeatherRecord {
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity, 0 to 100.
    pub humidity: f64,
    /// Wind speed, m/s.
    pub wind_speed: f64,
    /// Cloud cover, 0 to 100.
    pub cloud_cover: f64,
}

impl WeatherRecord {
    /// Constructor.  Values are taken as-is; nothing is clamped.
    pub fn new(temperature: f64, humidity: f64, wind_speed: f64, cloud_cover: f64) -> Self {
        WeatherRecord {
            temperature,
            humidity,
            wind_speed,
            cloud_cover,
        }
    }

    /// Field-wise linear blend toward `other`.  Used to show the
    /// in-between readings while the picture morphs.
    pub fn lerp(&self, other: &WeatherRecord, t: f64) -> WeatherRecord {
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        WeatherRecord {
            temperature: mix(self.temperature, other.temperature),
            humidity: mix(self.humidity, other.humidity),
            wind_speed: mix(self.wind_speed, other.wind_speed),
            cloud_cover: mix(self.cloud_cover, other.cloud_cover),
        }
    }
}

/// Everything that can go wrong while asking for a single location.
/// All of these mean the same thing to the rotation: skip it.
#[derive(Debug, Fail)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout).
    #[fail(display = "request for {} failed: {}", location, reason)]
    Transport {
        /// The location asked for.
        location: String,
        /// What the transport reported.
        reason: String,
    },
    /// The service answered with a non-success status.
    #[fail(display = "request for {} returned HTTP {}", location, status)]
    Status {
        /// The location asked for.
        location: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body was not the JSON we expected.
    #[fail(display = "could not parse weather for {}: {}", location, reason)]
    Parse {
        /// The location asked for.
        location: String,
        /// What the decoder reported.
        reason: String,
    },
    /// The body parsed but one of the four readings was absent.
    #[fail(display = "weather for {} is missing {}", location, field)]
    Incomplete {
        /// The location asked for.
        location: String,
        /// Dotted path of the absent reading, e.g. `main.temp`.
        field: &'static str,
    },
    /// The HTTP source was selected without a key.
    #[fail(display = "no OpenWeatherMap API key configured")]
    MissingApiKey,
}

/// Anything that can turn a location id into a reading.
pub trait WeatherSource {
    /// Blocking fetch of the current reading for `location`.
    fn fetch(&mut self, location: &str, timeout: Duration) -> Result<WeatherRecord, FetchError>;
}

#[derive(Deserialize)]
struct Payload {
    main: Option<MainBlock>,
    wind: Option<WindBlock>,
    clouds: Option<CloudBlock>,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Deserialize)]
struct WindBlock {
    speed: Option<f64>,
}

#[derive(Deserialize)]
struct CloudBlock {
    all: Option<f64>,
}

/// Decode an OpenWeatherMap "current weather" body.  A partial record
/// is never returned: any missing reading is an `Incomplete` failure.
pub fn parse_openweather(location: &str, body: &str) -> Result<WeatherRecord, FetchError> {
    let payload: Payload = serde_json::from_str(body).map_err(|e| FetchError::Parse {
        location: location.to_string(),
        reason: e.to_string(),
    })?;

    let missing = |field: &'static str| FetchError::Incomplete {
        location: location.to_string(),
        field,
    };

    let main = payload.main.ok_or_else(|| missing("main"))?;
    let temperature = main.temp.ok_or_else(|| missing("main.temp"))?;
    let humidity = main.humidity.ok_or_else(|| missing("main.humidity"))?;
    let wind_speed = payload
        .wind
        .and_then(|w| w.speed)
        .ok_or_else(|| missing("wind.speed"))?;
    let cloud_cover = payload
        .clouds
        .and_then(|c| c.all)
        .ok_or_else(|| missing("clouds.all"))?;

    Ok(WeatherRecord::new(
        temperature,
        humidity,
        wind_speed,
        cloud_cover,
    ))
}

/// The OpenWeatherMap current-weather endpoint, queried in metric units.
pub struct OpenWeather {
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeather {
    /// Fetches fail with `MissingApiKey` until a key is given.
    pub fn new(api_key: Option<String>, base_url: &str) -> Self {
        OpenWeather {
            api_key,
            base_url: base_url.to_string(),
        }
    }
}

impl WeatherSource for OpenWeather {
    fn fetch(&mut self, location: &str, timeout: Duration) -> Result<WeatherRecord, FetchError> {
        let key = self.api_key.as_ref().ok_or(FetchError::MissingApiKey)?;
        let response = ureq::get(&self.base_url)
            .timeout(timeout)
            .query("q", location)
            .query("appid", key)
            .query("units", "metric")
            .call();

        let body = match response {
            Ok(response) => response.into_string().map_err(|e| FetchError::Transport {
                location: location.to_string(),
                reason: e.to_string(),
            })?,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status {
                    location: location.to_string(),
                    status,
                })
            }
            Err(e) => {
                return Err(FetchError::Transport {
                    location: location.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        parse_openweather(location, &body)
    }
}

/// Offline source.  Produces plausible readings from a seeded
/// generator, so the same seed always plays the same show.
pub struct Synthetic {
    rng: StdRng,
}

impl Synthetic {
    /// A source whose readings are fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Synthetic {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl WeatherSource for Synthetic {
    fn fetch(&mut self, _location: &str, _timeout: Duration) -> Result<WeatherRecord, FetchError> {
        Ok(WeatherRecord::new(
            self.rng.gen_range(-10.0..40.0),
            self.rng.gen_range(0.0..100.0),
            self.rng.gen_range(0.0..20.0),
            self.rng.gen_range(0.0..100.0),
        ))
    }
}
