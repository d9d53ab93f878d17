// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Settings, read from an optional TOML file.  Every key has a
//! default, so a file only needs to mention what it changes.

use crate::error::Error;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Looked for in the working directory when no file is named.
pub const DEFAULT_FILE: &str = "weatherbrot.toml";

/// Environment fallback for `weather.api_key`.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Everything the show needs to know before it starts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Target frame rate.
    pub fps: u32,
    /// Length of each morph between two locations.
    pub transition_seconds: f64,
    /// Worker threads per frame; 1 computes on the loop thread.
    pub threads: usize,
    /// Location ids in visiting order, e.g. `"Tokyo,JP"`.
    pub locations: Vec<String>,
    /// The `[weather]` table.
    pub weather: WeatherConfig,
}

/// Where weather comes from.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// The OpenWeatherMap current-weather endpoint.
    OpenWeather,
    /// Seeded random readings, no network.
    Synthetic,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openweather" => Ok(Provider::OpenWeather),
            "synthetic" => Ok(Provider::Synthetic),
            _ => Err(format!("unknown weather source '{}'", s)),
        }
    }
}

/// Settings for the weather source.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    /// Which source to use.
    pub provider: Provider,
    /// OpenWeatherMap key.  Falls back to `API_KEY_VAR`.
    pub api_key: Option<String>,
    /// Current-weather endpoint.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Seed for the synthetic source.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 800,
            height: 600,
            fps: 30,
            transition_seconds: 10.0,
            threads: 1,
            locations: ["Tehran,IR", "New York,US", "Tokyo,JP", "London,UK", "Sydney,AU"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            provider: Provider::OpenWeather,
            api_key: None,
            base_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            timeout_seconds: 10,
            seed: 0,
        }
    }
}

impl Config {
    /// Parse TOML text.  Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Config, Error> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a named file.  A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Config, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Config::from_toml(&text)
    }

    /// `DEFAULT_FILE` if there is one, the built-in defaults otherwise.
    pub fn discover() -> Result<Config, Error> {
        let path = Path::new(DEFAULT_FILE);
        if path.exists() {
            Config::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject settings that could never run.
    pub fn validate(&self) -> Result<(), Error> {
        let fail = |reason: &str| Err(Error::Config(reason.to_string()));
        if self.width == 0 || self.height == 0 {
            return fail("width and height must both be at least 1");
        }
        if self.fps == 0 {
            return fail("fps must be at least 1");
        }
        if !(self.transition_seconds.is_finite() && self.transition_seconds > 0.0) {
            return fail("transition_seconds must be a positive number");
        }
        if self.threads == 0 {
            return fail("threads must be at least 1");
        }
        if self.locations.is_empty() {
            return fail("at least one location is required");
        }
        Ok(())
    }

    /// Wall time allotted to one frame.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Per-request weather timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_seconds)
    }

    /// The configured key, or the environment's.
    pub fn api_key(&self) -> Option<String> {
        self.weather
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_VAR).ok())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 600);
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.transition_seconds, 10.0);
        assert_eq!(cfg.threads, 1);
        assert_eq!(cfg.locations.len(), 5);
        assert_eq!(cfg.locations[0], "Tehran,IR");
        assert_eq!(cfg.weather.provider, Provider::OpenWeather);
        assert_eq!(cfg.weather.timeout_seconds, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let cfg = Config::from_toml("fps = 12\n[weather]\nprovider = \"synthetic\"\n").unwrap();
        assert_eq!(cfg.fps, 12);
        assert_eq!(cfg.weather.provider, Provider::Synthetic);
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.weather.timeout_seconds, 10);
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
width = 320
height = 200
fps = 24
transition_seconds = 4.5
threads = 3
locations = ["Oslo,NO", "Lima,PE"]

[weather]
provider = "openweather"
api_key = "abc123"
base_url = "http://localhost:8080/weather"
timeout_seconds = 2
seed = 99
"#;
        let cfg = Config::from_toml(text).unwrap();
        assert_eq!(cfg.width, 320);
        assert_eq!(cfg.height, 200);
        assert_eq!(cfg.fps, 24);
        assert_eq!(cfg.transition_seconds, 4.5);
        assert_eq!(cfg.threads, 3);
        assert_eq!(cfg.locations, vec!["Oslo,NO", "Lima,PE"]);
        assert_eq!(cfg.weather.api_key.as_ref().map(|s| s.as_str()), Some("abc123"));
        assert_eq!(cfg.weather.base_url, "http://localhost:8080/weather");
        assert_eq!(cfg.timeout(), Duration::from_secs(2));
        assert_eq!(cfg.weather.seed, 99);
        assert_eq!(cfg.api_key(), Some("abc123".to_string()));
    }

    #[test]
    fn test_bad_provider_is_an_error() {
        assert!(Config::from_toml("[weather]\nprovider = \"carrier-pigeon\"\n").is_err());
        assert!("carrier-pigeon".parse::<Provider>().is_err());
        assert_eq!("synthetic".parse::<Provider>(), Ok(Provider::Synthetic));
    }

    #[test]
    fn test_validation() {
        let bad = |f: &dyn Fn(&mut Config)| {
            let mut cfg = Config::default();
            f(&mut cfg);
            cfg.validate().is_err()
        };
        assert!(bad(&|c| c.width = 0));
        assert!(bad(&|c| c.height = 0));
        assert!(bad(&|c| c.fps = 0));
        assert!(bad(&|c| c.transition_seconds = 0.0));
        assert!(bad(&|c| c.transition_seconds = -3.0));
        assert!(bad(&|c| c.transition_seconds = std::f64::NAN));
        assert!(bad(&|c| c.transition_seconds = std::f64::INFINITY));
        assert!(bad(&|c| c.threads = 0));
        assert!(bad(&|c| c.locations.clear()));
    }

    #[test]
    fn test_frame_budget() {
        let cfg = Config::default();
        let budget = cfg.frame_budget().as_secs_f64();
        assert!((budget - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 64\nheight = 48").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!((cfg.width, cfg.height), (64, 48));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("nope.toml")).is_err());
    }
}
