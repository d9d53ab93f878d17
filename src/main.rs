// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::error;
use std::path::Path;
use std::str::FromStr;
use weatherbrot::config::Provider;
use weatherbrot::display::{DisplaySink, Headless};
use weatherbrot::weather::{OpenWeather, Synthetic};
use weatherbrot::{Config, Error, Outcome, WallClock, WeatherSource};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const CONFIG: &str = "config";
const SIZE: &str = "size";
const DURATION: &str = "duration";
const THREADS: &str = "threads";
const SOURCE: &str = "source";
const LOCATIONS: &str = "locations";
const SEED: &str = "seed";
const FRAMES: &str = "frames";
const HEADLESS: &str = "headless";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("weatherbrot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Animated Julia sets steered by the weather")
        .arg(
            Arg::with_name(CONFIG)
                .long(CONFIG)
                .short("c")
                .takes_value(true)
                .help("TOML settings file (default: ./weatherbrot.toml if present)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse image size"))
                .help("Size of the picture, WIDTHxHEIGHT [800x600]"),
        )
        .arg(
            Arg::with_name(DURATION)
                .long(DURATION)
                .short("d")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0.001,
                        86_400.0,
                        "Could not parse transition duration",
                        "Transition duration must be between 0.001 and 86400 seconds",
                    )
                })
                .help("Seconds spent morphing from one place to the next [10]"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads computing each frame [1]"),
        )
        .arg(
            Arg::with_name(SOURCE)
                .long(SOURCE)
                .takes_value(true)
                .possible_values(&["openweather", "synthetic"])
                .help("Where the weather comes from [openweather]"),
        )
        .arg(
            Arg::with_name(LOCATIONS)
                .long(LOCATIONS)
                .short("l")
                .takes_value(true)
                .help("Semicolon-separated places, e.g. \"Oslo,NO;Lima,PE\""),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        u64::max_value(),
                        "Could not parse seed",
                        "Seed out of range",
                    )
                })
                .help("Seed for the synthetic weather source [0]"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        u64::max_value(),
                        "Could not parse frame count",
                        "Frame count must be at least 1",
                    )
                })
                .help("Stop after this many frames (headless only)"),
        )
        .arg(
            Arg::with_name(HEADLESS)
                .long(HEADLESS)
                .help("Render without opening a window"),
        )
        .get_matches()
}

/// File settings, overridden by whatever was given on the command line.
fn configure(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = match matches.value_of(CONFIG) {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::discover()?,
    };
    if let Some((width, height)) = matches.value_of(SIZE).and_then(|s| parse_pair::<u16>(s, 'x')) {
        config.width = width as usize;
        config.height = height as usize;
    }
    if let Some(duration) = matches.value_of(DURATION).and_then(|s| s.parse().ok()) {
        config.transition_seconds = duration;
    }
    if let Some(threads) = matches.value_of(THREADS).and_then(|s| s.parse().ok()) {
        config.threads = threads;
    }
    if let Some(provider) = matches.value_of(SOURCE).and_then(|s| s.parse().ok()) {
        config.weather.provider = provider;
    }
    if let Some(seed) = matches.value_of(SEED).and_then(|s| s.parse().ok()) {
        config.weather.seed = seed;
    }
    if let Some(locations) = matches.value_of(LOCATIONS) {
        config.locations = locations
            .split(';')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }
    config.validate()?;
    Ok(config)
}

fn weather_source(config: &Config) -> Box<dyn WeatherSource> {
    match config.weather.provider {
        Provider::OpenWeather => {
            Box::new(OpenWeather::new(config.api_key(), &config.weather.base_url))
        }
        Provider::Synthetic => Box::new(Synthetic::new(config.weather.seed)),
    }
}

#[cfg(feature = "window")]
fn open_window(config: &Config) -> Result<Box<dyn DisplaySink>, Error> {
    let window = weatherbrot::display::WindowDisplay::open(config.width, config.height)?;
    Ok(Box::new(window))
}

#[cfg(not(feature = "window"))]
fn open_window(_config: &Config) -> Result<Box<dyn DisplaySink>, Error> {
    log::warn!("built without the `window` feature; rendering headless");
    Ok(Box::new(Headless::new(None)))
}

fn open_display(config: &Config, matches: &ArgMatches) -> Result<Box<dyn DisplaySink>, Error> {
    let frames = matches.value_of(FRAMES).and_then(|s| s.parse().ok());
    if matches.is_present(HEADLESS) || frames.is_some() {
        Ok(Box::new(Headless::new(frames)))
    } else {
        open_window(config)
    }
}

fn show(matches: &ArgMatches) -> Result<Outcome, failure::Error> {
    let config = configure(matches)?;
    let mut source = weather_source(&config);
    let mut display = open_display(&config, matches)?;
    let outcome = weatherbrot::run(&config, &mut *source, &mut *display, &mut WallClock::new());
    display.close();
    Ok(outcome?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();

    match show(&matches) {
        Ok(Outcome::Quit) => {}
        Ok(Outcome::Exhausted) => std::process::exit(2),
        Err(e) => {
            error!("{}", e);
            for cause in e.iter_causes() {
                error!("  caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}
