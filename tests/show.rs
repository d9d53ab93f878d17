use std::collections::HashMap;
use std::time::Duration;

use weatherbrot::display::{DisplaySink, Headless};
use weatherbrot::overlay::Overlay;
use weatherbrot::render::Clock;
use weatherbrot::weather::FetchError;
use weatherbrot::{run, Config, Error, Outcome, WeatherRecord, WeatherSource};

/// A clock that only moves when a frame is paced.
struct Stepped {
    now: f64,
    step: f64,
}

impl Clock for Stepped {
    fn now(&self) -> f64 {
        self.now
    }

    fn pace(&mut self, _frame_start: f64, _budget: Duration) {
        self.now += self.step;
    }
}

/// Each location answers from its own queue of successes and failures;
/// once a queue runs dry that location fails.
struct Scripted {
    answers: HashMap<String, Vec<bool>>,
    asked: Vec<String>,
}

impl Scripted {
    fn new(script: Vec<(&str, Vec<bool>)>) -> Self {
        Scripted {
            answers: script
                .into_iter()
                .map(|(name, answers)| (name.to_string(), answers.into_iter().rev().collect()))
                .collect(),
            asked: vec![],
        }
    }
}

impl WeatherSource for Scripted {
    fn fetch(&mut self, location: &str, _: Duration) -> Result<WeatherRecord, FetchError> {
        self.asked.push(location.to_string());
        let ok = self
            .answers
            .get_mut(location)
            .and_then(|a| a.pop())
            .unwrap_or(false);
        if ok {
            Ok(WeatherRecord::new(20.0, 50.0, 5.0, 40.0))
        } else {
            Err(FetchError::Transport {
                location: location.to_string(),
                reason: "timed out".to_string(),
            })
        }
    }
}

/// Remembers every caption it was shown.
struct Recorder {
    inner: Headless,
    captions: Vec<Overlay>,
}

impl DisplaySink for Recorder {
    fn present(&mut self, frame: &image::RgbImage, overlay: &Overlay) -> Result<(), Error> {
        self.captions.push(overlay.clone());
        self.inner.present(frame, overlay)
    }

    fn quit_requested(&mut self) -> bool {
        self.inner.quit_requested()
    }
}

fn config(locations: &[&str]) -> Config {
    let mut config = Config::default();
    config.width = 16;
    config.height = 12;
    config.transition_seconds = 1.0;
    config.locations = locations.iter().map(|s| s.to_string()).collect();
    config
}

#[test]
fn failing_location_is_skipped_until_a_full_cycle_fails() {
    let mut source = Scripted::new(vec![
        ("A", vec![true, true, true]),
        ("B", vec![true, true]),
        ("C", vec![false, false]),
    ]);
    let mut display = Recorder {
        inner: Headless::new(None),
        captions: vec![],
    };
    let mut clock = Stepped {
        now: 0.0,
        step: 0.25,
    };

    let outcome = run(&config(&["A", "B", "C"]), &mut source, &mut display, &mut clock).unwrap();

    // C failing twice never ends the show; only the final pass where
    // every location fails does.
    assert_eq!(outcome, Outcome::Exhausted);
    assert_eq!(
        source.asked,
        vec!["A", "B", "C", "A", "B", "C", "A", "B", "C", "A"]
    );
    // Five frames for the first blend (0.0 ..= 1.0), four for each after.
    assert_eq!(display.captions.len(), 17);

    let headlines: Vec<&str> = display
        .captions
        .iter()
        .map(|c| c.headline.as_str())
        .collect();
    assert_eq!(headlines[0], "Transitioning: A -> B");
    assert_eq!(headlines[5], "Transitioning: B -> A");
    assert_eq!(headlines[9], "Transitioning: A -> B");
    assert_eq!(headlines[13], "Transitioning: B -> A");
}

#[test]
fn quit_is_honoured_at_the_frame_boundary() {
    let mut source = weatherbrot::weather::Synthetic::new(3);
    let mut display = Headless::new(Some(3));
    let mut clock = Stepped {
        now: 0.0,
        step: 0.1,
    };
    let outcome = run(&config(&["X,AA", "Y,BB"]), &mut source, &mut display, &mut clock).unwrap();
    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(display.presented(), 3);
}

#[test]
fn bootstrap_needs_a_first_location() {
    let mut source = Scripted::new(vec![]);
    let mut display = Headless::new(Some(1));
    let mut clock = Stepped {
        now: 0.0,
        step: 0.1,
    };
    match run(&config(&["A", "B"]), &mut source, &mut display, &mut clock) {
        Err(Error::Bootstrap(_)) => {}
        other => panic!("expected a bootstrap failure, got {:?}", other),
    }
    assert_eq!(display.presented(), 0);
}

#[test]
fn bootstrap_needs_a_second_location() {
    // A answers once, then every search comes up empty.
    let mut source = Scripted::new(vec![("A", vec![true])]);
    let mut display = Headless::new(Some(1));
    let mut clock = Stepped {
        now: 0.0,
        step: 0.1,
    };
    match run(&config(&["A", "B"]), &mut source, &mut display, &mut clock) {
        Err(Error::Bootstrap(_)) => {}
        other => panic!("expected a bootstrap failure, got {:?}", other),
    }
    assert_eq!(source.asked, vec!["A", "B", "A"]);
}

#[test]
fn invalid_settings_never_fetch() {
    let mut source = Scripted::new(vec![("A", vec![true, true])]);
    let mut display = Headless::new(Some(1));
    let mut clock = Stepped {
        now: 0.0,
        step: 0.1,
    };
    let mut cfg = config(&["A"]);
    cfg.transition_seconds = 0.0;
    match run(&cfg, &mut source, &mut display, &mut clock) {
        Err(Error::Config(_)) => {}
        other => panic!("expected a configuration failure, got {:?}", other),
    }
    assert!(source.asked.is_empty());
}

#[test]
fn captions_follow_the_blend() {
    let mut source = Scripted::new(vec![("Cold,AQ", vec![true]), ("Hot,LY", vec![true])]);
    let mut display = Recorder {
        inner: Headless::new(Some(3)),
        captions: vec![],
    };
    let mut clock = Stepped {
        now: 0.0,
        step: 0.25,
    };
    run(
        &config(&["Cold,AQ", "Hot,LY"]),
        &mut source,
        &mut display,
        &mut clock,
    )
    .unwrap();
    // Both scripted records are identical, so the readings hold steady
    // while the labels carry the country-less names.
    for caption in &display.captions {
        assert_eq!(caption.headline, "Transitioning: Cold -> Hot");
        assert_eq!(caption.lines[0], "Temperature: 20.0°C");
    }
}
