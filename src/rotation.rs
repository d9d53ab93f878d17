// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cyclic list of places the show visits.
//!
//! Finding the next place to show is a small conversation: the
//! rotation asks for a location, somebody fetches it, and the answer
//! goes back in.  A failed location is skipped and the next one is
//! asked for; once every location has been asked once without luck the
//! rotation is exhausted.  Nothing here does any I/O itself, so the
//! fetching can happen on whatever thread or schedule the caller likes;
//! `resolve` is the plain blocking driver.

use crate::weather::{FetchError, WeatherRecord, WeatherSource};
use log::warn;
use std::time::Duration;

/// A request for one location's weather.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    /// Position in the rotation.
    pub index: usize,
    /// The id to hand to the weather source.
    pub location: String,
}

/// What the rotation wants next, after hearing an answer.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// This location produced a usable record.
    Found(usize, WeatherRecord),
    /// That one failed; try this one.
    Fetch(FetchRequest),
    /// Every location has been tried once in this search.
    Exhausted,
}

#[derive(Debug)]
struct Search {
    current: usize,
    attempts: usize,
}

/// Ordered, wrapping list of location ids.
#[derive(Debug)]
pub struct Rotation {
    locations: Vec<String>,
    search: Option<Search>,
}

/// The display name of a location id: everything before the first comma.
pub fn label(location: &str) -> &str {
    location.split(',').next().unwrap_or(location).trim()
}

impl Rotation {
    /// A rotation over `locations`, in order.
    pub fn new(locations: Vec<String>) -> Self {
        Rotation {
            locations,
            search: None,
        }
    }

    /// The location id at `index`, wrapping.
    pub fn location(&self, index: usize) -> &str {
        &self.locations[index % self.locations.len()]
    }

    fn request(&self, index: usize) -> FetchRequest {
        let index = index % self.locations.len();
        FetchRequest {
            index,
            location: self.locations[index].clone(),
        }
    }

    /// Open a new search starting at `start` (wrapping).  Returns the
    /// first request, or `None` when there is nothing to search.
    pub fn begin(&mut self, start: usize) -> Option<FetchRequest> {
        if self.locations.is_empty() {
            self.search = None;
            return None;
        }
        let request = self.request(start);
        self.search = Some(Search {
            current: request.index,
            attempts: 1,
        });
        Some(request)
    }

    /// Feed the answer to the last request back in.
    pub fn respond(&mut self, answer: Result<WeatherRecord, FetchError>) -> Step {
        let search = match self.search.take() {
            Some(search) => search,
            None => return Step::Exhausted,
        };
        match answer {
            Ok(record) => Step::Found(search.current, record),
            Err(e) => {
                warn!("skipping {}: {}", self.locations[search.current], e);
                if search.attempts >= self.locations.len() {
                    return Step::Exhausted;
                }
                let request = self.request(search.current + 1);
                self.search = Some(Search {
                    current: request.index,
                    attempts: search.attempts + 1,
                });
                Step::Fetch(request)
            }
        }
    }

    /// Blocking search from `start`.  `None` means the rotation is
    /// exhausted.
    pub fn resolve<S: WeatherSource + ?Sized>(
        &mut self,
        source: &mut S,
        start: usize,
        timeout: Duration,
    ) -> Option<(usize, WeatherRecord)> {
        let mut request = self.begin(start)?;
        loop {
            let answer = source.fetch(&request.location, timeout);
            match self.respond(answer) {
                Step::Found(index, record) => return Some((index, record)),
                Step::Fetch(next) => request = next,
                Step::Exhausted => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Answers from a per-location script; an exhausted script fails.
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
                Ok(WeatherRecord::new(10.0, 50.0, 5.0, 50.0))
            } else {
                Err(FetchError::Status {
                    location: location.to_string(),
                    status: 404,
                })
            }
        }
    }

    fn rotation(names: &[&str]) -> Rotation {
        Rotation::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn labels_drop_the_country() {
        assert_eq!(label("New York,US"), "New York");
        assert_eq!(label("Reykjavik"), "Reykjavik");
    }

    #[test]
    fn request_response_skips_failures() {
        let mut r = rotation(&["A", "B", "C"]);
        let first = r.begin(1).unwrap();
        assert_eq!(first.location, "B");
        let fail = Err(FetchError::MissingApiKey);
        match r.respond(fail) {
            Step::Fetch(next) => assert_eq!(next, FetchRequest { index: 2, location: "C".into() }),
            other => panic!("unexpected {:?}", other),
        }
        let record = WeatherRecord::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.respond(Ok(record)), Step::Found(2, record));
    }

    #[test]
    fn one_full_cycle_then_exhausted() {
        let mut source = Scripted::new(vec![]);
        let mut r = rotation(&["A", "B", "C"]);
        assert_eq!(r.resolve(&mut source, 1, Duration::from_secs(1)), None);
        assert_eq!(source.asked, vec!["B", "C", "A"]);
    }

    #[test]
    fn search_wraps_around() {
        let mut source = Scripted::new(vec![("A", vec![true])]);
        let mut r = rotation(&["A", "B", "C"]);
        let (index, _) = r.resolve(&mut source, 2, Duration::from_secs(1)).unwrap();
        assert_eq!(index, 0);
        assert_eq!(source.asked, vec!["C", "A"]);
    }

    #[test]
    fn empty_rotation_is_exhausted() {
        let mut source = Scripted::new(vec![]);
        let mut r = rotation(&[]);
        assert!(r.begin(0).is_none());
        assert_eq!(r.resolve(&mut source, 0, Duration::from_secs(1)), None);
        assert!(source.asked.is_empty());
    }

    #[test]
    fn respond_without_search() {
        let mut r = rotation(&["A"]);
        assert_eq!(r.respond(Err(FetchError::MissingApiKey)), Step::Exhausted);
    }
}
