// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failures that end the show.  Per-location fetch problems live in
//! `weather::FetchError`; they only ever cause a skip.

use failure::Fail;

/// Why a show could not start or had to stop.
#[derive(Debug, Fail)]
pub enum Error {
    /// A setting that can never produce a running show.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),
    /// The first two locations could not be found.
    #[fail(display = "could not start: {}", _0)]
    Bootstrap(String),
    /// The display sink could not be opened or written to.
    #[fail(display = "display failure: {}", _0)]
    Display(String),
}
