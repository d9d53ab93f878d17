// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.
//!
//! A sink is opened before the render loop starts, receives one image
//! and one caption per frame, is polled for a quit request between
//! frames, and is closed after the loop ends.

use crate::error::Error;
use crate::overlay::Overlay;
use image::RgbImage;
use log::{debug, info};

/// Anything that can show frames and report a quit request.
pub trait DisplaySink {
    /// Show one finished frame.
    fn present(&mut self, frame: &RgbImage, overlay: &Overlay) -> Result<(), Error>;

    /// Non-blocking: has the viewer asked to stop?
    fn quit_requested(&mut self) -> bool;

    /// Teardown.  Called once, after the last frame.
    fn close(&mut self) {}
}

/// Renders into the void, logging captions.  Stops asking for frames
/// after `frame_limit` of them, if one is set.
#[derive(Debug, Default)]
pub struct Headless {
    frame_limit: Option<u64>,
    presented: u64,
    headline: String,
}

impl Headless {
    /// A sink that quits after `frame_limit` frames, or never.
    pub fn new(frame_limit: Option<u64>) -> Self {
        Headless {
            frame_limit,
            presented: 0,
            headline: String::new(),
        }
    }

    /// Frames shown so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplaySink for Headless {
    fn present(&mut self, frame: &RgbImage, overlay: &Overlay) -> Result<(), Error> {
        self.presented += 1;
        if overlay.headline != self.headline {
            info!("{}", overlay.headline);
            self.headline = overlay.headline.clone();
        }
        debug!(
            "frame {} ({}x{}): {}",
            self.presented,
            frame.width(),
            frame.height(),
            overlay.lines.join(", ")
        );
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        match self.frame_limit {
            Some(limit) => self.presented >= limit,
            None => false,
        }
    }

    fn close(&mut self) {
        info!("headless display closed after {} frames", self.presented);
    }
}

#[cfg(feature = "window")]
pub use self::window::WindowDisplay;

#[cfg(feature = "window")]
mod window {
    use super::DisplaySink;
    use crate::error::Error;
    use crate::overlay::Overlay;
    use image::RgbImage;
    use minifb::{Key, Window, WindowOptions};

    /// A native window.  The caption goes in the title bar; Escape or
    /// closing the window quits.
    pub struct WindowDisplay {
        window: Window,
        framebuf: Vec<u32>,
        title: String,
    }

    impl WindowDisplay {
        /// Open a window of the given size.
        pub fn open(width: usize, height: usize) -> Result<Self, Error> {
            let window = Window::new("weatherbrot", width, height, WindowOptions::default())
                .map_err(|e| Error::Display(e.to_string()))?;
            Ok(WindowDisplay {
                window,
                framebuf: vec![0u32; width * height],
                title: String::new(),
            })
        }
    }

    /// Pack RGB bytes into the 0RGB words minifb wants.
    fn rgb_to_0rgb(rgb: &[u8], out: &mut [u32]) {
        for (i, pixel) in rgb.chunks_exact(3).enumerate() {
            out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
        }
    }

    impl DisplaySink for WindowDisplay {
        fn present(&mut self, frame: &RgbImage, overlay: &Overlay) -> Result<(), Error> {
            let (w, h) = (frame.width() as usize, frame.height() as usize);
            self.framebuf.resize(w * h, 0);
            rgb_to_0rgb(frame.as_raw(), &mut self.framebuf);

            let title = overlay.to_string();
            if title != self.title {
                self.window.set_title(&title);
                self.title = title;
            }
            self.window
                .update_with_buffer(&self.framebuf, w, h)
                .map_err(|e| Error::Display(e.to_string()))
        }

        fn quit_requested(&mut self) -> bool {
            !self.window.is_open() || self.window.is_key_down(Key::Escape)
        }
    }

}
