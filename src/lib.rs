pub mod app;
pub mod capture;
pub mod cli;
pub mod color_space;
pub mod config;
pub mod error;
pub mod histogram;
pub mod image;
pub mod picker;
pub mod segment;
pub mod session;
pub mod utils;
pub mod view;
pub mod window;

pub use color_space::{ColorSpace, Direction};
pub use error::{Error, Result};
pub use session::{InputMode, Source, ThresholdSession, Thresholded};

pub use std::{fs, path};
pub use std::{sync::mpsc, thread};

pub use opencv::{core::*, prelude::*};
pub use opencv::{imgcodecs, imgproc, videoio};

pub trait SizeToArray {
    fn to_array(self) -> [f32; 2];
}

impl SizeToArray for Size {
    fn to_array(self) -> [f32; 2] {
        [self.width as _, self.height as _]
    }
}
