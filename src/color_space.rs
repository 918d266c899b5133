use std::fmt::Display;
use std::str::FromStr;

use crate::*;

/// The closed set of color spaces a frame can be thresholded in.
///
/// Frames arrive in the capture-native BGR representation; every other
/// variant is reached with a single `cvt_color` from BGR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    #[default]
    Bgr,
    Gray,
    Hsv,
    Lab,
    Luv,
    YCrCb,
    Yuv,
}

/// Which way a click moves through [`ColorSpace::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 7] = [
        Self::Bgr,
        Self::Gray,
        Self::Hsv,
        Self::Lab,
        Self::Luv,
        Self::YCrCb,
        Self::Yuv,
    ];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bgr => "BGR",
            Self::Gray => "GRAY",
            Self::Hsv => "HSV",
            Self::Lab => "Lab",
            Self::Luv => "Luv",
            Self::YCrCb => "YCrCb",
            Self::Yuv => "YUV",
        }
    }

    /// `cvt_color` code from BGR, `None` when no conversion is needed.
    pub fn conversion_code(self) -> Option<i32> {
        match self {
            Self::Bgr => None,
            Self::Gray => Some(imgproc::COLOR_BGR2GRAY),
            Self::Hsv => Some(imgproc::COLOR_BGR2HSV),
            Self::Lab => Some(imgproc::COLOR_BGR2Lab),
            Self::Luv => Some(imgproc::COLOR_BGR2Luv),
            Self::YCrCb => Some(imgproc::COLOR_BGR2YCrCb),
            Self::Yuv => Some(imgproc::COLOR_BGR2YUV),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            _ => 3,
        }
    }

    pub fn cycled(self, direction: Direction) -> Self {
        let count = Self::COUNT as isize;
        // rem_euclid keeps Bgr + Backward at the last index instead of -1
        let next = (self.index() as isize + direction.step()).rem_euclid(count);
        Self::from_index(next as usize).unwrap_or_default()
    }

    /// Converts a BGR frame into this color space.
    pub fn convert(self, frame: &Mat) -> Result<Mat> {
        match self.conversion_code() {
            Some(code) => {
                let mut converted = Mat::default();
                imgproc::cvt_color_def(frame, &mut converted, code)?;
                Ok(converted)
            }
            None => Ok(frame.clone()),
        }
    }
}

impl Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bgr" => Ok(Self::Bgr),
            "gray" | "grey" => Ok(Self::Gray),
            "hsv" => Ok(Self::Hsv),
            "lab" => Ok(Self::Lab),
            "luv" => Ok(Self::Luv),
            "ycrcb" | "ycc" => Ok(Self::YCrCb),
            "yuv" => Ok(Self::Yuv),
            other => Err(Error::InvalidArgument(format!(
                "unknown color space '{}'",
                other
            ))),
        }
    }
}
