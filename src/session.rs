use std::fmt::Display;
use std::path::PathBuf;

use crate::config::{PIXEL_MAX, PIXEL_MIN, SWATCH_GRAY};
use crate::*;

pub const CHANNELS: usize = 3;

const SWATCH_ROWS: i32 = 50;
const SWATCH_COLS: i32 = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Image,
    Video,
    Camera,
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Image(PathBuf),
    Video(PathBuf),
    Camera(i32),
}

impl Source {
    pub fn mode(&self) -> InputMode {
        match self {
            Self::Image(_) => InputMode::Image,
            Self::Video(_) => InputMode::Video,
            Self::Camera(_) => InputMode::Camera,
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::Camera(0)
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(path) => write!(f, "image {}", path.display()),
            Self::Video(path) => write!(f, "video {}", path.display()),
            Self::Camera(index) => write!(f, "camera {}", index),
        }
    }
}

/// Output of one thresholding pass.
pub struct Thresholded {
    /// The input after color-space conversion, before thresholding.
    pub converted: Mat,
    /// `CV_8UC1`, 255 where every used channel is in range.
    pub mask: Mat,
}

/// Threshold parameters and color-space selection for one interactive run.
#[derive(Clone, Debug)]
pub struct ThresholdSession {
    low: [u8; CHANNELS],
    high: [u8; CHANNELS],
    color_space: ColorSpace,
    source: Source,
    revision: u64,
}

impl ThresholdSession {
    pub fn new(source: Source) -> Self {
        Self {
            low: [PIXEL_MIN; CHANNELS],
            high: [PIXEL_MAX; CHANNELS],
            color_space: ColorSpace::default(),
            source,
            revision: 0,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn mode(&self) -> InputMode {
        self.source.mode()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Bumped on every parameter change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bounds(&self, channel: usize) -> Result<(u8, u8)> {
        if channel >= CHANNELS {
            return Err(Error::InvalidChannel(channel));
        }
        Ok((self.low[channel], self.high[channel]))
    }

    /// `low > high` is accepted and yields an empty mask for that channel.
    pub fn set_bounds(&mut self, channel: usize, low: u8, high: u8) -> Result<()> {
        if channel >= CHANNELS {
            return Err(Error::InvalidChannel(channel));
        }
        if (self.low[channel], self.high[channel]) != (low, high) {
            self.low[channel] = low;
            self.high[channel] = high;
            self.touch();
        }
        Ok(())
    }

    pub fn cycle_color_space(&mut self, direction: Direction) -> ColorSpace {
        self.color_space = self.color_space.cycled(direction);
        self.touch();
        log::debug!("Color space now {}", self.color_space);
        self.color_space
    }

    /// `[ch0 low, ch0 high, ch1 low, ch1 high, ch2 low, ch2 high]`
    pub fn values(&self) -> [u8; 2 * CHANNELS] {
        let mut values = [0; 2 * CHANNELS];
        for channel in 0..CHANNELS {
            values[2 * channel] = self.low[channel];
            values[2 * channel + 1] = self.high[channel];
        }
        values
    }

    pub fn compute_threshold(&self, frame: &Mat) -> Result<Thresholded> {
        let converted = self.color_space.convert(frame)?;

        let mask = if self.color_space.channels() == 1 {
            // grayscale only looks at channel 0
            channel_mask(&converted, self.low[0], self.high[0])?
        } else {
            let mut planes = Vector::<Mat>::new();
            split(&converted, &mut planes)?;

            let mut mask = channel_mask(&planes.get(0)?, self.low[0], self.high[0])?;
            for channel in 1..CHANNELS {
                let plane = planes.get(channel)?;
                let in_range = channel_mask(&plane, self.low[channel], self.high[channel])?;
                let mut combined = Mat::default();
                bitwise_and_def(&mask, &in_range, &mut combined)?;
                mask = combined;
            }
            mask
        };

        Ok(Thresholded { converted, mask })
    }

    /// Gray button carrying the active color-space name.
    pub fn swatch(&self) -> Result<Mat> {
        let mut swatch = Mat::new_rows_cols_with_default(
            SWATCH_ROWS,
            SWATCH_COLS,
            CV_8UC3,
            Scalar::all(SWATCH_GRAY),
        )?;
        imgproc::put_text(
            &mut swatch,
            self.color_space.name(),
            Point::new(170, 40),
            imgproc::FONT_HERSHEY_SIMPLEX,
            1.0,
            Scalar::all(0.),
            4,
            imgproc::LINE_8,
            false,
        )?;
        Ok(swatch)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn channel_mask(plane: &Mat, low: u8, high: u8) -> Result<Mat> {
    let mut mask = Mat::default();
    in_range(
        plane,
        &Scalar::all(low as f64),
        &Scalar::all(high as f64),
        &mut mask,
    )?;
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pixels: &[[u8; 3]]) -> Mat {
        let data: Vec<Vec3b> = pixels.iter().map(|p| Vec3b::from(*p)).collect();
        Mat::from_slice(&data).unwrap().try_clone().unwrap()
    }

    fn mask_values(mask: &Mat) -> Vec<u8> {
        mask.data_typed::<u8>().unwrap().to_vec()
    }

    #[test]
    fn starts_fully_open_in_bgr() {
        let session = ThresholdSession::new(Source::default());
        assert_eq!(session.values(), [0, 255, 0, 255, 0, 255]);
        assert_eq!(session.color_space(), ColorSpace::Bgr);
        assert_eq!(session.mode(), InputMode::Camera);
    }

    #[test]
    fn keeps_the_source_it_was_opened_with() {
        let source = Source::Video(PathBuf::from("clips/cars.avi"));
        let session = ThresholdSession::new(source.clone());
        assert_eq!(session.source(), &source);
        assert_eq!(session.mode(), InputMode::Video);
        assert_eq!(session.source().to_string(), "video clips/cars.avi");
    }

    #[test]
    fn gray_mask_has_frame_shape() {
        let mut session = ThresholdSession::new(Source::default());
        session.cycle_color_space(Direction::Forward);
        session.set_bounds(0, 0, 0).unwrap();
        session.set_bounds(1, 255, 255).unwrap();
        let input = frame(&[[0, 0, 0], [255, 255, 255]]);
        let out = session.compute_threshold(&input).unwrap();
        assert_eq!(out.converted.channels() as usize, ColorSpace::Gray.channels());
        assert_eq!(mask_values(&out.mask), vec![255, 0]);
    }

    #[test]
    fn rejects_fourth_channel() {
        let mut session = ThresholdSession::new(Source::default());
        assert!(matches!(
            session.set_bounds(3, 0, 10),
            Err(Error::InvalidChannel(3))
        ));
        assert!(session.bounds(3).is_err());
    }

    #[test]
    fn values_are_interleaved_per_channel() {
        let mut session = ThresholdSession::new(Source::default());
        session.set_bounds(0, 1, 2).unwrap();
        session.set_bounds(1, 3, 4).unwrap();
        session.set_bounds(2, 5, 6).unwrap();
        assert_eq!(session.values(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn revision_tracks_real_changes_only() {
        let mut session = ThresholdSession::new(Source::default());
        let start = session.revision();
        session.set_bounds(0, 0, 255).unwrap();
        assert_eq!(session.revision(), start);
        session.set_bounds(0, 10, 255).unwrap();
        assert_ne!(session.revision(), start);
        let after_bounds = session.revision();
        session.cycle_color_space(Direction::Forward);
        assert_ne!(session.revision(), after_bounds);
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut session = ThresholdSession::new(Source::default());
        session.set_bounds(0, 10, 20).unwrap();
        let input = frame(&[[9, 0, 0], [10, 0, 0], [15, 0, 0], [20, 0, 0], [21, 0, 0]]);
        let out = session.compute_threshold(&input).unwrap();
        assert_eq!(mask_values(&out.mask), vec![0, 255, 255, 255, 0]);
    }

    #[test]
    fn inverted_bounds_give_empty_mask() {
        let mut session = ThresholdSession::new(Source::default());
        session.set_bounds(1, 200, 100).unwrap();
        let input = frame(&[[0, 100, 0], [0, 150, 0], [0, 200, 0]]);
        let out = session.compute_threshold(&input).unwrap();
        assert!(mask_values(&out.mask).iter().all(|&v| v == 0));
    }

    #[test]
    fn channels_are_and_combined() {
        let mut session = ThresholdSession::new(Source::default());
        session.set_bounds(0, 100, 255).unwrap();
        session.set_bounds(2, 0, 50).unwrap();
        let input = frame(&[[150, 0, 10], [150, 0, 90], [50, 0, 10]]);
        let out = session.compute_threshold(&input).unwrap();
        assert_eq!(mask_values(&out.mask), vec![255, 0, 0]);
    }

    #[test]
    fn bgr_returns_unconverted_frame() {
        let session = ThresholdSession::new(Source::default());
        let input = frame(&[[1, 2, 3]]);
        let out = session.compute_threshold(&input).unwrap();
        assert_eq!(out.converted.channels(), 3);
        assert_eq!(*out.converted.at_2d::<Vec3b>(0, 0).unwrap(), Vec3b::from([1, 2, 3]));
    }

    #[test]
    fn swatch_is_button_sized() {
        let session = ThresholdSession::new(Source::default());
        let swatch = session.swatch().unwrap();
        assert_eq!(swatch.rows(), 50);
        assert_eq!(swatch.cols(), 400);
        assert_eq!(swatch.channels(), 3);
        assert_eq!(*swatch.at_2d::<Vec3b>(0, 0).unwrap(), Vec3b::from([127, 127, 127]));
    }
}
