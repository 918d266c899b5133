use colors_transform::{Color, Rgb};

use crate::*;

pub const SWATCH_ROWS: i32 = 80;
pub const SWATCH_COLS: i32 = 250;

/// A pixel picked out of a BGR snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PickedColor {
    pub fn from_bgr(pixel: Vec3b) -> Self {
        Self {
            b: pixel[0],
            g: pixel[1],
            r: pixel[2],
        }
    }

    /// 0 for white, 1 for black.
    pub fn darkness(&self) -> f32 {
        1. - (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.
    }

    pub fn text_color(&self) -> Scalar {
        if self.darkness() < 0.5 {
            Scalar::all(0.)
        } else {
            Scalar::all(255.)
        }
    }

    pub fn label(&self) -> String {
        format!("[{}, {}, {}]", self.r, self.g, self.b)
    }

    /// Hex code and HSL, for the log.
    pub fn describe(&self) -> String {
        let rgb = Rgb::from(self.r as f32, self.g as f32, self.b as f32);
        format!(
            "{} {} hsl({:.0}, {:.0}%, {:.0}%)",
            self.label(),
            rgb.to_css_hex_string(),
            rgb.get_hue(),
            rgb.get_saturation(),
            rgb.get_lightness()
        )
    }

    pub fn swatch(&self) -> Result<Mat> {
        let fill = Scalar::new(self.b as f64, self.g as f64, self.r as f64, 0.);
        let mut swatch = Mat::new_rows_cols_with_default(SWATCH_ROWS, SWATCH_COLS, CV_8UC3, fill)?;
        imgproc::put_text_def(
            &mut swatch,
            &self.label(),
            Point::new(20, SWATCH_ROWS - 20),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            self.text_color(),
        )?;
        Ok(swatch)
    }
}

pub fn blank_swatch() -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(
        SWATCH_ROWS,
        SWATCH_COLS,
        CV_8UC3,
        Scalar::all(0.),
    )?)
}

/// Color at column `x`, row `y`, or `None` when outside the snapshot.
pub fn pick(snapshot: &Mat, x: i32, y: i32) -> Result<Option<PickedColor>> {
    if x < 0 || y < 0 || x >= snapshot.cols() || y >= snapshot.rows() {
        return Ok(None);
    }
    let pixel = *snapshot.at_2d::<Vec3b>(y, x)?;
    Ok(Some(PickedColor::from_bgr(pixel)))
}
