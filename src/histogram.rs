use std::str::FromStr;

use rayon::prelude::*;

use crate::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistogramMode {
    #[default]
    Gray,
    Rgb,
    Lab,
}

impl HistogramMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Gray => "Histogram (grayscale)",
            Self::Rgb => "Histogram (RGB)",
            Self::Lab => "Histogram (L*a*b*)",
        }
    }

    /// Title of the window showing the video itself.
    pub fn frame_title(self) -> &'static str {
        match self {
            Self::Gray => "Grayscale",
            Self::Rgb => "RGB",
            Self::Lab => "L*a*b*",
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Gray => &["intensity"],
            Self::Rgb => &["Red", "Green", "Blue"],
            Self::Lab => &["L*", "a*", "b*"],
        }
    }

    /// What is displayed next to the histogram.
    pub fn display_frame(self, frame: &Mat) -> Result<Mat> {
        match self {
            Self::Gray => {
                let mut gray = Mat::default();
                imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)?;
                Ok(gray)
            }
            Self::Rgb | Self::Lab => Ok(frame.try_clone()?),
        }
    }

    /// Planes to histogram, ordered like [`HistogramMode::labels`].
    fn planes(self, frame: &Mat) -> Result<Vec<Mat>> {
        match self {
            Self::Gray => Ok(vec![self.display_frame(frame)?]),
            Self::Rgb => {
                let mut bgr = Vector::<Mat>::new();
                split(frame, &mut bgr)?;
                Ok(vec![bgr.get(2)?, bgr.get(1)?, bgr.get(0)?])
            }
            Self::Lab => {
                let mut lab = Mat::default();
                imgproc::cvt_color_def(frame, &mut lab, imgproc::COLOR_BGR2Lab)?;
                let mut planes = Vector::<Mat>::new();
                split(&lab, &mut planes)?;
                Ok(planes.to_vec())
            }
        }
    }
}

impl FromStr for HistogramMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::Gray),
            "rgb" => Ok(Self::Rgb),
            "lab" => Ok(Self::Lab),
            other => Err(Error::InvalidArgument(format!(
                "unknown histogram mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelHistogram {
    pub label: &'static str,
    /// Fraction of the frame's pixels in each bin.
    pub bins: Vec<f32>,
}

/// Normalized histograms of a BGR frame, one per channel of `mode`.
pub fn compute(frame: &Mat, mode: HistogramMode, bins: i32) -> Result<Vec<ChannelHistogram>> {
    let bins = bins.max(1);
    let pixels = (frame.rows() * frame.cols()).max(1) as f32;
    let planes = mode.planes(frame)?;

    planes
        .into_par_iter()
        .zip(mode.labels().par_iter())
        .map(|(plane, &label)| {
            Ok(ChannelHistogram {
                label,
                bins: plane_histogram(plane, bins, pixels)?,
            })
        })
        .collect()
}

fn plane_histogram(plane: Mat, bins: i32, pixels: f32) -> Result<Vec<f32>> {
    let mut images = Vector::<Mat>::new();
    images.push(plane);
    let mut hist = Mat::default();
    imgproc::calc_hist(
        &images,
        &Vector::<i32>::from_slice(&[0]),
        &Mat::default(),
        &mut hist,
        &Vector::<i32>::from_slice(&[bins]),
        &Vector::<f32>::from_slice(&[0., 256.]),
        false,
    )?;
    Ok(hist
        .data_typed::<f32>()?
        .iter()
        .map(|count| count / pixels)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(b: f64, g: f64, r: f64) -> Mat {
        Mat::new_rows_cols_with_default(8, 8, CV_8UC3, Scalar::new(b, g, r, 0.)).unwrap()
    }

    #[test]
    fn gray_has_one_normalized_channel() {
        let hists = compute(&solid(10., 20., 30.), HistogramMode::Gray, 16).unwrap();
        assert_eq!(hists.len(), 1);
        assert_eq!(hists[0].label, "intensity");
        assert_eq!(hists[0].bins.len(), 16);
        let total: f32 = hists[0].bins.iter().sum();
        assert!((total - 1.).abs() < 1e-5);
    }

    #[test]
    fn rgb_reports_red_first() {
        let hists = compute(&solid(0., 0., 255.), HistogramMode::Rgb, 4).unwrap();
        let labels: Vec<_> = hists.iter().map(|h| h.label).collect();
        assert_eq!(labels, ["Red", "Green", "Blue"]);
        assert_eq!(hists[0].bins, vec![0., 0., 0., 1.]);
        assert_eq!(hists[1].bins, vec![1., 0., 0., 0.]);
        assert_eq!(hists[2].bins, vec![1., 0., 0., 0.]);
    }

    #[test]
    fn lab_has_three_channels() {
        let hists = compute(&solid(40., 80., 120.), HistogramMode::Lab, 8).unwrap();
        assert_eq!(hists.len(), 3);
        for hist in hists {
            let total: f32 = hist.bins.iter().sum();
            assert!((total - 1.).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_bins_is_clamped() {
        let hists = compute(&solid(0., 0., 0.), HistogramMode::Gray, 0).unwrap();
        assert_eq!(hists[0].bins, vec![1.]);
    }

    #[test]
    fn parses_modes() {
        assert_eq!("RGB".parse::<HistogramMode>().unwrap(), HistogramMode::Rgb);
        assert!("hsv".parse::<HistogramMode>().is_err());
    }
}
