//! K-means color segmentation.
//!
//! The clustering itself is `core::kmeans`; this module picks the feature
//! channels, ranks the resulting clusters by size and paints them as gray
//! levels, most common cluster darkest.

use std::fmt::Display;
use std::str::FromStr;

use crate::*;

const ATTEMPTS: i32 = 40;
const MAX_ITERATIONS: i32 = 500;
const EPSILON: f64 = 1e-4;
const STRIP_GRAY: f64 = 193.;
const STRIP_RATIO: f64 = 0.0625;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelSelection {
    All,
    Indices(Vec<usize>),
}

impl FromStr for ChannelSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let indices = s
            .chars()
            .map(|c| {
                c.to_digit(10).map(|d| d as usize).ok_or_else(|| {
                    Error::InvalidArgument(format!("channel '{}' is not a digit", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if indices.is_empty() {
            return Err(Error::InvalidArgument("no channels selected".to_string()));
        }
        Ok(Self::Indices(indices))
    }
}

impl Display for ChannelSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Indices(indices) => {
                for index in indices {
                    write!(f, "{}", index)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SegmentOptions {
    pub color_space: ColorSpace,
    pub channels: ChannelSelection,
    pub clusters: i32,
}

impl SegmentOptions {
    /// File name used when the result is saved.
    pub fn output_name(&self, extension: &str) -> String {
        format!(
            "{}_c{}n{}.{}",
            self.color_space.name().to_ascii_lowercase(),
            self.channels,
            self.clusters,
            extension
        )
    }
}

/// Anything below two clusters is bumped to two.
pub fn cluster_count(requested: i32) -> i32 {
    if requested < 2 {
        log::warn!("{} clusters is invalid, using 2", requested);
    }
    requested.max(2)
}

pub fn select_channels(image: &Mat, selection: &ChannelSelection) -> Result<Mat> {
    let indices = match selection {
        ChannelSelection::All => return Ok(image.try_clone()?),
        ChannelSelection::Indices(indices) => indices,
    };
    let available = image.channels() as usize;
    if let Some(bad) = indices.iter().find(|&&i| i >= available) {
        return Err(Error::InvalidArgument(format!(
            "channel {} out of range for a {}-channel image",
            bad, available
        )));
    }

    let mut planes = Vector::<Mat>::new();
    split(image, &mut planes)?;
    let mut selected = Vector::<Mat>::new();
    for &index in indices {
        selected.push(planes.get(index)?);
    }
    let mut merged = Mat::default();
    merge(&selected, &mut merged)?;
    Ok(merged)
}

/// One label per pixel, in row-major order.
pub fn cluster_labels(features: &Mat, clusters: i32) -> Result<Vec<i32>> {
    let samples = features.rows() * features.cols();
    let flat = features.reshape(1, samples)?.try_clone()?;
    let mut data = Mat::default();
    flat.convert_to_def(&mut data, CV_32F)?;

    let criteria = TermCriteria::new(
        TermCriteria_COUNT + TermCriteria_EPS,
        MAX_ITERATIONS,
        EPSILON,
    )?;
    let mut labels = Mat::default();
    let mut centers = Mat::default();
    kmeans(
        &data,
        clusters,
        &mut labels,
        criteria,
        ATTEMPTS,
        KMEANS_PP_CENTERS,
        &mut centers,
    )?;
    Ok(labels.data_typed::<i32>()?.to_vec())
}

/// `rank[label]`: 0 for the most frequent label. Ties keep label order.
pub fn rank_labels(labels: &[i32], clusters: i32) -> Vec<usize> {
    let clusters = clusters.max(0) as usize;
    let mut counts = vec![0usize; clusters];
    for &label in labels {
        if let Some(count) = counts.get_mut(label as usize) {
            *count += 1;
        }
    }
    let mut order: Vec<usize> = (0..clusters).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    let mut rank = vec![0; clusters];
    for (position, &label) in order.iter().enumerate() {
        rank[label] = position;
    }
    rank
}

pub fn gray_level(rank: usize, clusters: i32) -> u8 {
    let step = 255 / (clusters.max(2) - 1) as usize;
    (step * rank).min(255) as u8
}

/// Gray single-channel image of the same size as `image`.
pub fn segment(image: &Mat, options: &SegmentOptions) -> Result<Mat> {
    let converted = options.color_space.convert(image)?;
    let features = select_channels(&converted, &options.channels)?;
    let labels = cluster_labels(&features, options.clusters)?;
    let rank = rank_labels(&labels, options.clusters);

    let levels: Vec<u8> = labels
        .iter()
        .map(|&label| gray_level(rank[label as usize], options.clusters))
        .collect();
    Ok(Mat::from_slice(&levels)?.reshape(1, image.rows())?.try_clone()?)
}

/// `original | gray strip | clustered`, all as BGR.
pub fn side_by_side(original: &Mat, clustered: &Mat) -> Result<Mat> {
    let mut clustered_bgr = Mat::default();
    imgproc::cvt_color_def(clustered, &mut clustered_bgr, imgproc::COLOR_GRAY2BGR)?;

    let mut parts = Vector::<Mat>::new();
    parts.push(original.try_clone()?);
    let strip_cols = (STRIP_RATIO * original.cols() as f64) as i32;
    if strip_cols > 0 {
        parts.push(Mat::new_rows_cols_with_default(
            original.rows(),
            strip_cols,
            CV_8UC3,
            Scalar::all(STRIP_GRAY),
        )?);
    }
    parts.push(clustered_bgr);

    let mut joined = Mat::default();
    hconcat(&parts, &mut joined)?;
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(rows: i32, pixels: &[[u8; 3]]) -> Mat {
        let data: Vec<Vec3b> = pixels.iter().map(|p| Vec3b::from(*p)).collect();
        Mat::from_slice(&data)
            .unwrap()
            .reshape(3, rows)
            .unwrap()
            .try_clone()
            .unwrap()
    }

    #[test]
    fn parses_channel_selection() {
        assert_eq!("all".parse::<ChannelSelection>().unwrap(), ChannelSelection::All);
        assert_eq!(
            "02".parse::<ChannelSelection>().unwrap(),
            ChannelSelection::Indices(vec![0, 2])
        );
        assert!("0x".parse::<ChannelSelection>().is_err());
        assert!("".parse::<ChannelSelection>().is_err());
        assert_eq!(ChannelSelection::Indices(vec![1, 2]).to_string(), "12");
    }

    #[test]
    fn too_few_clusters_becomes_two() {
        assert_eq!(cluster_count(1), 2);
        assert_eq!(cluster_count(-3), 2);
        assert_eq!(cluster_count(5), 5);
    }

    #[test]
    fn gray_levels_spread_over_range() {
        assert_eq!(gray_level(0, 3), 0);
        assert_eq!(gray_level(1, 3), 127);
        assert_eq!(gray_level(2, 3), 254);
        assert_eq!(gray_level(1, 2), 255);
    }

    #[test]
    fn ranks_follow_frequency() {
        let labels = [2, 2, 2, 0, 1, 1];
        assert_eq!(rank_labels(&labels, 3), vec![2, 1, 0]);
    }

    #[test]
    fn selecting_out_of_range_channel_fails() {
        let img = image(1, &[[1, 2, 3]]);
        let selection = ChannelSelection::Indices(vec![3]);
        assert!(matches!(
            select_channels(&img, &selection),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn selected_channels_are_kept_in_order() {
        let img = image(1, &[[1, 2, 3]]);
        let picked = select_channels(&img, &ChannelSelection::Indices(vec![2, 0])).unwrap();
        assert_eq!(picked.channels(), 2);
        assert_eq!(picked.data_bytes().unwrap(), &[3, 1]);
    }

    #[test]
    fn majority_cluster_is_black() {
        let img = image(
            2,
            &[[0, 0, 0], [0, 0, 0], [0, 0, 0], [250, 250, 250], [5, 5, 5], [255, 255, 255]],
        );
        let options = SegmentOptions {
            color_space: ColorSpace::Bgr,
            channels: ChannelSelection::All,
            clusters: 2,
        };
        let clustered = segment(&img, &options).unwrap();
        assert_eq!((clustered.rows(), clustered.cols()), (2, 3));
        assert_eq!(clustered.data_bytes().unwrap(), &[0, 0, 0, 255, 0, 255]);
    }

    #[test]
    fn side_by_side_adds_strip() {
        let original = Mat::new_rows_cols_with_default(10, 32, CV_8UC3, Scalar::all(0.)).unwrap();
        let clustered =
            Mat::new_rows_cols_with_default(10, 32, CV_8UC1, Scalar::all(0.)).unwrap();
        let joined = side_by_side(&original, &clustered).unwrap();
        assert_eq!(joined.cols(), 32 + 2 + 32);
        assert_eq!(*joined.at_2d::<Vec3b>(0, 33).unwrap(), Vec3b::from([193, 193, 193]));
    }

    #[test]
    fn output_name_encodes_options() {
        let options = SegmentOptions {
            color_space: ColorSpace::Hsv,
            channels: ChannelSelection::Indices(vec![0, 2]),
            clusters: 4,
        };
        assert_eq!(options.output_name("png"), "hsv_c02n4.png");
    }
}
