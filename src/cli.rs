use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::session::Source;

/// colorthresh - threshold an image, video or camera feed by color channel
#[derive(Parser, Debug, Default, PartialEq)]
#[command(version, about, long_about = None)]
pub struct ThresholdArgs {
    /// Path to an image file
    #[arg(short, long)]
    pub image: Option<PathBuf>,
    /// Path to a video file
    #[arg(short, long)]
    pub video: Option<PathBuf>,
    /// Camera index
    #[arg(short, long)]
    pub cam: Option<i32>,
    /// Reduce log verbosity
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl ThresholdArgs {
    /// Parses `args`, substituting the camera-0 default for anything clap
    /// rejects. The rejection reason is returned for logging once the
    /// logger is up. `--help` and `--version` still print and exit.
    pub fn parse_lenient<I, T>(args: I) -> (Self, Option<String>)
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(args) => (args, None),
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
                kind => (
                    Self::default(),
                    Some(kind.as_str().unwrap_or("unrecognized arguments").to_string()),
                ),
            },
        }
    }

    /// Image wins over video, video over camera.
    pub fn source(&self) -> Source {
        if let Some(path) = &self.image {
            Source::Image(path.clone())
        } else if let Some(path) = &self.video {
            Source::Video(path.clone())
        } else {
            Source::Camera(self.cam.unwrap_or(0))
        }
    }
}

/// pixel_picker - snapshot a video and inspect pixel colors
#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct PickerArgs {
    /// Camera index
    #[arg(short, long, default_value_t = 0)]
    pub cam: i32,
    /// Path to a video file (overrides the camera)
    #[arg(short, long)]
    pub video: Option<PathBuf>,
    /// Reduce log verbosity
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl PickerArgs {
    pub fn source(&self) -> Source {
        match &self.video {
            Some(path) => Source::Video(path.clone()),
            None => Source::Camera(self.cam),
        }
    }
}

/// kmeans_segment - k-means color segmentation of an image
#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct SegmentArgs {
    /// Path to an image file
    #[arg(short, long)]
    pub image: PathBuf,
    /// Width to resize the image to in pixels (0 keeps the original size)
    #[arg(short, long, default_value_t = 0)]
    pub width: i32,
    /// Color space: bgr, gray, hsv, lab, luv, ycrcb (ycc) or yuv
    #[arg(short = 's', long, default_value = "bgr")]
    pub color_space: String,
    /// Channel indices to cluster on, e.g. "02", or "all"
    #[arg(short, long, default_value = "all")]
    pub channels: String,
    /// Number of clusters (min 2)
    #[arg(short, long, default_value_t = 3)]
    pub num_clusters: i32,
    /// Save the side-by-side result to disk
    #[arg(short, long, default_value_t = false)]
    pub output_file: bool,
    /// File extension of the saved image
    #[arg(short = 'f', long, default_value = "png")]
    pub output_format: String,
    /// Reduce log verbosity
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// live_histogram - live per-channel histograms of a video stream
#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct HistogramArgs {
    /// Path to a video file (camera 0 otherwise)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Histogram mode: gray, rgb or lab
    #[arg(short, long, default_value = "gray")]
    pub color: String,
    /// Number of bins per channel
    #[arg(short, long, default_value_t = 16)]
    pub bins: i32,
    /// Resize frames to this width in pixels (0 keeps the original size)
    #[arg(short, long, default_value_t = 0)]
    pub width: i32,
    /// Reduce log verbosity
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl HistogramArgs {
    pub fn source(&self) -> Source {
        match &self.file {
            Some(path) => Source::Video(path.clone()),
            None => Source::Camera(0),
        }
    }
}
