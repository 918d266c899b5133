use clap::Parser;
use imgui::Key;

use colorthresh::capture::FrameSource;
use colorthresh::cli::SegmentArgs;
use colorthresh::image::Image;
use colorthresh::segment::{self, ChannelSelection, SegmentOptions};
use colorthresh::utils::{get_save_filepath, init_logging, resize_to_width};
use colorthresh::view::show;
use colorthresh::window::{self, AutoRenderer, Flow, Ui};
use colorthresh::*;

const WINDOW: &str = "Original vs clustered";

fn options(args: &SegmentArgs) -> Result<SegmentOptions> {
    let color_space = args.color_space.parse().unwrap_or_else(|e: Error| {
        log::warn!("{}, using BGR", e);
        ColorSpace::Bgr
    });
    let channels: ChannelSelection = args.channels.parse()?;
    Ok(SegmentOptions {
        color_space,
        channels,
        clusters: segment::cluster_count(args.num_clusters),
    })
}

fn run(args: SegmentArgs) -> Result<()> {
    let options = options(&args)?;

    let mut frames = FrameSource::open(&Source::Image(args.image.clone()))?;
    let image = frames
        .next_frame()?
        .ok_or_else(|| Error::SourceOpen(args.image.display().to_string()))?;
    let image = resize_to_width(&image, args.width)?;

    log::info!(
        "Clustering {} channels {} into {} clusters",
        options.color_space,
        options.channels,
        options.clusters
    );
    let clustered = segment::segment(&image, &options)?;
    let joined = segment::side_by_side(&image, &clustered)?;

    if args.output_file {
        let path = get_save_filepath(&options.output_name(&args.output_format))?;
        imgcodecs::imwrite_def(&path.to_string_lossy(), &joined)?;
        log::info!("Saved {}", path.display());
    }

    let mut result = Image::default();
    result.set(&joined)?;
    window::create("kmeans_segment", |ui: &mut Ui, renderer: &mut AutoRenderer| {
        if ui.is_key_pressed(Key::Q) {
            return Ok(Flow::Exit);
        }
        show(ui, renderer, WINDOW, &mut result)?;
        Ok(Flow::Continue)
    })
}

fn main() -> Result<()> {
    let args = SegmentArgs::parse();
    init_logging(args.quiet)?;

    run(args).inspect_err(|e| log::error!("{}", e))
}
