use clap::Parser;
use imgui::Key;

use colorthresh::capture::{CaptureWorker, Captured};
use colorthresh::cli::HistogramArgs;
use colorthresh::histogram::{self, ChannelHistogram, HistogramMode};
use colorthresh::image::Image;
use colorthresh::utils::{init_logging, resize_to_width};
use colorthresh::view::show;
use colorthresh::window::{self, AutoRenderer, Flow, Ui};
use colorthresh::{Error, Result};

const PLOT_SIZE: [f32; 2] = [400., 120.];

struct Histograms {
    capture: CaptureWorker,
    mode: HistogramMode,
    bins: i32,
    width: i32,
    frame: Image,
    channels: Vec<ChannelHistogram>,
}

impl Histograms {
    fn draw(&mut self, ui: &mut Ui, renderer: &mut AutoRenderer) -> Result<Flow> {
        if ui.is_key_pressed(Key::Q) {
            return Ok(Flow::Exit);
        }

        match self.capture.poll() {
            Captured::Frame(frame) => {
                let frame = resize_to_width(&frame, self.width)?;
                self.channels = histogram::compute(&frame, self.mode, self.bins)?;
                self.frame.set(&self.mode.display_frame(&frame)?)?;
            }
            Captured::Pending => {}
            Captured::Ended => return Ok(Flow::Exit),
        }

        show(ui, renderer, self.mode.frame_title(), &mut self.frame)?;

        let channels = &self.channels;
        ui.window(self.mode.title())
            .always_auto_resize(true)
            .build(|| {
                for channel in channels {
                    ui.plot_lines(channel.label, &channel.bins)
                        .scale_min(0.)
                        .scale_max(1.)
                        .graph_size(PLOT_SIZE)
                        .build();
                }
            });
        Ok(Flow::Continue)
    }
}

fn main() -> Result<()> {
    let args = HistogramArgs::parse();
    init_logging(args.quiet)?;

    let mode = args.color.parse().unwrap_or_else(|e: Error| {
        log::warn!("{}, using gray", e);
        HistogramMode::Gray
    });
    let source = args.source();
    log::info!("Opening {} ({})", source, mode.title());

    let capture = CaptureWorker::spawn(source).inspect_err(|e| log::error!("{}", e))?;
    let mut histograms = Histograms {
        capture,
        mode,
        bins: args.bins.max(1),
        width: args.width,
        frame: Image::default(),
        channels: Vec::new(),
    };

    window::create("live_histogram", |ui: &mut Ui, renderer: &mut AutoRenderer| {
        histograms.draw(ui, renderer)
    })
}
