use clap::Parser;
use imgui::Key;

use colorthresh::capture::{CaptureWorker, Captured};
use colorthresh::cli::PickerArgs;
use colorthresh::image::Image;
use colorthresh::picker::{self, PickedColor};
use colorthresh::utils::init_logging;
use colorthresh::view::show;
use colorthresh::window::{self, AutoRenderer, Flow, Ui};
use colorthresh::*;

struct Picker {
    capture: CaptureWorker,
    frame: Mat,
    snapshot: Mat,
    video: Image,
    snapshot_image: Image,
    color: Image,
}

impl Picker {
    fn draw(&mut self, ui: &mut Ui, renderer: &mut AutoRenderer) -> Result<Flow> {
        if ui.is_key_pressed(Key::Q) {
            return Ok(Flow::Exit);
        }

        match self.capture.poll() {
            Captured::Frame(frame) => {
                if self.snapshot.empty() {
                    self.snapshot = Mat::new_rows_cols_with_default(
                        frame.rows(),
                        frame.cols(),
                        CV_8UC3,
                        Scalar::all(0.),
                    )?;
                    self.snapshot_image.set(&self.snapshot)?;
                }
                self.video.set(&frame)?;
                self.frame = frame;
            }
            Captured::Pending => {}
            Captured::Ended => return Ok(Flow::Exit),
        }

        if ui.is_key_pressed(Key::T) && !self.frame.empty() {
            self.snapshot = self.frame.try_clone()?;
            self.snapshot_image.set(&self.snapshot)?;
            log::debug!("Snapshot taken");
        }

        show(ui, renderer, "Video", &mut self.video)?;
        self.snapshot_window(ui, renderer)?;
        show(ui, renderer, "Color", &mut self.color)?;
        Ok(Flow::Continue)
    }

    fn snapshot_window(&mut self, ui: &Ui, renderer: &mut AutoRenderer) -> Result<()> {
        if self.snapshot_image.is_empty() {
            return Ok(());
        }
        let snapshot_image = &mut self.snapshot_image;
        let clicked = ui
            .window("Snapshot")
            .always_auto_resize(true)
            .build(|| -> Result<Option<[f32; 2]>> {
                snapshot_image.make(renderer)?.build(ui);
                if !ui.is_item_clicked() {
                    return Ok(None);
                }
                let mouse = ui.io().mouse_pos;
                let origin = ui.item_rect_min();
                Ok(Some([mouse[0] - origin[0], mouse[1] - origin[1]]))
            })
            .unwrap_or(Ok(None))?;

        if let Some([x, y]) = clicked {
            if let Some(color) = picker::pick(&self.snapshot, x as i32, y as i32)? {
                self.select(color)?;
            }
        }
        Ok(())
    }

    fn select(&mut self, color: PickedColor) -> Result<()> {
        log::info!("Picked {}", color.describe());
        self.color.set(&color.swatch()?)
    }
}

fn main() -> Result<()> {
    let args = PickerArgs::parse();
    init_logging(args.quiet)?;

    let source = args.source();
    log::info!("Opening {}", source);
    let capture = CaptureWorker::spawn(source).inspect_err(|e| log::error!("{}", e))?;

    let mut color = Image::default();
    color.set(&picker::blank_swatch()?)?;
    let mut picker = Picker {
        capture,
        frame: Mat::default(),
        snapshot: Mat::default(),
        video: Image::default(),
        snapshot_image: Image::default(),
        color,
    };

    window::create("pixel_picker", |ui: &mut Ui, renderer: &mut AutoRenderer| {
        picker.draw(ui, renderer)
    })
}
