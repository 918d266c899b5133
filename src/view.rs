use imgui::{Key, MouseButton, Ui};
use imgui_glow_renderer::AutoRenderer;

use crate::app::Flow;
use crate::capture::FrameSource;
use crate::config::{WindowNames, PIXEL_MAX, PIXEL_MIN};
use crate::image::Image;
use crate::session::CHANNELS;
use crate::*;

/// Drives a [`ThresholdSession`] from the imgui frame loop.
pub struct ThresholdView {
    session: ThresholdSession,
    frames: FrameSource,
    names: WindowNames,

    original: Image,
    thresholded: Image,
    swatch: Image,

    swatch_space: Option<ColorSpace>,
    rendered_revision: Option<u64>,
}

impl ThresholdView {
    pub fn new(session: ThresholdSession, frames: FrameSource, names: WindowNames) -> Self {
        Self {
            session,
            frames,
            names,
            original: Image::default(),
            thresholded: Image::default(),
            swatch: Image::default(),
            swatch_space: None,
            rendered_revision: None,
        }
    }

    pub fn session(&self) -> &ThresholdSession {
        &self.session
    }

    pub fn draw(&mut self, ui: &mut Ui, renderer: &mut AutoRenderer) -> Result<Flow> {
        if ui.is_key_pressed(Key::Q) {
            log::info!("Quit requested");
            return Ok(Flow::Exit);
        }

        self.controls(ui, renderer)?;

        if self.frames.is_still() {
            // a still image is only reprocessed when a parameter changes
            if self.rendered_revision != Some(self.session.revision()) {
                if let Some(frame) = self.frames.next_frame()? {
                    self.process(&frame)?;
                }
            }
        } else {
            match self.frames.next_frame()? {
                Some(frame) => self.process(&frame)?,
                None => {
                    log::info!("End of stream");
                    return Ok(Flow::Exit);
                }
            }
        }

        show(ui, renderer, &self.names.original, &mut self.original)?;
        show(ui, renderer, &self.names.thresholded, &mut self.thresholded)?;
        Ok(Flow::Continue)
    }

    fn process(&mut self, frame: &Mat) -> Result<()> {
        let out = self.session.compute_threshold(frame)?;
        self.original.set(&out.converted)?;
        self.thresholded.set(&out.mask)?;
        self.rendered_revision = Some(self.session.revision());
        Ok(())
    }

    fn controls(&mut self, ui: &Ui, renderer: &mut AutoRenderer) -> Result<()> {
        if self.swatch_space != Some(self.session.color_space()) {
            self.swatch.set(&self.session.swatch()?)?;
            self.swatch_space = Some(self.session.color_space());
        }

        let session = &mut self.session;
        let swatch = &mut self.swatch;
        ui.window(&self.names.controls)
            .always_auto_resize(true)
            .build(|| -> Result<()> {
                for channel in 0..CHANNELS {
                    let (mut low, mut high) = session.bounds(channel)?;
                    let low_changed =
                        ui.slider(format!("Ch{} Low", channel), PIXEL_MIN, PIXEL_MAX, &mut low);
                    let high_changed =
                        ui.slider(format!("Ch{} High", channel), PIXEL_MIN, PIXEL_MAX, &mut high);
                    if low_changed || high_changed {
                        session.set_bounds(channel, low, high)?;
                    }
                }

                swatch.make(renderer)?.build(ui);
                if ui.is_item_clicked() {
                    session.cycle_color_space(Direction::Forward);
                } else if ui.is_item_clicked_with_button(MouseButton::Right) {
                    session.cycle_color_space(Direction::Backward);
                }
                Ok(())
            })
            .unwrap_or(Ok(()))
    }
}

/// Draws `image` in its own auto-sized window; no-op before the first frame.
pub fn show(ui: &Ui, renderer: &mut AutoRenderer, name: &str, image: &mut Image) -> Result<()> {
    if image.is_empty() {
        return Ok(());
    }
    ui.window(name)
        .always_auto_resize(true)
        .build(|| -> Result<()> {
            image.make(renderer)?.build(ui);
            Ok(())
        })
        .unwrap_or(Ok(()))
}
