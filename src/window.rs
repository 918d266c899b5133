use std::time::Instant;

pub use imgui::Ui;
use imgui_glow_renderer::glow::{self, HasContext};
pub use imgui_glow_renderer::AutoRenderer;

use glutin::surface::GlSurface;
use winit::application::ApplicationHandler;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

pub use crate::app::Flow;
use crate::app::{App, MainLoop};
use crate::error::window_error;
use crate::{Error, Result};

impl<Loop: MainLoop> App<Loop> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: Error) {
        log::error!("{}", e);
        if self.outcome.is_ok() {
            self.outcome = Err(e);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<Flow> {
        let (Some(window), Some(renderer)) = (self.window.as_ref(), self.renderer.as_mut()) else {
            return Ok(Flow::Continue);
        };
        let ui = self.imgui.new_frame();
        self.platform.prepare_render(ui, window);

        // the frame is always rendered so imgui sees a closed frame
        let flow = (self.main_loop)(ui, renderer);

        unsafe {
            renderer.gl_context().clear(glow::COLOR_BUFFER_BIT);
        }

        let draw_data = self.imgui.render();
        if draw_data.draw_lists_count() != 0 {
            renderer.render(draw_data).map_err(window_error)?;
        }

        if let Some((surface, context)) = self.surface.as_ref() {
            surface.swap_buffers(context).map_err(window_error)?;
        }
        flow
    }
}

impl<Loop: MainLoop> ApplicationHandler for App<Loop> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: winit::event::StartCause) {
        let now = Instant::now();
        self.imgui.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if let Err(e) = self.platform.prepare_frame(self.imgui.io_mut(), window) {
            self.fail(event_loop, window_error(e));
            return;
        }
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => event_loop.exit(),
                Err(e) => self.fail(event_loop, e),
            },
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => {
                if let Some(window) = self.window.as_ref() {
                    self.platform.handle_event(
                        self.imgui.io_mut(),
                        window,
                        &Event::<()>::WindowEvent { window_id, event },
                    );
                }
            }
        }
    }
}

/// Opens a window titled `title` and runs `main_loop` once per frame until
/// it returns [`Flow::Exit`], fails, or the window is closed.
pub fn create(title: &str, main_loop: impl MainLoop) -> Result<()> {
    let event_loop = EventLoop::new().map_err(window_error)?;
    let mut app = App::new(title, main_loop);
    event_loop.run_app(&mut app).map_err(window_error)?;
    app.outcome
}
