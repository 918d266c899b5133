use std::time::Instant;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::GetGlDisplay;
use glutin::prelude::{GlDisplay, NotCurrentGlContext};
use glutin::surface::{Surface, WindowSurface};
use glutin_winit::GlWindow;

use imgui::{Context, FontSource, Ui};
use imgui_glow_renderer::glow::{self, HasContext};
use imgui_glow_renderer::AutoRenderer;
use imgui_winit_support::{HiDpiMode, WinitPlatform};

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

use crate::error::window_error;
use crate::Result;

/// What the event loop should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Per-frame body of a tool, called once per redraw.
pub trait MainLoop: FnMut(&mut Ui, &mut AutoRenderer) -> Result<Flow> {}

impl<F> MainLoop for F where F: FnMut(&mut Ui, &mut AutoRenderer) -> Result<Flow> {}

pub struct App<Loop: MainLoop> {
    pub imgui: Context,
    pub platform: WinitPlatform,
    pub main_loop: Loop,
    pub last_frame: Instant,
    pub title: String,
    /// First error hit by the loop; handed back from `window::create`.
    pub outcome: Result<()>,

    pub window: Option<Window>,
    pub renderer: Option<AutoRenderer>,
    pub surface: Option<(Surface<WindowSurface>, PossiblyCurrentContext)>,
}

impl<Loop: MainLoop> App<Loop> {
    pub fn new(title: &str, main_loop: Loop) -> Self {
        let mut imgui = Context::create();
        imgui.set_ini_filename(None);
        let font_atlas = imgui.fonts();
        font_atlas.add_font(&[FontSource::DefaultFontData { config: None }]);
        font_atlas.build_rgba32_texture();

        let platform = WinitPlatform::new(&mut imgui);

        Self {
            imgui,
            platform,
            main_loop,
            last_frame: Instant::now(),
            title: title.to_string(),
            outcome: Ok(()),

            window: None,
            renderer: None,
            surface: None,
        }
    }

    pub fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = PhysicalSize::new(1920 * 3 / 4, 1080 * 3 / 4);
        let wind_attr = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(size);
        let template = ConfigTemplateBuilder::new();
        let compare_conf = |a: &Config, b: &Config| a.num_samples().cmp(&b.num_samples());

        let (window, config) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(wind_attr))
            .build(event_loop, template, |configs| {
                configs
                    .max_by(compare_conf)
                    .expect("display offers at least one config")
            })
            .map_err(window_error)?;
        let window_ref = window
            .as_ref()
            .ok_or_else(|| window_error("display builder returned no window"))?;
        let display = config.display();

        let surf_attr = window_ref
            .build_surface_attributes(Default::default())
            .map_err(window_error)?;
        let surface = unsafe { display.create_window_surface(&config, &surf_attr) }
            .map_err(window_error)?;

        let gl_version = glutin::context::Version { major: 4, minor: 1 };
        let ctx_api = ContextApi::OpenGl(Some(gl_version));
        let ctx_attr = ContextAttributesBuilder::new()
            .with_context_api(ctx_api)
            .build(Some(window_ref.window_handle().map_err(window_error)?.into()));
        let context = unsafe { display.create_context(&config, &ctx_attr) }.map_err(window_error)?;
        let context = context.make_current(&surface).map_err(window_error)?;

        self.platform
            .attach_window(self.imgui.io_mut(), window_ref, HiDpiMode::Default);

        let gl = unsafe {
            let gl = glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s));
            gl.clear_color(0.3, 0.3, 0.3, 1.);
            gl
        };
        self.renderer = Some(AutoRenderer::new(gl, &mut self.imgui).map_err(window_error)?);
        self.window = window;
        self.surface = Some((surface, context));
        Ok(())
    }
}
