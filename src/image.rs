use igr::glow::HasContext;
use igr::{glow, TextureMap};
use imgui_glow_renderer as igr;

use crate::error::window_error;
use crate::*;

/// An OpenCV image mirrored into a GL texture for imgui.
#[derive(Default, Debug)]
pub struct Image {
    /// RGB copy of whatever was last passed to [`Image::set`].
    pub mat: Mat,
    texture: Option<glow::Texture>,
    texture_id: Option<imgui::TextureId>,
}

impl Image {
    /// Replaces the displayed image. 1-channel images are shown as gray and
    /// 3/4-channel images are read as BGR(A).
    pub fn set(&mut self, mat: &Mat) -> Result<()> {
        let code = match mat.channels() {
            1 => imgproc::COLOR_GRAY2RGB,
            3 => imgproc::COLOR_BGR2RGB,
            4 => imgproc::COLOR_BGRA2RGB,
            n => {
                return Err(Error::InvalidArgument(format!(
                    "cannot display a {}-channel image",
                    n
                )))
            }
        };
        imgproc::cvt_color_def(mat, &mut self.mat, code)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.mat.empty()
    }

    pub fn make(&mut self, renderer: &mut igr::AutoRenderer) -> Result<imgui::Image> {
        if self.texture_id.is_none() {
            self.init(renderer)?;
        }
        let texture_id = self
            .texture_id
            .ok_or_else(|| window_error("texture was not registered"))?;
        let size = self.size()?;
        let gl = renderer.gl_context();
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, self.texture);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as _,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as _,
            );
            // rows of an odd-width RGB image are not 4-byte aligned
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as _,
                size[0] as _,
                size[1] as _,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                Some(self.mat.data_bytes()?),
            );
        };
        Ok(imgui::Image::new(texture_id, size))
    }

    fn init(&mut self, renderer: &mut igr::AutoRenderer) -> Result<()> {
        let texture = unsafe { renderer.gl_context().create_texture() }.map_err(window_error)?;
        self.texture = Some(texture);
        self.texture_id = Some(
            renderer
                .texture_map_mut()
                .register(texture)
                .ok_or_else(|| window_error("could not register texture"))?,
        );
        Ok(())
    }

    pub fn size(&self) -> Result<[f32; 2]> {
        Ok(self.mat.size()?.to_array())
    }
}
