use crate::foundation::core::{Vec3, Viewport};
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use crate::foundation::math::add_sat_u8;
use crate::particles::PositionBuffer;
use crate::render::backend::{FrameRGBA, RenderSettings};
use crate::render::camera::PerspectiveCamera;
use vello_cpu::kurbo::Shape as _;

/// Draws the position buffer as additive discs with `vello_cpu`.
///
/// The buffer is copied into the renderer only when it is dirty; clean frames reuse the last
/// upload.
pub struct PointRenderer {
    settings: RenderSettings,
    camera: PerspectiveCamera,
    viewport: Viewport,
    uploaded: Vec<f32>,
    uploads: u64,
    ctx: Option<vello_cpu::RenderContext>,
}

impl PointRenderer {
    pub fn new(viewport: Viewport, settings: RenderSettings) -> Self {
        Self {
            settings,
            camera: PerspectiveCamera::for_viewport(viewport),
            viewport,
            uploaded: Vec::new(),
            uploads: 0,
            ctx: None,
        }
    }

    /// New output size; the camera aspect follows.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Number of buffer uploads so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Render one frame with the whole cloud yawed by `rotation_y` radians.
    pub fn render(
        &mut self,
        buffer: &mut PositionBuffer,
        rotation_y: f64,
    ) -> HeartfieldResult<FrameRGBA> {
        if buffer.take_dirty() {
            self.uploaded.clear();
            self.uploaded.extend_from_slice(buffer.as_slice());
            self.uploads += 1;
        }

        let (width, height) = (self.viewport.width, self.viewport.height);
        if width == 0 || height == 0 {
            return Ok(FrameRGBA {
                width,
                height,
                data: Vec::new(),
                premultiplied: true,
            });
        }
        let w16 = u16::try_from(width)
            .map_err(|_| HeartfieldError::render("viewport width exceeds raster limit"))?;
        let h16 = u16::try_from(height)
            .map_err(|_| HeartfieldError::render("viewport height exceeds raster limit"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        self.draw_points(&mut ctx, rotation_y);
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut layer);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width,
            height,
            data: add_over_clear(layer.data_as_u8_slice(), self.settings.clear_rgba.to_premul_array()),
            premultiplied: true,
        })
    }

    fn draw_points(&self, ctx: &mut vello_cpu::RenderContext, rotation_y: f64) {
        use vello_cpu::peniko::{BlendMode, Color, Compose, Mix};

        let c = self.settings.point_rgba;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.set_blend_mode(BlendMode::new(Mix::Normal, Compose::Plus));

        for xyz in self.uploaded.chunks_exact(3) {
            let p = Vec3::new(f64::from(xyz[0]), f64::from(xyz[1]), f64::from(xyz[2]))
                .rotate_y(rotation_y);
            let Some(s) = self.camera.project(p, self.viewport) else {
                continue;
            };
            let r = self
                .camera
                .point_radius_px(self.settings.point_size, s.depth, self.viewport);
            let disc = vello_cpu::kurbo::Circle::new((s.x, s.y), r);
            ctx.fill_path(&disc.to_path(0.1));
        }
    }
}

/// Additive composite of a premultiplied point layer over an opaque clear color.
fn add_over_clear(layer: &[u8], clear_premul: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(layer.len());
    for px in layer.chunks_exact(4) {
        out.extend_from_slice(&[
            add_sat_u8(clear_premul[0], px[0]),
            add_sat_u8(clear_premul[1], px[1]),
            add_sat_u8(clear_premul[2], px[2]),
            add_sat_u8(clear_premul[3], px[3]),
        ]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
