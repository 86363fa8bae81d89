use crate::foundation::color::Rgba8;
use crate::foundation::core::Viewport;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The show clears to an opaque color, so in practice every
/// pixel has alpha 255; the flag keeps the contract explicit at sink boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Point material and clear color.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Opaque clear color drawn under the points.
    pub clear_rgba: Rgba8,
    /// Point color, blended additively.
    pub point_rgba: Rgba8,
    /// Point size in world units before perspective attenuation.
    pub point_size: f64,
}

impl RenderSettings {
    /// Default material with a point size chosen for `viewport`.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            point_size: point_size_for(viewport),
            ..Self::default()
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: Rgba8::rgb(0, 0, 0),
            point_rgba: Rgba8::rgb(0xee, 0x52, 0x82),
            point_size: 2.2,
        }
    }
}

/// `max(2.2, width / 900)`.
pub fn point_size_for(viewport: Viewport) -> f64 {
    (viewport.w() / 900.0).max(2.2)
}
