use crate::foundation::core::Point;
use crate::foundation::error::{HeartfieldError, HeartfieldResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Minimum alpha (exclusive) for a bitmap pixel to count as ink.
pub const OPACITY_THRESHOLD: u8 = 150;

/// One text-to-points sampling request.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRequest<'a> {
    /// Text to render, centered in the bitmap.
    pub text: &'a str,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Grid stride in pixels; 0 is treated as 1.
    pub stride: u32,
    /// Font size as a fraction of `height`.
    pub font_scale: f64,
}

impl GlyphRequest<'_> {
    /// Font size in pixels, `floor(height * font_scale)`.
    pub fn font_px(&self) -> f64 {
        (f64::from(self.height) * self.font_scale).floor().max(0.0)
    }
}

/// Single-channel coverage bitmap, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Wrap raw alpha bytes; `alpha.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> HeartfieldResult<Self> {
        if alpha.len() != (width as usize) * (height as usize) {
            return Err(HeartfieldError::sampling(format!(
                "alpha mask byte len {} does not match {width}x{height}",
                alpha.len()
            )));
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Fully transparent mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Extract the alpha channel of a tightly packed RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> HeartfieldResult<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(HeartfieldError::sampling("rgba8 byte len mismatch"));
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::new(width, height, alpha)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at `(x, y)`, or 0 outside the mask.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

/// Renders a line of text into an [`AlphaMask`].
///
/// Text that overflows the bitmap is clipped, never reported.
pub trait GlyphRasterizer {
    /// Rasterize `text` centered in a `width x height` bitmap at `font_px`.
    fn rasterize(
        &mut self,
        text: &str,
        width: u32,
        height: u32,
        font_px: f64,
    ) -> HeartfieldResult<AlphaMask>;
}

/// Scan `mask` on a `stride` grid and emit centered, y-up points where alpha exceeds
/// [`OPACITY_THRESHOLD`].
pub fn sample_mask(mask: &AlphaMask, stride: u32) -> Vec<Point> {
    let step = stride.max(1) as usize;
    let half_w = f64::from(mask.width) / 2.0;
    let half_h = f64::from(mask.height) / 2.0;

    let mut out = Vec::new();
    for y in (0..mask.height).step_by(step) {
        for x in (0..mask.width).step_by(step) {
            if mask.alpha_at(x, y) > OPACITY_THRESHOLD {
                out.push(Point::new(f64::from(x) - half_w, half_h - f64::from(y)));
            }
        }
    }
    out
}

/// Rasterize and sample in one go.
pub fn sample_text<R>(rasterizer: &mut R, req: &GlyphRequest<'_>) -> HeartfieldResult<Vec<Point>>
where
    R: GlyphRasterizer + ?Sized,
{
    let mask = rasterizer.rasterize(req.text, req.width, req.height, req.font_px())?;
    Ok(sample_mask(&mask, req.stride))
}

/// Production rasterizer: bold text through `usvg`/`resvg` against system fonts.
///
/// The configured family is tried first, then any sans-serif face, then whatever face exists.
pub struct SvgGlyphRasterizer {
    family: String,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgGlyphRasterizer {
    /// Build a rasterizer with system fonts plus any `.ttf`/`.otf`/`.ttc` under `font_dirs`.
    pub fn new(family: impl Into<String>, font_dirs: &[PathBuf]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "glyph rasterizer font database ready");
        Self {
            family: family.into(),
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available to the rasterizer.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn document(&self, text: &str, width: u32, height: u32, font_px: f64) -> String {
        format!(
            concat!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
                r##"<text x="{cx}" y="{cy}" font-family="'{family}', sans-serif" font-weight="bold" "##,
                r##"font-size="{size}" text-anchor="middle" dominant-baseline="central" fill="#fff">"##,
                "{text}</text></svg>"
            ),
            w = width,
            h = height,
            cx = f64::from(width) / 2.0,
            cy = f64::from(height) / 2.0,
            family = xml_escape(&self.family),
            size = font_px,
            text = xml_escape(text),
        )
    }
}

impl GlyphRasterizer for SvgGlyphRasterizer {
    fn rasterize(
        &mut self,
        text: &str,
        width: u32,
        height: u32,
        font_px: f64,
    ) -> HeartfieldResult<AlphaMask> {
        if width == 0 || height == 0 || font_px <= 0.0 || text.trim().is_empty() {
            return Ok(AlphaMask::empty(width, height));
        }

        let doc = self.document(text, width, height, font_px);
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| HeartfieldError::sampling(format!("parse glyph svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| HeartfieldError::sampling("failed to allocate glyph pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        AlphaMask::from_rgba8(width, height, pixmap.data())
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font dir not readable, skipping");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "font file rejected");
        }
    }
}

fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/glyph.rs"]
mod tests;
