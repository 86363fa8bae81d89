use super::*;
use crate::sampling::glyph::AlphaMask;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Inks a horizontal bar through the vertical center of every bitmap.
struct BarRasterizer;

impl GlyphRasterizer for BarRasterizer {
    fn rasterize(
        &mut self,
        _text: &str,
        width: u32,
        height: u32,
        _font_px: f64,
    ) -> HeartfieldResult<AlphaMask> {
        let mut alpha = vec![0u8; (width * height) as usize];
        let y = height / 2;
        for x in 0..width {
            alpha[(y * width + x) as usize] = 255;
        }
        AlphaMask::new(width, height, alpha)
    }
}

/// Never inks anything.
struct BlankRasterizer;

impl GlyphRasterizer for BlankRasterizer {
    fn rasterize(
        &mut self,
        _text: &str,
        width: u32,
        height: u32,
        _font_px: f64,
    ) -> HeartfieldResult<AlphaMask> {
        Ok(AlphaMask::empty(width, height))
    }
}

fn build(viewport: Viewport, n: usize, r: &mut dyn GlyphRasterizer) -> TargetSets {
    let mut rng = StdRng::seed_from_u64(11);
    TargetSetBuilder::new(r, TextTargets::default())
        .build(viewport, n, &mut rng)
        .unwrap()
}

#[test]
fn shape_set_matches_particle_count_and_bounds() {
    let vp = Viewport::new(1280, 720);
    let sets = build(vp, 300, &mut BarRasterizer);
    assert_eq!(sets.shape.len(), 300);

    let s = shape_scale(vp);
    for p in &sets.shape {
        assert!(p.x.abs() <= 16.0 * s + 1e-9);
        assert!(p.y <= 12.0 * s - 100.0);
        assert!(p.y >= -17.0 * s - 100.0 - 1e-9);
        assert!(p.z >= -40.0 && p.z < 40.0);
    }
}

#[test]
fn shape_scale_is_piecewise_by_width() {
    assert!((shape_scale(Viewport::new(500, 900)) - 500.0 / 30.0 * 1.3).abs() < 1e-9);
    assert!((shape_scale(Viewport::new(800, 600)) - 600.0 / 33.0 * 1.3).abs() < 1e-9);
    assert!((shape_scale(Viewport::new(1920, 1080)) - 1080.0 / 36.0 * 1.3).abs() < 1e-9);
}

#[test]
fn text_requests_follow_viewport_fractions() {
    let wide = Viewport::new(1920, 1080);
    let l = label_request("Walaa", wide);
    assert_eq!((l.width, l.height, l.stride), (1344, 194, 4));
    assert_eq!(l.font_scale, 0.72);
    let c = caption_request("I LOVE YOU WALAA", wide);
    assert_eq!((c.width, c.height), (1728, 194));
    assert_eq!(c.font_scale, 0.5);

    let small = Viewport::new(320, 480);
    assert_eq!(label_request("x", small).width, 380);
    assert_eq!(caption_request("x", small).width, 500);
    assert_eq!(label_request("x", small).height, 96);
}

#[test]
fn text_sets_carry_small_z_jitter() {
    let sets = build(Viewport::new(1280, 720), 10, &mut BarRasterizer);
    assert!(!sets.label.is_empty());
    assert!(!sets.caption.is_empty());
    for p in sets.label.iter().chain(sets.caption.iter()) {
        assert!(p.z >= -20.0 && p.z < 20.0);
    }
}

#[test]
fn blank_glyphs_give_empty_text_sets() {
    let sets = build(Viewport::new(800, 600), 10, &mut BlankRasterizer);
    assert_eq!(sets.shape.len(), 10);
    assert!(sets.label.is_empty());
    assert!(sets.caption.is_empty());
}

#[test]
fn zero_viewport_degenerates_without_error() {
    let sets = build(Viewport::new(0, 0), 5, &mut BlankRasterizer);
    assert_eq!(sets.shape.len(), 5);
    for p in &sets.shape {
        assert_eq!((p.x, p.y), (0.0, -100.0));
    }
}

#[test]
fn store_replace_swaps_all_sets_together() {
    let old = build(Viewport::new(800, 600), 20, &mut BarRasterizer);
    let mut store = TargetStore::new(old);
    let before = store.snapshot();
    assert_eq!(before.generation, 1);

    let new = build(Viewport::new(1920, 1080), 40, &mut BlankRasterizer);
    let generation = store.replace(new);
    assert_eq!(generation, 2);

    // The held snapshot is untouched and internally consistent.
    assert_eq!(before.viewport, Viewport::new(800, 600));
    assert_eq!(before.shape.len(), 20);
    assert!(!before.label.is_empty());

    let after = store.snapshot();
    assert_eq!(after.generation, 2);
    assert_eq!(after.viewport, Viewport::new(1920, 1080));
    assert_eq!(after.shape.len(), 40);
    assert!(after.label.is_empty() && after.caption.is_empty());
}
