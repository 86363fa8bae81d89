use super::*;

/// Paints a filled block covering the middle third of the bitmap.
struct BlockRasterizer {
    calls: Vec<(String, u32, u32, f64)>,
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(
        &mut self,
        text: &str,
        width: u32,
        height: u32,
        font_px: f64,
    ) -> HeartfieldResult<AlphaMask> {
        self.calls.push((text.to_owned(), width, height, font_px));
        let mut alpha = vec![0u8; (width * height) as usize];
        for y in height / 3..(2 * height) / 3 {
            for x in width / 3..(2 * width) / 3 {
                alpha[(y * width + x) as usize] = 255;
            }
        }
        AlphaMask::new(width, height, alpha)
    }
}

#[test]
fn transparent_bitmap_yields_no_points() {
    let mask = AlphaMask::empty(64, 32);
    assert!(sample_mask(&mask, 4).is_empty());
}

#[test]
fn threshold_is_exclusive() {
    let mask = AlphaMask::new(2, 1, vec![OPACITY_THRESHOLD, OPACITY_THRESHOLD + 1]).unwrap();
    let pts = sample_mask(&mask, 1);
    assert_eq!(pts, vec![Point::new(0.0, 0.5)]);
}

#[test]
fn points_are_centered_with_y_up() {
    let mut alpha = vec![0u8; 16];
    alpha[0] = 255; // (0,0): top-left
    alpha[15] = 255; // (3,3): bottom-right
    let mask = AlphaMask::new(4, 4, alpha).unwrap();
    let pts = sample_mask(&mask, 1);
    assert_eq!(pts, vec![Point::new(-2.0, 2.0), Point::new(1.0, -1.0)]);
}

#[test]
fn stride_skips_off_grid_pixels() {
    let mask = AlphaMask::new(8, 8, vec![255; 64]).unwrap();
    assert_eq!(sample_mask(&mask, 4).len(), 4);
    assert_eq!(sample_mask(&mask, 1).len(), 64);
    assert_eq!(sample_mask(&mask, 0).len(), 64);
}

#[test]
fn sample_text_passes_floored_font_size() {
    let mut r = BlockRasterizer { calls: Vec::new() };
    let req = GlyphRequest {
        text: "Walaa",
        width: 90,
        height: 121,
        stride: 3,
        font_scale: 0.72,
    };
    let pts = sample_text(&mut r, &req).unwrap();
    assert!(!pts.is_empty());
    assert_eq!(r.calls, vec![("Walaa".to_owned(), 90, 121, 87.0)]);
    for p in pts {
        assert!(p.x.abs() <= 45.0 && p.y.abs() <= 60.5);
    }
}

#[test]
fn mask_rejects_mismatched_len() {
    assert!(AlphaMask::new(3, 3, vec![0; 8]).is_err());
    assert!(AlphaMask::from_rgba8(2, 2, &[0; 15]).is_err());
}

#[test]
fn svg_rasterizer_zero_size_is_empty_not_error() {
    let mut r = SvgGlyphRasterizer::new("Arial", &[]);
    let mask = r.rasterize("Walaa", 0, 40, 20.0).unwrap();
    assert_eq!(mask.width(), 0);
    assert!(sample_mask(&mask, 4).is_empty());
}

#[test]
fn svg_document_escapes_markup() {
    let r = SvgGlyphRasterizer::new("A&B", &[]);
    let doc = r.document("<3 & \"you\"", 100, 50, 25.0);
    assert!(doc.contains("&lt;3 &amp; &quot;you&quot;"));
    assert!(doc.contains("'A&amp;B', sans-serif"));
    assert!(doc.contains(r#"font-weight="bold""#));
    assert!(doc.contains(r#"x="50" y="25""#));
}

#[test]
fn svg_rasterizer_output_matches_requested_size() {
    // Whether any ink appears depends on installed fonts; the mask shape must not.
    let mut r = SvgGlyphRasterizer::new("Arial", &[]);
    let mask = r.rasterize("HI", 120, 60, 40.0).unwrap();
    assert_eq!((mask.width(), mask.height()), (120, 60));
    if r.face_count() > 0 {
        assert!(!sample_mask(&mask, 2).is_empty());
    }
}
