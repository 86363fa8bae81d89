//! 2-D point-set sampling: parametric curves and rasterized glyphs.

pub mod curve;
pub mod glyph;
