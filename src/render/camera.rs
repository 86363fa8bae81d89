use crate::foundation::core::{Vec3, Viewport};

/// Screen-space result of [`PerspectiveCamera::project`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Pixel x, left to right.
    pub x: f64,
    /// Pixel y, top to bottom.
    pub y: f64,
    /// Distance from the eye along the view axis.
    pub depth: f64,
}

/// Pinhole camera on the +z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    /// Eye position on the z axis.
    pub eye_z: f64,
    pub near: f64,
    pub far: f64,
    /// Width over height.
    pub aspect: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_deg: 55.0,
            eye_z: 700.0,
            near: 1.0,
            far: 5000.0,
            aspect: 1.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            aspect: viewport.aspect(),
            ..Self::default()
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    fn focal(&self) -> f64 {
        1.0 / (self.fov_y_deg.to_radians() / 2.0).tan()
    }

    /// Project a world point into `viewport` pixels. Points outside `[near, far]` are culled.
    pub fn project(&self, p: Vec3, viewport: Viewport) -> Option<Projected> {
        let depth = self.eye_z - p.z;
        if !(self.near..=self.far).contains(&depth) {
            return None;
        }
        let f = self.focal();
        let ndc_x = p.x * f / self.aspect / depth;
        let ndc_y = p.y * f / depth;
        Some(Projected {
            x: (ndc_x + 1.0) * 0.5 * viewport.w(),
            y: (1.0 - ndc_y) * 0.5 * viewport.h(),
            depth,
        })
    }

    /// Attenuated point radius in pixels, never below half a pixel.
    pub fn point_radius_px(&self, size: f64, depth: f64, viewport: Viewport) -> f64 {
        if depth <= 0.0 {
            return 0.5;
        }
        (size * viewport.h() * 0.5 / depth * 0.5).max(0.5)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
