//! CPU rasterization of the point cloud.

pub mod backend;
pub mod camera;
pub mod cpu;

pub use backend::{FrameRGBA, RenderSettings, point_size_for};
pub use camera::{PerspectiveCamera, Projected};
pub use cpu::PointRenderer;
