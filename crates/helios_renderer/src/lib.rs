//! Helios renderer - CPU ray tracing kernel.
//!
//! A brute-force Whitted-style tracer without the recursion: every frame
//! is a full recompute, one pure color computation per pixel, dispatched
//! in parallel batches over the pixel buffer. Blinn-Phong shading, no
//! shadows, no reflections, no acceleration structures.

mod camera;
mod framebuffer;
mod kernel;

pub use camera::{Camera, CameraError};
pub use framebuffer::{color_to_rgba, PixelBuffer};
pub use kernel::{render, render_pixel, trace, DEFAULT_BATCH_SIZE};

/// Re-export math and scene types used in the public API
pub use helios_math::{Ray, Vec3};
pub use helios_scene::{Color, Material, PointLight, SceneSnapshot, Sphere, SuperSampling, Triangle};
