//! Camera and viewport parameters for ray generation.
//!
//! The viewport is a world-space axis-aligned rectangle at its own z
//! coordinate; it does not rotate with the camera. Pixel (0, 0) maps to
//! the rectangle's bottom-left corner, so row 0 of the pixel buffer is
//! the bottom of the image.

use helios_math::Vec3;
use thiserror::Error;

/// Configuration errors rejected before a dispatch is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("resolution must be positive, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
    #[error("viewport extents must be positive and finite")]
    InvalidViewport,
}

/// Camera eye plus viewport rectangle plus target resolution.
///
/// Supplied fresh by the frame-loop collaborator each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Ray origin for every sample
    pub eye: Vec3,
    /// Center of the viewport rectangle in world space
    pub viewport_center: Vec3,
    /// Viewport extent along world x
    pub viewport_width: f32,
    /// Viewport extent along world y
    pub viewport_height: f32,
    /// Pixel grid resolution
    pub image_width: u32,
    pub image_height: u32,
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            viewport_center: Vec3::ZERO,
            viewport_width: 2.0,
            viewport_height: 2.0,
            image_width: 800,
            image_height: 450,
        }
    }

    /// Set the eye position.
    pub fn with_eye(mut self, eye: Vec3) -> Self {
        self.eye = eye;
        self
    }

    /// Set the viewport rectangle.
    pub fn with_viewport(mut self, center: Vec3, width: f32, height: f32) -> Self {
        self.viewport_center = center;
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Boundary validation; the kernel itself assumes valid input and does
    /// not re-check per pixel.
    pub fn validate(&self) -> Result<(), CameraError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CameraError::InvalidResolution {
                width: self.image_width,
                height: self.image_height,
            });
        }
        let extents_ok = self.viewport_width > 0.0
            && self.viewport_height > 0.0
            && self.viewport_width.is_finite()
            && self.viewport_height.is_finite();
        if !extents_ok {
            return Err(CameraError::InvalidViewport);
        }
        Ok(())
    }

    /// Total pixel count at the current resolution.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// World-space footprint of one pixel.
    #[inline]
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.viewport_width / self.image_width as f32,
            self.viewport_height / self.image_height as f32,
        )
    }

    /// World-space position of a pixel's bottom-left corner.
    ///
    /// `idx` is the row-major pixel index with row 0 at the bottom of the
    /// viewport.
    #[inline]
    pub fn pixel_origin(&self, idx: usize) -> Vec3 {
        let x = (idx % self.image_width as usize) as f32;
        let y = (idx / self.image_width as usize) as f32;
        let (px_w, px_h) = self.pixel_size();

        Vec3::new(
            self.viewport_center.x - self.viewport_width / 2.0 + px_w * x,
            self.viewport_center.y - self.viewport_height / 2.0 + px_h * y,
            self.viewport_center.z,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
