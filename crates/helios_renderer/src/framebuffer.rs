//! Pixel buffer management and presentation conversion.

use helios_scene::Color;

/// Clamp a value to [0, 1] range.
#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA at the presentation boundary.
///
/// The kernel accumulates unclamped color; clamping happens here and only
/// here so that supersampling averages stay linear. No gamma curve is
/// applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Dense row-major pixel buffer, row 0 at the bottom of the image.
///
/// Owned exclusively by the kernel while a dispatch is in flight; after
/// the join it is read-only for the presentation collaborator. Length is
/// always width * height; any resolution change reallocates the whole
/// buffer and discards prior contents.
#[derive(Debug, Clone, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create an empty buffer; `ensure_sized` gives it its first shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the buffer to the current camera resolution.
    ///
    /// Reallocates only when the pixel count actually changed; calling
    /// this twice with the same resolution leaves the allocation intact.
    /// Contents after a reallocation are undefined until the kernel runs.
    /// Never called mid-frame once a dispatch has started.
    pub fn ensure_sized(&mut self, width: u32, height: u32) {
        let len = width as usize * height as usize;
        if self.pixels.len() != len {
            log::debug!(
                "pixel buffer: {}x{} -> {}x{}",
                self.width,
                self.height,
                width,
                height
            );
            self.pixels = vec![Color::ZERO; len];
        }
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y), with y = 0 at the bottom row.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable pixel storage for the kernel dispatch.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}
