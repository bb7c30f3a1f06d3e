//! Primitive and light records for the Helios scene.
//!
//! All records are plain `Copy` data so the snapshot can overwrite its
//! buffers with a flat element-for-element copy each refresh.

use helios_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Surface material, embedded by value in each primitive.
///
/// There is no shared material entity; every primitive instance owns its
/// own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse reflection coefficient (per channel)
    pub diffuse: Color,
    /// Specular reflection coefficient (per channel)
    pub specular: Color,
    /// Phong exponent controlling highlight tightness (> 0)
    pub phong_exponent: f32,
}

impl Material {
    /// Create a new material.
    pub fn new(diffuse: Color, specular: Color, phong_exponent: f32) -> Self {
        Self {
            diffuse,
            specular,
            phong_exponent,
        }
    }

    /// A purely diffuse material with no highlight.
    pub fn diffuse_only(diffuse: Color) -> Self {
        Self::new(diffuse, Color::ZERO, 1.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.5), // Grey default
            specular: Color::ZERO,
            phong_exponent: 32.0,
        }
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Radius is clamped to be non-negative.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

/// A triangle primitive with corners `a`, `b`, `c`.
///
/// The winding of `(b - a, c - a)` determines the face normal via their
/// cross product. Consistent winding is the caller's responsibility; the
/// kernel never flips a normal to face the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub material: Material,
}

impl Triangle {
    /// Create a new triangle from three corners.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self { a, b, c, material }
    }
}

/// A point light with constant emitted color.
///
/// No intensity falloff with distance is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}

impl PointLight {
    /// Create a new point light.
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}
