//! Mutable, authoring-side scene description.
//!
//! This is the surface the scene-editing collaborator mutates. The kernel
//! never reads it directly; it is flattened into a `SceneSnapshot` once
//! per frame at most. There is no automatic change detection: after any
//! edit the collaborator must call `mark_dirty`, or the next snapshot
//! refresh will reuse stale buffers.

use crate::primitives::{Color, PointLight, Sphere, Triangle};
use crate::sampling::SuperSampling;

/// The authoritative mutable scene.
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    pub spheres: Vec<Sphere>,
    pub triangles: Vec<Triangle>,
    pub lights: Vec<PointLight>,
    /// Color returned for rays that hit nothing
    pub background: Color,
    /// Per-axis supersampling degree for the next rendered frame
    pub supersampling: SuperSampling,

    dirty: bool,
}

impl SceneDescription {
    /// Create an empty scene with the given background color.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            // A fresh description has never been flattened
            dirty: true,
            ..Default::default()
        }
    }

    /// Add a sphere. The caller still owns dirtiness signaling.
    pub fn push_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Add a triangle.
    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a point light.
    pub fn push_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Signal that the description changed since the last snapshot refresh.
    ///
    /// Must be called after any primitive/light add, remove or edit, and
    /// after changing `background` or `supersampling`.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a refresh is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the dirty flag. Used by the snapshot refresh step.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
