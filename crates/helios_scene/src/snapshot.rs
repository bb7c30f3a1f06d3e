//! Flattened per-frame scene snapshot.
//!
//! The snapshot mirrors the `SceneDescription` in three parallel flat
//! buffers that the tracing kernel scans brute-force. Buffers are
//! allocated once and reallocated only when a primitive/light count
//! changes; a dirty refresh overwrites every element index-for-index
//! (no diffing). Between refreshes the same buffers are reused every
//! frame, so the kernel sees an immutable view for the whole dispatch.

use crate::description::SceneDescription;
use crate::primitives::{Color, PointLight, Sphere, Triangle};
use crate::sampling::SuperSampling;

/// Read-only-per-frame flattened scene.
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    spheres: Vec<Sphere>,
    triangles: Vec<Triangle>,
    lights: Vec<PointLight>,
    background: Color,
    supersampling: SuperSampling,
}

impl SceneSnapshot {
    /// Create an empty snapshot. The first `refresh` populates it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattened spheres, in description order.
    #[inline]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Flattened triangles, in description order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flattened lights, in description order.
    #[inline]
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Background color for rays that miss everything.
    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Supersampling degree for this frame.
    #[inline]
    pub fn supersampling(&self) -> SuperSampling {
        self.supersampling
    }

    /// Explicit once-per-frame sync with the authored scene.
    ///
    /// Runs the capacity pass, then copies everything if the description
    /// is dirty or any buffer was reallocated. Must never run while a
    /// kernel dispatch is reading the snapshot; refreshes happen strictly
    /// between frames.
    pub fn refresh(&mut self, description: &mut SceneDescription) {
        let resized = self.ensure_capacity(description);
        if resized || description.take_dirty() {
            self.copy_from(description);
        }
    }

    /// Capacity pass: any buffer whose length no longer matches the
    /// description's count is dropped and reallocated at the new length.
    ///
    /// Reallocation invalidates previously held slices into the old
    /// buffers; callers must re-fetch after a refresh.
    fn ensure_capacity(&mut self, description: &SceneDescription) -> bool {
        let mut resized = false;

        if self.spheres.len() != description.spheres.len() {
            log::debug!(
                "snapshot sphere buffer: {} -> {}",
                self.spheres.len(),
                description.spheres.len()
            );
            self.spheres = vec![Sphere::default(); description.spheres.len()];
            resized = true;
        }
        if self.triangles.len() != description.triangles.len() {
            log::debug!(
                "snapshot triangle buffer: {} -> {}",
                self.triangles.len(),
                description.triangles.len()
            );
            self.triangles = vec![Triangle::default(); description.triangles.len()];
            resized = true;
        }
        if self.lights.len() != description.lights.len() {
            log::debug!(
                "snapshot light buffer: {} -> {}",
                self.lights.len(),
                description.lights.len()
            );
            self.lights = vec![PointLight::default(); description.lights.len()];
            resized = true;
        }

        resized
    }

    /// Full overwrite of every buffer element plus the render settings.
    fn copy_from(&mut self, description: &SceneDescription) {
        self.spheres.copy_from_slice(&description.spheres);
        self.triangles.copy_from_slice(&description.triangles);
        self.lights.copy_from_slice(&description.lights);
        self.background = description.background;
        self.supersampling = description.supersampling;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Material;
    use helios_math::Vec3;

    fn one_sphere_description() -> SceneDescription {
        let mut desc = SceneDescription::new(Color::new(0.1, 0.2, 0.3));
        desc.push_sphere(Sphere::new(Vec3::ZERO, 1.0, Material::default()));
        desc.push_light(PointLight::new(Vec3::Y * 5.0, Color::ONE));
        desc
    }

    #[test]
    fn test_refresh_copies_everything() {
        let mut desc = one_sphere_description();
        let mut snap = SceneSnapshot::new();

        snap.refresh(&mut desc);

        assert_eq!(snap.spheres().len(), 1);
        assert_eq!(snap.lights().len(), 1);
        assert_eq!(snap.background(), Color::new(0.1, 0.2, 0.3));
        assert!(!desc.is_dirty());
    }

    #[test]
    fn test_refresh_without_dirty_keeps_stale_data() {
        let mut desc = one_sphere_description();
        let mut snap = SceneSnapshot::new();
        snap.refresh(&mut desc);

        // Edit in place without signaling
        desc.spheres[0].radius = 9.0;
        snap.refresh(&mut desc);
        assert_eq!(snap.spheres()[0].radius, 1.0, "no automatic change detection");

        desc.mark_dirty();
        snap.refresh(&mut desc);
        assert_eq!(snap.spheres()[0].radius, 9.0);
    }

    #[test]
    fn test_count_change_forces_copy_without_dirty() {
        let mut desc = one_sphere_description();
        let mut snap = SceneSnapshot::new();
        snap.refresh(&mut desc);

        // A count mismatch alone must trigger reallocation plus copy
        desc.push_sphere(Sphere::new(Vec3::X * 3.0, 0.5, Material::default()));
        snap.refresh(&mut desc);
        assert_eq!(snap.spheres().len(), 2);
        assert_eq!(snap.spheres()[1].center, Vec3::X * 3.0);
    }

    #[test]
    fn test_clean_refresh_reuses_buffers() {
        let mut desc = one_sphere_description();
        let mut snap = SceneSnapshot::new();
        snap.refresh(&mut desc);

        let before = snap.spheres().as_ptr();
        snap.refresh(&mut desc);
        let after = snap.spheres().as_ptr();
        assert_eq!(before, after, "clean frames must not reallocate");
    }
}
