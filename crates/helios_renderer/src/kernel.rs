//! Core tracing kernel.
//!
//! One pure color computation per pixel: generate sub-sample rays, scan
//! every primitive brute-force for the closest hit, shade with Blinn-Phong
//! over all lights, average the sub-samples. No randomness anywhere, so a
//! fixed snapshot and camera always produce a bit-identical pixel buffer.

use helios_math::{Mat3, Ray, Vec3};
use helios_scene::{Color, Material, SceneSnapshot, Sphere, Triangle};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::framebuffer::PixelBuffer;

/// Pixels per dispatch batch.
///
/// Per-pixel cost is roughly uniform (every ray scans the same primitive
/// list), so batch size bounds scheduling granularity without being
/// load-balance-critical.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Closest intersection found along a ray.
struct Hit<'a> {
    t: f32,
    point: Vec3,
    normal: Vec3,
    material: &'a Material,
}

/// Barycentric solution for a triangle hit.
#[allow(dead_code)]
struct TriangleHit {
    t: f32,
    beta: f32,
    gamma: f32,
}

/// Ray-sphere intersection.
///
/// Solves |e + t*d - c|^2 = R^2 and accepts a hit only when both roots
/// are strictly positive: a camera inside the sphere, or a sphere
/// entirely behind the camera, is deliberately a no-hit.
fn intersect_sphere(sphere: &Sphere, ray: &Ray) -> Option<f32> {
    let ec = ray.origin() - sphere.center;
    let d = ray.direction();
    let dd = d.dot(d);
    let b = d.dot(ec);

    let discriminant = b * b - dd * (ec.dot(ec) - sphere.radius * sphere.radius);
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let t_near = (-b - sqrtd) / dd;
    let t_far = (-b + sqrtd) / dd;
    if t_near <= 0.0 || t_far <= 0.0 {
        return None;
    }

    Some(t_near.min(t_far))
}

/// Ray-triangle intersection via the Cramer's-rule barycentric
/// formulation: solve a + beta*(b-a) + gamma*(c-a) = e + t*d.
///
/// Rejects anything not strictly closer than `closest_t`. A degenerate
/// triangle makes the determinant vanish; the resulting non-finite
/// quotients fail these comparisons and the sample is rejected.
fn intersect_triangle(triangle: &Triangle, ray: &Ray, closest_t: f32) -> Option<TriangleHit> {
    let col_beta = triangle.a - triangle.b;
    let col_gamma = triangle.a - triangle.c;
    let rhs = triangle.a - ray.origin();
    let d = ray.direction();

    let det_a = Mat3::from_cols(col_beta, col_gamma, d).determinant();

    let t = Mat3::from_cols(col_beta, col_gamma, rhs).determinant() / det_a;
    if t < 0.0 || t >= closest_t {
        return None;
    }

    let gamma = Mat3::from_cols(col_beta, rhs, d).determinant() / det_a;
    if !(0.0..=1.0).contains(&gamma) {
        return None;
    }

    let beta = Mat3::from_cols(rhs, col_gamma, d).determinant() / det_a;
    if beta < 0.0 || beta > 1.0 - gamma {
        return None;
    }

    Some(TriangleHit { t, beta, gamma })
}

/// Flat-shaded triangle normal: a single fixed winding, never flipped to
/// face the viewer.
#[inline]
fn triangle_normal(triangle: &Triangle) -> Vec3 {
    (triangle.c - triangle.a)
        .cross(triangle.b - triangle.a)
        .normalize()
}

/// Scan spheres then triangles in snapshot order for the closest hit.
///
/// The sphere scan accepts t <= closest, so a later sphere wins an exact
/// tie; the triangle scan requires strictly closer.
fn closest_hit<'a>(snapshot: &'a SceneSnapshot, ray: &Ray) -> Option<Hit<'a>> {
    let mut closest: Option<Hit<'a>> = None;

    for sphere in snapshot.spheres() {
        if let Some(t) = intersect_sphere(sphere, ray) {
            let closest_t = closest.as_ref().map_or(f32::INFINITY, |hit| hit.t);
            if t <= closest_t {
                let point = ray.at(t);
                closest = Some(Hit {
                    t,
                    point,
                    normal: (point - sphere.center) / sphere.radius,
                    material: &sphere.material,
                });
            }
        }
    }

    for triangle in snapshot.triangles() {
        let closest_t = closest.as_ref().map_or(f32::INFINITY, |hit| hit.t);
        if let Some(tri_hit) = intersect_triangle(triangle, ray, closest_t) {
            closest = Some(Hit {
                t: tri_hit.t,
                point: ray.at(tri_hit.t),
                normal: triangle_normal(triangle),
                material: &triangle.material,
            });
        }
    }

    closest
}

/// Blinn-Phong shading accumulated over every light, starting from black.
///
/// No occlusion test (lights always see the point), no ambient term, no
/// distance falloff, and no clamping; channels above 1 are left for the
/// presentation boundary to deal with.
fn shade(snapshot: &SceneSnapshot, eye: Vec3, hit: &Hit) -> Color {
    let mut color = Color::ZERO;
    let n = hit.normal;
    let v = (eye - hit.point).normalize();

    for light in snapshot.lights() {
        let l = (light.position - hit.point).normalize();
        let h = (v + l).normalize();

        let diffuse = hit.material.diffuse * light.color * n.dot(l).max(0.0);
        let specular = hit.material.specular
            * light.color
            * n.dot(h).max(0.0).powf(hit.material.phong_exponent);
        color += diffuse + specular;
    }

    color
}

/// Compute the color seen by a single sample ray.
///
/// Returns the snapshot background when the ray hits nothing.
pub fn trace(snapshot: &SceneSnapshot, ray: &Ray) -> Color {
    match closest_hit(snapshot, ray) {
        Some(hit) => shade(snapshot, ray.origin(), &hit),
        None => snapshot.background(),
    }
}

/// Render one pixel with deterministic N x N supersampling.
///
/// Sub-samples are offset from the pixel's bottom-left corner by
/// i * pixel_size / (2N) on each axis and averaged at weight 1/N^2.
/// Stratified but not jittered: identical inputs give identical output.
pub fn render_pixel(snapshot: &SceneSnapshot, camera: &Camera, idx: usize) -> Color {
    let n = snapshot.supersampling().degree();
    let (pixel_w, pixel_h) = camera.pixel_size();
    let corner = camera.pixel_origin(idx);

    let step_x = pixel_w / (2.0 * n as f32);
    let step_y = pixel_h / (2.0 * n as f32);
    let weight = 1.0 / (n * n) as f32;

    let mut color = Color::ZERO;
    for i in 0..n {
        for j in 0..n {
            let sample = corner + Vec3::new(i as f32 * step_x, j as f32 * step_y, 0.0);
            let ray = Ray::new(camera.eye, (sample - camera.eye).normalize());
            color += trace(snapshot, &ray) * weight;
        }
    }

    color
}

/// Render a full frame into the pixel buffer.
///
/// The image is split into fixed-size batches of pixel indices and each
/// batch is filled by one worker; pixels land in disjoint slots, so no
/// synchronization is needed beyond the final join. The snapshot and
/// camera are read-only for the whole dispatch and must not be refreshed
/// until this returns.
pub fn render(snapshot: &SceneSnapshot, camera: &Camera, buffer: &mut PixelBuffer) {
    buffer.ensure_sized(camera.image_width, camera.image_height);

    log::debug!(
        "dispatch {}x{} ({} spheres, {} triangles, {} lights, {} samples/pixel)",
        camera.image_width,
        camera.image_height,
        snapshot.spheres().len(),
        snapshot.triangles().len(),
        snapshot.lights().len(),
        snapshot.supersampling().samples_per_pixel(),
    );

    buffer
        .pixels_mut()
        .par_chunks_mut(DEFAULT_BATCH_SIZE)
        .enumerate()
        .for_each(|(batch, out)| {
            let base = batch * DEFAULT_BATCH_SIZE;
            for (offset, pixel) in out.iter_mut().enumerate() {
                *pixel = render_pixel(snapshot, camera, base + offset);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_scene::{PointLight, SceneDescription, SuperSampling};

    fn snapshot_of(mut desc: SceneDescription) -> SceneSnapshot {
        let mut snapshot = SceneSnapshot::new();
        snapshot.refresh(&mut desc);
        snapshot
    }

    fn red() -> Material {
        Material::diffuse_only(Color::new(1.0, 0.0, 0.0))
    }

    fn green() -> Material {
        Material::diffuse_only(Color::new(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_sphere_hit_exactness() {
        // Unit sphere at origin, camera at (0,0,5) looking down -z: the
        // central ray must hit the front surface at t=4, normal +z.
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::default());
        let mut desc = SceneDescription::new(Color::ZERO);
        desc.push_sphere(sphere);
        let snapshot = snapshot_of(desc);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = closest_hit(&snapshot, &ray).expect("central ray must hit");
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_inside_and_behind_are_no_hits() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::default());

        // Origin inside the sphere: roots have mixed signs
        let inside = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_sphere(&sphere, &inside).is_none());

        // Sphere entirely behind the camera: both roots negative
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_sphere(&sphere, &behind).is_none());
    }

    #[test]
    fn test_triangle_vertex_boundary_accepted() {
        // Ray aimed exactly at corner a: beta = gamma = 0 is inside the
        // inclusive simplex bounds.
        let triangle = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = intersect_triangle(&triangle, &ray, f32::INFINITY)
            .expect("vertex ray must be accepted");
        assert!((hit.t - 5.0).abs() < 1e-5);
        assert!(hit.beta.abs() < 1e-6);
        assert!(hit.gamma.abs() < 1e-6);
        // Implicit third coefficient carries the full weight at corner a
        let alpha = 1.0 - hit.beta - hit.gamma;
        assert!((alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_never_panics() {
        // All three corners collinear: det vanishes, quotients go
        // non-finite, the sample is simply rejected.
        let triangle = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&triangle, &ray, f32::INFINITY).is_none());
    }

    #[test]
    fn test_closer_wins_regardless_of_order() {
        // Two spheres on the view axis; the nearer (green) one must own
        // the hit with either snapshot ordering.
        let far = Sphere::new(Vec3::ZERO, 1.0, red());
        let near = Sphere::new(Vec3::new(0.0, 0.0, 2.0), 1.0, green());
        let light = PointLight::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE);

        let camera = Camera::new()
            .with_eye(Vec3::new(0.0, 0.0, 5.0))
            .with_viewport(Vec3::ZERO, 2.0, 2.0)
            .with_resolution(10, 10);
        let center = 5 * 10 + 5; // maps to the viewport center

        for ordering in [[far, near], [near, far]] {
            let mut desc = SceneDescription::new(Color::ZERO);
            for sphere in ordering {
                desc.push_sphere(sphere);
            }
            desc.push_light(light);
            let snapshot = snapshot_of(desc);

            let color = render_pixel(&snapshot, &camera, center);
            assert_eq!(color.x, 0.0, "red sphere is occluded by distance");
            assert!(color.y > 0.0, "green sphere owns the hit");
        }
    }

    #[test]
    fn test_exact_tie_goes_to_later_sphere() {
        // Coincident spheres intersect at identical t; the later entry in
        // the snapshot wins the tie.
        let first = Sphere::new(Vec3::ZERO, 1.0, red());
        let second = Sphere::new(Vec3::ZERO, 1.0, green());

        let mut desc = SceneDescription::new(Color::ZERO);
        desc.push_sphere(first);
        desc.push_sphere(second);
        desc.push_light(PointLight::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE));
        let snapshot = snapshot_of(desc);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let color = trace(&snapshot, &ray);
        assert_eq!(color.x, 0.0);
        assert!(color.y > 0.0);
    }

    #[test]
    fn test_no_shadow_invariant() {
        // An opaque sphere between the light and the lit point must not
        // change that point's shading; occlusion is unmodeled.
        let camera = Camera::new()
            .with_eye(Vec3::new(0.0, 0.0, 5.0))
            .with_viewport(Vec3::ZERO, 2.0, 2.0)
            .with_resolution(10, 10);
        let center = 5 * 10 + 5;
        let light = PointLight::new(Vec3::new(0.0, 3.0, 4.0), Color::ONE);

        let mut lit = SceneDescription::new(Color::ZERO);
        lit.push_sphere(Sphere::new(Vec3::ZERO, 1.0, red()));
        lit.push_light(light);
        let unoccluded = render_pixel(&snapshot_of(lit), &camera, center);

        let mut blocked = SceneDescription::new(Color::ZERO);
        blocked.push_sphere(Sphere::new(Vec3::ZERO, 1.0, red()));
        // Centered on the segment from the hit point (0,0,1) to the light
        blocked.push_sphere(Sphere::new(Vec3::new(0.0, 1.5, 2.5), 0.5, green()));
        blocked.push_light(light);
        let occluded = render_pixel(&snapshot_of(blocked), &camera, center);

        assert_eq!(unoccluded, occluded);
    }

    #[test]
    fn test_background_fallback() {
        let background = Color::new(0.2, 0.4, 0.6);
        let mut desc = SceneDescription::new(background);
        desc.push_light(PointLight::new(Vec3::Y, Color::ONE));
        let snapshot = snapshot_of(desc);

        let camera = Camera::new().with_resolution(16, 8);
        let mut buffer = PixelBuffer::new();
        render(&snapshot, &camera, &mut buffer);

        assert!(buffer.pixels().iter().all(|&p| p == background));
    }

    #[test]
    fn test_determinism() {
        let mut desc = SceneDescription::new(Color::new(0.5, 0.7, 1.0));
        desc.push_sphere(Sphere::new(Vec3::ZERO, 1.0, red()));
        desc.push_triangle(Triangle::new(
            Vec3::new(-2.0, -1.0, -1.0),
            Vec3::new(2.0, -1.0, -1.0),
            Vec3::new(0.0, 2.0, -1.0),
            green(),
        ));
        desc.push_light(PointLight::new(Vec3::new(3.0, 3.0, 3.0), Color::ONE));
        desc.supersampling = SuperSampling::X2;
        desc.mark_dirty();
        let snapshot = snapshot_of(desc);

        let camera = Camera::new().with_resolution(32, 32);

        let mut first = PixelBuffer::new();
        let mut second = PixelBuffer::new();
        render(&snapshot, &camera, &mut first);
        render(&snapshot, &camera, &mut second);

        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn test_supersampling_interior_and_edge() {
        // Unlit sphere shades to black; white background. Interior pixels
        // must match between N=1 and N=2; a silhouette-edge pixel must
        // blend only under N=2.
        let camera = Camera::new()
            .with_eye(Vec3::new(0.0, 0.0, 5.0))
            .with_viewport(Vec3::ZERO, 4.0, 4.0)
            .with_resolution(8, 8);

        let mut desc = SceneDescription::new(Color::ONE);
        desc.push_sphere(Sphere::new(Vec3::ZERO, 1.0, red()));
        let mut snapshot = SceneSnapshot::new();
        snapshot.refresh(&mut desc);

        let interior = 4 * 8 + 4; // pixel corner at the viewport center
        let edge = 4 * 8 + 6; // pixel corner at (1.0, 0.0), on the silhouette

        let interior_n1 = render_pixel(&snapshot, &camera, interior);
        let edge_n1 = render_pixel(&snapshot, &camera, edge);

        desc.supersampling = SuperSampling::X2;
        desc.mark_dirty();
        snapshot.refresh(&mut desc);

        let interior_n2 = render_pixel(&snapshot, &camera, interior);
        let edge_n2 = render_pixel(&snapshot, &camera, edge);

        // Away from edges, averaging identical sub-samples changes nothing
        assert!((interior_n1 - interior_n2).length() < 1e-6);
        assert_eq!(interior_n1, Color::ZERO);

        // On the silhouette, N=1 commits to the object, N=2 blends
        assert_eq!(edge_n1, Color::ZERO);
        assert!(edge_n2.x > 0.0 && edge_n2.x < 1.0);
    }

    #[test]
    fn test_empty_scene_with_no_lights_is_valid() {
        // Zero primitives and zero lights is not an error
        let snapshot = snapshot_of(SceneDescription::new(Color::ZERO));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(trace(&snapshot, &ray), Color::ZERO);
    }
}
