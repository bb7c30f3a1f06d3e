//! Simple ray tracer example.
//!
//! Builds a small scene of spheres, triangles and lights, renders one
//! frame through the full snapshot pipeline, and saves a PNG.

use anyhow::Context;
use helios_renderer::{render, Camera, Color, Material, PixelBuffer, Vec3};
use helios_scene::{PointLight, SceneDescription, SceneSnapshot, Sphere, SuperSampling, Triangle};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Helios Ray Tracer - Simple Example");
    println!("==================================");

    let mut description = build_scene();

    let camera = Camera::new()
        .with_eye(Vec3::new(0.0, 0.0, 6.0))
        .with_viewport(Vec3::ZERO, 4.0, 2.25)
        .with_resolution(800, 450);
    camera.validate().context("invalid camera configuration")?;

    // Frame loop collaborator: refresh the snapshot, then dispatch
    let mut snapshot = SceneSnapshot::new();
    snapshot.refresh(&mut description);

    let mut buffer = PixelBuffer::new();

    println!(
        "Rendering {}x{} @ {} samples/pixel...",
        camera.image_width,
        camera.image_height,
        snapshot.supersampling().samples_per_pixel()
    );

    let start = std::time::Instant::now();
    render(&snapshot, &camera, &mut buffer);
    println!("Rendered in {:?}", start.elapsed());

    save_png(&buffer, "output.png")?;
    println!("Saved to output.png");

    Ok(())
}

fn build_scene() -> SceneDescription {
    let mut description = SceneDescription::new(Color::new(0.1, 0.1, 0.15));

    description.push_sphere(Sphere::new(
        Vec3::new(-1.2, 0.0, 0.0),
        0.8,
        Material::new(
            Color::new(0.8, 0.2, 0.2),
            Color::new(0.9, 0.9, 0.9),
            64.0,
        ),
    ));
    description.push_sphere(Sphere::new(
        Vec3::new(1.2, 0.0, 0.0),
        0.8,
        Material::new(
            Color::new(0.2, 0.4, 0.8),
            Color::new(0.5, 0.5, 0.5),
            16.0,
        ),
    ));

    // Ground quad as two triangles
    let ground = Material::new(Color::new(0.4, 0.4, 0.4), Color::ZERO, 1.0);
    let (a, b) = (Vec3::new(-6.0, -0.8, 4.0), Vec3::new(6.0, -0.8, 4.0));
    let (c, d) = (Vec3::new(6.0, -0.8, -6.0), Vec3::new(-6.0, -0.8, -6.0));
    description.push_triangle(Triangle::new(a, c, b, ground));
    description.push_triangle(Triangle::new(a, d, c, ground));

    description.push_light(PointLight::new(
        Vec3::new(4.0, 5.0, 4.0),
        Color::new(0.9, 0.9, 0.8),
    ));
    description.push_light(PointLight::new(
        Vec3::new(-5.0, 2.0, 2.0),
        Color::new(0.2, 0.2, 0.4),
    ));

    description.supersampling = SuperSampling::X2;
    description.mark_dirty();
    description
}

fn save_png(buffer: &PixelBuffer, path: &str) -> anyhow::Result<()> {
    let (width, height) = (buffer.width(), buffer.height());
    let mut image = image::RgbaImage::new(width, height);

    // Row 0 of the pixel buffer is the bottom of the image
    for y in 0..height {
        for x in 0..width {
            let rgba = helios_renderer::color_to_rgba(buffer.get(x, y));
            image.put_pixel(x, height - 1 - y, image::Rgba(rgba));
        }
    }

    image.save(path).with_context(|| format!("failed to save {path}"))
}
