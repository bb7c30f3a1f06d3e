//! Helios scene - authoring-side scene description and render snapshot.
//!
//! This crate provides:
//!
//! - **Primitive records**: `Sphere`, `Triangle`, `PointLight`, `Material`
//! - **Authoring surface**: `SceneDescription` with an explicit dirty signal
//! - **Render surface**: `SceneSnapshot`, the flattened read-only-per-frame
//!   view consumed by the tracing kernel

pub mod description;
pub mod primitives;
pub mod sampling;
pub mod snapshot;

// Re-export commonly used types
pub use description::SceneDescription;
pub use primitives::{Color, Material, PointLight, Sphere, Triangle};
pub use sampling::{SuperSampling, SuperSamplingError};
pub use snapshot::SceneSnapshot;
