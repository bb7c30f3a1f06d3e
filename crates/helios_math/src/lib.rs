// Re-export glam for convenience
pub use glam::*;

// Helios math types
mod ray;
pub use ray::Ray;
