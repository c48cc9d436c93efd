// Re-export glam for convenience
pub use glam::*;

// Helio math types
mod frame;
mod ray_bundle;
pub use frame::FrameExt;
pub use ray_bundle::RayBundle;
