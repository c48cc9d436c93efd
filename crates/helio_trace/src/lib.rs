//! Batched ray/surface geometry for optical simulation.
//!
//! Given a bundle of rays and a surface, computes for every ray at once
//! whether and where the ray intersects the surface, the surface normal
//! at that point, and the outgoing bundle after reflection.
//!
//! The driver loop is the caller's: register a bundle on a surface,
//! filter the returned parametric distances, then ask for the outgoing
//! rays of the survivors.

mod boundary;
mod error;
mod geometry;
pub mod optics;
mod quadric;
mod sphere;
mod surface;

pub use boundary::{BoundaryShape, SphericalBounds};
pub use error::{TraceError, TraceResult};
pub use geometry::{GeometryManager, IntersectionCache};
pub use quadric::{QuadricGeometry, QuadricShape, SphereQuadric, PLANAR_EPS};
pub use sphere::SphereGeometry;
pub use surface::{Surface, UniformSurface};

/// Re-export common math types from helio_math
pub use helio_math::{DMat4, DVec3, FrameExt, RayBundle};
