//! Boundary predicates clipping infinite surfaces to finite patches.

use helio_math::DVec3;

use crate::{TraceError, TraceResult};

/// A finite-extent clipping region restricting an otherwise infinite
/// surface to a bounded patch.
///
/// Geometry managers consult the boundary after root selection: an
/// algebraically valid intersection point outside the boundary is
/// reported as a miss.
pub trait BoundaryShape: Send + Sync {
    /// For each point, whether it lies within the boundary region.
    fn in_bounds(&self, points: &[DVec3]) -> Vec<bool>;
}

/// Spherical clipping volume: points inside the ball pass.
pub struct SphericalBounds {
    center: DVec3,
    radius: f64,
}

impl SphericalBounds {
    /// Create a spherical boundary around `center`.
    ///
    /// Rejects non-positive radii.
    pub fn new(center: DVec3, radius: f64) -> TraceResult<Self> {
        if radius <= 0.0 {
            return Err(TraceError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }
}

impl BoundaryShape for SphericalBounds {
    fn in_bounds(&self, points: &[DVec3]) -> Vec<bool> {
        points
            .iter()
            .map(|p| (*p - self.center).length_squared() <= self.radius * self.radius)
            .collect()
    }
}
