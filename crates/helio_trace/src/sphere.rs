//! Scalar sphere intersection, computed ray by ray.
//!
//! The same algebraic problem [`QuadricGeometry`] solves for the whole
//! bundle at once, written as a plain per-ray loop. It serves as the
//! semantics oracle for the batched solver: both must produce the same
//! parameters, hit points, normals, and miss classification on
//! identical inputs.
//!
//! [`QuadricGeometry`]: crate::QuadricGeometry

use helio_math::{DMat4, DVec3, FrameExt, RayBundle};

use crate::{
    boundary::BoundaryShape,
    geometry::{validate_frame, GeometryManager, IntersectionCache},
    quadric::check_radius,
    TraceResult,
};

/// Sphere of a given radius centered on the working frame's origin,
/// intersected one ray at a time.
pub struct SphereGeometry {
    radius: f64,
    boundary: Option<Box<dyn BoundaryShape>>,
    cache: IntersectionCache,
}

impl SphereGeometry {
    /// Create a sphere manager. Rejects non-positive radii.
    pub fn new(radius: f64) -> TraceResult<Self> {
        check_radius(radius)?;
        Ok(Self {
            radius,
            boundary: None,
            cache: IntersectionCache::default(),
        })
    }

    /// Clip intersections to a finite boundary region.
    pub fn with_boundary(mut self, boundary: Box<dyn BoundaryShape>) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius. Rejects non-positive values.
    pub fn set_radius(&mut self, radius: f64) -> TraceResult<()> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(())
    }
}

fn usable(t: f64) -> bool {
    t.is_finite() && t > 0.0
}

impl GeometryManager for SphereGeometry {
    fn find_intersections(
        &mut self,
        frame: &DMat4,
        bundle: &RayBundle,
    ) -> TraceResult<Vec<f64>> {
        validate_frame(frame)?;
        let center = frame.frame_center();
        let n = bundle.num_rays();

        if bundle.directions().iter().any(|d| d.length_squared() == 0.0) {
            log::warn!("bundle contains zero-length directions; affected rays will miss");
        }

        let mut params = vec![f64::INFINITY; n];
        let mut points = vec![DVec3::ZERO; n];
        let mut normals = vec![DVec3::ZERO; n];

        for i in 0..n {
            let v = bundle.vertices()[i];
            let d = bundle.directions()[i];
            let oc = v - center;

            let a = d.length_squared();
            let b = 2.0 * d.dot(oc);
            let c = oc.length_squared() - self.radius * self.radius;

            // No real root: the ray's line misses the sphere entirely.
            let delta = b * b - 4.0 * a * c;
            if delta < 0.0 {
                continue;
            }

            let sq = delta.sqrt();
            let t0 = (-b - sq) / (2.0 * a);
            let t1 = (-b + sq) / (2.0 * a);

            let t = match (usable(t0), usable(t1)) {
                (false, false) => continue,
                (true, false) => t0,
                (false, true) => t1,
                (true, true) => t0.min(t1),
            };

            let hit = v + d * t;

            if let Some(boundary) = &self.boundary {
                if !boundary.in_bounds(&[hit])[0] {
                    continue;
                }
            }

            // Which face was struck decides the normal's orientation:
            // inner face points back toward the center, outer face away.
            let side = (center - hit).dot(hit - v);
            let normal = if side > 0.0 {
                (hit - center).normalize()
            } else {
                (center - hit).normalize()
            };

            params[i] = t;
            points[i] = hit;
            normals[i] = normal;
        }

        let hit_count = params.iter().filter(|t| t.is_finite()).count();
        log::debug!("{} of {} rays intersect the sphere", hit_count, n);

        self.cache
            .store(*frame, bundle.clone(), params.clone(), points, normals);
        Ok(params)
    }

    fn normals(&self, selector: &[bool]) -> Vec<DVec3> {
        self.cache.select_normals(selector)
    }

    fn intersection_points(&self, selector: &[bool]) -> Vec<DVec3> {
        self.cache.select_points(selector)
    }

    fn current_bundle(&self) -> Option<&RayBundle> {
        self.cache.bundle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::SphericalBounds;
    use crate::TraceError;

    #[test]
    fn test_head_on_hit() {
        let mut geom = SphereGeometry::new(1.0).unwrap();
        let bundle = RayBundle::single(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));

        let params = geom
            .find_intersections(&DMat4::IDENTITY, &bundle)
            .unwrap();
        assert!((params[0] - 4.0).abs() < 1e-12);

        let points = geom.intersection_points(&[true]);
        let normals = geom.normals(&[true]);
        assert!((points[0] - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert!((normals[0] - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_miss_moving_away() {
        let mut geom = SphereGeometry::new(1.0).unwrap();
        let bundle = RayBundle::single(DVec3::new(2.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));

        let params = geom
            .find_intersections(&DMat4::IDENTITY, &bundle)
            .unwrap();
        assert_eq!(params[0], f64::INFINITY);
    }

    #[test]
    fn test_inside_origin_normal_faces_center() {
        let mut geom = SphereGeometry::new(1.0).unwrap();
        let bundle = RayBundle::single(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0));

        let params = geom
            .find_intersections(&DMat4::IDENTITY, &bundle)
            .unwrap();
        assert!((params[0] - 1.0).abs() < 1e-12);

        let normals = geom.normals(&[true]);
        assert!((normals[0] - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_boundary_forces_miss() {
        let bounds = SphericalBounds::new(DVec3::new(0.0, 0.0, -1.0), 0.5).unwrap();
        let mut geom = SphereGeometry::new(1.0).unwrap().with_boundary(Box::new(bounds));
        let bundle = RayBundle::single(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));

        let params = geom
            .find_intersections(&DMat4::IDENTITY, &bundle)
            .unwrap();
        assert_eq!(params[0], f64::INFINITY);
    }

    #[test]
    fn test_radius_validation() {
        assert!(matches!(
            SphereGeometry::new(0.0),
            Err(TraceError::InvalidRadius(_))
        ));
        assert!(matches!(
            SphereGeometry::new(-3.0),
            Err(TraceError::InvalidRadius(_))
        ));

        let mut geom = SphereGeometry::new(2.0).unwrap();
        assert!(geom.set_radius(0.0).is_err());
        assert_eq!(geom.radius(), 2.0);
    }

    #[test]
    fn test_all_miss_bundle_still_succeeds() {
        let mut geom = SphereGeometry::new(1.0).unwrap();
        let bundle = RayBundle::new(
            vec![DVec3::new(3.0, 0.0, 0.0), DVec3::new(0.0, 3.0, 0.0)],
            vec![DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0)],
        );

        let params = geom
            .find_intersections(&DMat4::IDENTITY, &bundle)
            .unwrap();
        assert!(params.iter().all(|t| *t == f64::INFINITY));
    }
}
