//! Batched quadric intersection solver.
//!
//! Solves `A·t² + B·t + C = 0` for every ray in a bundle at once. The
//! skeleton is fixed here; a [`QuadricShape`] supplies the per-surface
//! coefficients, the normal formula, and (optionally) the root
//! tie-break. Every step runs uniformly across the bundle with per-ray
//! independent outcomes: a ray that misses is data, not an error.

use helio_math::{DMat4, DVec3, FrameExt, RayBundle};

use crate::{
    boundary::BoundaryShape,
    geometry::{validate_frame, GeometryManager, IntersectionCache},
    TraceError, TraceResult,
};

/// Coefficient magnitude below which a ray's quadric equation degenerates
/// to the linear `B·t + C = 0`.
pub const PLANAR_EPS: f64 = 1e-10;

/// The per-surface pieces of the quadric intersection algorithm.
///
/// Implementations describe one family of quadric surfaces; the batched
/// skeleton in [`QuadricGeometry`] does everything else.
pub trait QuadricShape: Send + Sync {
    /// Per-ray quadric coefficients `(A, B, C)` such that the
    /// intersection parameter `t` of ray `i` solves
    /// `A[i]·t² + B[i]·t + C[i] = 0`.
    fn coefficients(
        &self,
        frame: &DMat4,
        bundle: &RayBundle,
    ) -> (Vec<f64>, Vec<f64>, Vec<f64>);

    /// Unit normal at each hit point.
    ///
    /// `sides[i]` carries the sign of `(center − hit) · direction` for
    /// the i-th surviving ray, telling which face of the surface was
    /// struck so the normal can be oriented for both convex and concave
    /// encounters.
    fn normals(&self, sides: &[f64], hit_points: &[DVec3], center: DVec3) -> Vec<DVec3>;

    /// Choose between the two candidate roots of each ray, or `None` to
    /// discard the ray as a miss.
    ///
    /// The default takes the first intersection not behind the ray's
    /// vertex: both roots non-positive is a miss, both positive takes
    /// the smaller, exactly one positive takes that one. Non-finite
    /// roots never qualify.
    fn select_root(&self, _coords: &[[DVec3; 2]], hits: &[[f64; 2]]) -> Vec<Option<usize>> {
        hits.iter()
            .map(|h| {
                let pos0 = h[0].is_finite() && h[0] > 0.0;
                let pos1 = h[1].is_finite() && h[1] > 0.0;
                match (pos0, pos1) {
                    (false, false) => None,
                    (true, false) => Some(0),
                    (false, true) => Some(1),
                    (true, true) => Some(if h[0] <= h[1] { 0 } else { 1 }),
                }
            })
            .collect()
    }
}

/// Batched geometry manager for any [`QuadricShape`].
pub struct QuadricGeometry<S: QuadricShape> {
    shape: S,
    boundary: Option<Box<dyn BoundaryShape>>,
    cache: IntersectionCache,
}

impl<S: QuadricShape> QuadricGeometry<S> {
    /// Create a manager for `shape` with no boundary clipping.
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            boundary: None,
            cache: IntersectionCache::default(),
        }
    }

    /// Clip intersections to a finite boundary region.
    pub fn with_boundary(mut self, boundary: Box<dyn BoundaryShape>) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut S {
        &mut self.shape
    }
}

impl<S: QuadricShape> GeometryManager for QuadricGeometry<S> {
    fn find_intersections(
        &mut self,
        frame: &DMat4,
        bundle: &RayBundle,
    ) -> TraceResult<Vec<f64>> {
        validate_frame(frame)?;
        let n = bundle.num_rays();
        let center = frame.frame_center();
        let verts = bundle.vertices();
        let dirs = bundle.directions();

        if dirs.iter().any(|d| d.length_squared() == 0.0) {
            log::warn!("bundle contains zero-length directions; affected rays will miss");
        }

        let (a, b, c) = self.shape.coefficients(frame, bundle);
        assert!(
            a.len() == n && b.len() == n && c.len() == n,
            "coefficient arrays disagree with bundle ray count"
        );

        // Discriminant per ray; negative means the ray's line never
        // meets the surface.
        let delta: Vec<f64> = (0..n).map(|i| b[i] * b[i] - 4.0 * a[i] * c[i]).collect();

        // Both candidate roots per ray. Near-planar rays take the linear
        // solution in both slots; the quadratic formula would divide by
        // ~zero there.
        let mut hits = vec![[f64::INFINITY; 2]; n];
        for i in 0..n {
            if delta[i] < 0.0 {
                continue;
            }
            hits[i] = if a[i].abs() <= PLANAR_EPS {
                let t = -c[i] / b[i];
                [t, t]
            } else {
                let sq = delta[i].sqrt();
                [
                    (-b[i] - sq) / (2.0 * a[i]),
                    (-b[i] + sq) / (2.0 * a[i]),
                ]
            };
        }

        // Candidate coordinates for both roots of every ray.
        let coords: Vec<[DVec3; 2]> = (0..n)
            .map(|i| {
                [
                    verts[i] + dirs[i] * hits[i][0],
                    verts[i] + dirs[i] * hits[i][1],
                ]
            })
            .collect();

        // Shape-specific choice between the two intersections.
        let choice = self.shape.select_root(&coords, &hits);
        assert_eq!(
            choice.len(),
            n,
            "root selection disagrees with bundle ray count"
        );

        let mut params = vec![f64::INFINITY; n];
        let mut points = vec![DVec3::ZERO; n];
        let mut hit_mask = vec![false; n];
        for i in 0..n {
            if let Some(k) = choice[i] {
                params[i] = hits[i][k];
                points[i] = coords[i][k];
                hit_mask[i] = true;
            }
        }

        // Algebraic hits outside the surface's finite extent fold into
        // the miss set.
        if let Some(boundary) = &self.boundary {
            let idx: Vec<usize> = (0..n).filter(|&i| hit_mask[i]).collect();
            let pts: Vec<DVec3> = idx.iter().map(|&i| points[i]).collect();
            for (&i, inside) in idx.iter().zip(boundary.in_bounds(&pts)) {
                if !inside {
                    hit_mask[i] = false;
                    params[i] = f64::INFINITY;
                    points[i] = DVec3::ZERO;
                }
            }
        }

        // Normals for the survivors, oriented by which face each ray
        // struck.
        let idx: Vec<usize> = (0..n).filter(|&i| hit_mask[i]).collect();
        let sides: Vec<f64> = idx
            .iter()
            .map(|&i| (center - points[i]).dot(dirs[i]))
            .collect();
        let hit_points: Vec<DVec3> = idx.iter().map(|&i| points[i]).collect();
        let oriented = self.shape.normals(&sides, &hit_points, center);
        assert_eq!(
            oriented.len(),
            idx.len(),
            "normal array disagrees with surviving ray count"
        );
        let mut normals = vec![DVec3::ZERO; n];
        for (&i, nrm) in idx.iter().zip(oriented) {
            normals[i] = nrm;
        }

        log::debug!("{} of {} rays intersect the surface", idx.len(), n);

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

/// Sphere of a given radius centered on the working frame's origin.
pub struct SphereQuadric {
    radius: f64,
}

impl SphereQuadric {
    /// Create a spherical shape. Rejects non-positive radii.
    pub fn new(radius: f64) -> TraceResult<Self> {
        check_radius(radius)?;
        Ok(Self { radius })
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

pub(crate) fn check_radius(radius: f64) -> TraceResult<()> {
    if radius <= 0.0 {
        return Err(TraceError::InvalidRadius(radius));
    }
    Ok(())
}

impl QuadricShape for SphereQuadric {
    fn coefficients(
        &self,
        frame: &DMat4,
        bundle: &RayBundle,
    ) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let center = frame.frame_center();
        let n = bundle.num_rays();
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let mut c = Vec::with_capacity(n);
        for (v, d) in bundle.vertices().iter().zip(bundle.directions()) {
            let oc = *v - center;
            a.push(d.length_squared());
            b.push(2.0 * d.dot(oc));
            c.push(oc.length_squared() - self.radius * self.radius);
        }
        (a, b, c)
    }

    fn normals(&self, sides: &[f64], hit_points: &[DVec3], center: DVec3) -> Vec<DVec3> {
        sides
            .iter()
            .zip(hit_points)
            .map(|(&side, &p)| {
                // side > 0: outer face struck, normal away from center;
                // otherwise inner face, normal toward center.
                if side > 0.0 {
                    (p - center).normalize()
                } else {
                    (center - p).normalize()
                }
            })
            .collect()
    }
}
