//! Geometry manager contract and per-surface working state.

use helio_math::{DMat4, DVec3, RayBundle};

use crate::{TraceError, TraceResult};

/// Contract shared by all geometry managers: given a working frame and a
/// ray bundle, compute per-ray parametric intersection distances, and
/// keep the hit points and normals around for selector-keyed retrieval.
///
/// Missed rays report `f64::INFINITY`; their point/normal slots hold
/// unspecified placeholders and must not be selected by the caller.
pub trait GeometryManager {
    /// Register the working frame and bundle, compute intersections, and
    /// return the parametric distance along each ray (`INFINITY` for a
    /// miss). Overwrites the working state of any previous call.
    fn find_intersections(&mut self, frame: &DMat4, bundle: &RayBundle)
        -> TraceResult<Vec<f64>>;

    /// Unit normals at the hit points of the selected rays of the last
    /// registered bundle.
    ///
    /// # Panics
    /// Panics if no bundle has been registered or the selector length
    /// disagrees with it.
    fn normals(&self, selector: &[bool]) -> Vec<DVec3>;

    /// Global intersection points of the selected rays of the last
    /// registered bundle.
    ///
    /// # Panics
    /// Panics if no bundle has been registered or the selector length
    /// disagrees with it.
    fn intersection_points(&self, selector: &[bool]) -> Vec<DVec3>;

    /// The bundle registered by the last `find_intersections` call.
    fn current_bundle(&self) -> Option<&RayBundle>;
}

/// Working state left behind by `find_intersections`.
///
/// A single-slot cache: each call overwrites it wholesale, and the
/// selector-keyed retrievals read it for the same bundle. Callers must
/// not interleave `find_intersections` calls for two bundles before
/// consuming the first bundle's outgoing rays.
#[derive(Debug, Clone)]
pub struct IntersectionCache {
    params: Vec<f64>,
    points: Vec<DVec3>,
    normals: Vec<DVec3>,
    frame: DMat4,
    bundle: Option<RayBundle>,
}

impl Default for IntersectionCache {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            points: Vec::new(),
            normals: Vec::new(),
            frame: DMat4::IDENTITY,
            bundle: None,
        }
    }
}

impl IntersectionCache {
    /// Replace the whole working state with the results of one
    /// `find_intersections` call.
    pub fn store(
        &mut self,
        frame: DMat4,
        bundle: RayBundle,
        params: Vec<f64>,
        points: Vec<DVec3>,
        normals: Vec<DVec3>,
    ) {
        let n = bundle.num_rays();
        assert_eq!(params.len(), n, "working state disagrees on ray count");
        assert_eq!(points.len(), n, "working state disagrees on ray count");
        assert_eq!(normals.len(), n, "working state disagrees on ray count");
        self.frame = frame;
        self.bundle = Some(bundle);
        self.params = params;
        self.points = points;
        self.normals = normals;
    }

    /// Parametric distances of the last call.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Frame registered by the last call.
    pub fn frame(&self) -> &DMat4 {
        &self.frame
    }

    /// Bundle registered by the last call.
    pub fn bundle(&self) -> Option<&RayBundle> {
        self.bundle.as_ref()
    }

    /// Normals of the selected rays.
    pub fn select_normals(&self, selector: &[bool]) -> Vec<DVec3> {
        self.check_selector(selector);
        pick(&self.normals, selector)
    }

    /// Intersection points of the selected rays.
    pub fn select_points(&self, selector: &[bool]) -> Vec<DVec3> {
        self.check_selector(selector);
        pick(&self.points, selector)
    }

    fn check_selector(&self, selector: &[bool]) {
        let bundle = self
            .bundle
            .as_ref()
            .expect("no bundle registered: call find_intersections first");
        assert_eq!(
            selector.len(),
            bundle.num_rays(),
            "selector length disagrees with registered bundle"
        );
    }
}

fn pick(values: &[DVec3], selector: &[bool]) -> Vec<DVec3> {
    values
        .iter()
        .zip(selector)
        .filter(|(_, &on)| on)
        .map(|(v, _)| *v)
        .collect()
}

/// Reject singular working frames before any intersection math runs.
pub(crate) fn validate_frame(frame: &DMat4) -> TraceResult<()> {
    let det = frame.determinant();
    if det.abs() < 1e-12 {
        return Err(TraceError::SingularFrame(det));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_cache() -> IntersectionCache {
        let mut cache = IntersectionCache::default();
        cache.store(
            DMat4::IDENTITY,
            RayBundle::new(vec![DVec3::ZERO; 3], vec![DVec3::Z; 3]),
            vec![1.0, f64::INFINITY, 2.0],
            vec![DVec3::X, DVec3::ZERO, DVec3::Y],
            vec![DVec3::Z, DVec3::ZERO, DVec3::X],
        );
        cache
    }

    #[test]
    fn test_selector_retrieval() {
        let cache = filled_cache();
        let selector = [true, false, true];

        assert_eq!(cache.select_points(&selector), vec![DVec3::X, DVec3::Y]);
        assert_eq!(cache.select_normals(&selector), vec![DVec3::Z, DVec3::X]);
    }

    #[test]
    #[should_panic(expected = "no bundle registered")]
    fn test_retrieval_before_store() {
        IntersectionCache::default().select_normals(&[true]);
    }

    #[test]
    #[should_panic(expected = "selector length disagrees")]
    fn test_selector_length_mismatch() {
        filled_cache().select_points(&[true, false]);
    }

    #[test]
    fn test_validate_frame() {
        assert!(validate_frame(&DMat4::IDENTITY).is_ok());
        assert!(matches!(
            validate_frame(&DMat4::ZERO),
            Err(TraceError::SingularFrame(_))
        ));
    }
}
