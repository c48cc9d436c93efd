//! Surface wrappers binding a geometry manager to material properties.

use helio_math::{DMat4, RayBundle};

use crate::{
    geometry::GeometryManager,
    optics::reflections,
    TraceError, TraceResult,
};

/// The ray-handling protocol a tracing driver sees: feed a bundle in,
/// select the surviving rays, get the outgoing bundle back.
///
/// One bundle is in flight per surface at a time: `get_outgoing` reads
/// the state of the last `register_incoming` call, so callers must not
/// register a second bundle before consuming the first one's output.
pub trait Surface {
    /// Record the incoming bundle and return the parametric position of
    /// intersection along each ray (`INFINITY` for a miss).
    fn register_incoming(&mut self, bundle: &RayBundle) -> TraceResult<Vec<f64>>;

    /// Build the reflected bundle for the selected rays of the last
    /// registered bundle: vertices at the intersection points,
    /// directions mirrored about the surface normals, energy and parent
    /// linkage carried over.
    ///
    /// Selecting a missed ray is a caller bug; filter on the parametric
    /// distances first.
    ///
    /// # Panics
    /// Panics if no bundle is registered or the selector length
    /// disagrees with it.
    fn get_outgoing(&self, selector: &[bool]) -> RayBundle;
}

/// A surface whose material properties are independent of location:
/// one absorptivity and one refractive index per side.
pub struct UniformSurface<G: GeometryManager> {
    geometry: G,
    frame: DMat4,
    absorptivity: f64,
    inner_n: f64,
    outer_n: f64,
    mirror: bool,
}

impl<G: GeometryManager> UniformSurface<G> {
    /// Wrap a geometry manager with default material properties:
    /// identity frame, absorptivity 0, refractive index 1 on both
    /// sides, mirrored.
    pub fn new(geometry: G) -> Self {
        Self {
            geometry,
            frame: DMat4::IDENTITY,
            absorptivity: 0.0,
            inner_n: 1.0,
            outer_n: 1.0,
            mirror: true,
        }
    }

    /// Place the surface at the given working frame.
    pub fn with_frame(mut self, frame: DMat4) -> Self {
        self.frame = frame;
        self
    }

    /// Set the absorptivity at construction. Rejects values outside [0, 1].
    pub fn with_absorptivity(mut self, absorptivity: f64) -> TraceResult<Self> {
        self.set_absorptivity(absorptivity)?;
        Ok(self)
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn frame(&self) -> &DMat4 {
        &self.frame
    }

    pub fn set_frame(&mut self, frame: DMat4) {
        self.frame = frame;
    }

    pub fn absorptivity(&self) -> f64 {
        self.absorptivity
    }

    /// Change the absorptivity. Rejects values outside [0, 1].
    pub fn set_absorptivity(&mut self, absorptivity: f64) -> TraceResult<()> {
        if !(0.0..=1.0).contains(&absorptivity) {
            return Err(TraceError::InvalidAbsorptivity(absorptivity));
        }
        self.absorptivity = absorptivity;
        Ok(())
    }

    pub fn inner_n(&self) -> f64 {
        self.inner_n
    }

    /// Refractive index on the side arbitrarily designated "inner".
    pub fn set_inner_n(&mut self, n: f64) {
        self.inner_n = n;
    }

    pub fn outer_n(&self) -> f64 {
        self.outer_n
    }

    pub fn set_outer_n(&mut self, n: f64) {
        self.outer_n = n;
    }

    pub fn is_mirror(&self) -> bool {
        self.mirror
    }

    pub fn set_mirror(&mut self, mirror: bool) {
        self.mirror = mirror;
    }

    /// For each ray currently travelling in a medium of index `n`,
    /// the index of the medium on the other side of this surface: rays
    /// in the inner medium get the outer index and vice versa.
    pub fn get_ref_index(&self, n: &[f64]) -> Vec<f64> {
        n.iter()
            .map(|&current| {
                if current == self.inner_n {
                    self.outer_n
                } else {
                    self.inner_n
                }
            })
            .collect()
    }
}

impl<G: GeometryManager> Surface for UniformSurface<G> {
    fn register_incoming(&mut self, bundle: &RayBundle) -> TraceResult<Vec<f64>> {
        self.geometry.find_intersections(&self.frame, bundle)
    }

    fn get_outgoing(&self, selector: &[bool]) -> RayBundle {
        let current = self
            .geometry
            .current_bundle()
            .expect("no bundle registered: call register_incoming first");
        // Energy and parent linkage come from the registered bundle,
        // filtered by the same selector as the geometry.
        let survivors = current.select(selector);

        let normals = self.geometry.normals(selector);
        let points = self.geometry.intersection_points(selector);
        let directions = reflections(survivors.directions(), &normals);

        let mut outgoing = RayBundle::new(points, directions);
        outgoing.set_energy(survivors.energy().to_vec());
        outgoing.set_parents(survivors.parents().to_vec());
        outgoing
    }
}
