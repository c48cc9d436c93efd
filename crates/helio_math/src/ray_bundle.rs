use crate::DVec3;

/// A batch of N independent rays processed together.
///
/// Rays are stored column-wise: index `i` across all per-ray arrays
/// describes ray `i`. Each ray has an origin `vertex`, a `direction`
/// defining the parametric line `vertex + t * direction`, a scalar
/// `energy`, and a `parent` index linking it to the ray in a previous
/// bundle it descends from.
///
/// A bundle is immutable except through the explicit setters below;
/// geometry and optics operations always produce a new bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct RayBundle {
    vertices: Vec<DVec3>,
    directions: Vec<DVec3>,
    energy: Vec<f64>,
    parents: Vec<usize>,
}

impl RayBundle {
    /// Create a new bundle from per-ray vertices and directions.
    ///
    /// Energy defaults to 1.0 per ray, and each ray starts as its own
    /// parent.
    ///
    /// # Panics
    /// Panics if `vertices` and `directions` disagree on length.
    pub fn new(vertices: Vec<DVec3>, directions: Vec<DVec3>) -> Self {
        assert_eq!(
            vertices.len(),
            directions.len(),
            "bundle arrays disagree on ray count"
        );
        let n = vertices.len();
        Self {
            vertices,
            directions,
            energy: vec![1.0; n],
            parents: (0..n).collect(),
        }
    }

    /// Create a bundle holding a single ray.
    pub fn single(vertex: DVec3, direction: DVec3) -> Self {
        Self::new(vec![vertex], vec![direction])
    }

    /// Number of rays in the bundle.
    pub fn num_rays(&self) -> usize {
        self.vertices.len()
    }

    /// Origin point of each ray.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Direction of each ray (unit length not required).
    pub fn directions(&self) -> &[DVec3] {
        &self.directions
    }

    /// Scalar energy carried by each ray.
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// Index of each ray's parent in the bundle it descends from.
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Replace the ray origins.
    ///
    /// # Panics
    /// Panics if the length differs from the bundle's ray count.
    pub fn set_vertices(&mut self, vertices: Vec<DVec3>) {
        assert_eq!(
            vertices.len(),
            self.num_rays(),
            "bundle arrays disagree on ray count"
        );
        self.vertices = vertices;
    }

    /// Replace the ray directions.
    ///
    /// # Panics
    /// Panics if the length differs from the bundle's ray count.
    pub fn set_directions(&mut self, directions: Vec<DVec3>) {
        assert_eq!(
            directions.len(),
            self.num_rays(),
            "bundle arrays disagree on ray count"
        );
        self.directions = directions;
    }

    /// Replace the per-ray energy.
    ///
    /// # Panics
    /// Panics if the length differs from the bundle's ray count.
    pub fn set_energy(&mut self, energy: Vec<f64>) {
        assert_eq!(
            energy.len(),
            self.num_rays(),
            "bundle arrays disagree on ray count"
        );
        self.energy = energy;
    }

    /// Replace the parent linkage.
    ///
    /// # Panics
    /// Panics if the length differs from the bundle's ray count.
    pub fn set_parents(&mut self, parents: Vec<usize>) {
        assert_eq!(
            parents.len(),
            self.num_rays(),
            "bundle arrays disagree on ray count"
        );
        self.parents = parents;
    }

    /// Copy out the subset of rays where `selector` is true, carrying
    /// energy and parent linkage along.
    ///
    /// # Panics
    /// Panics if the selector length differs from the bundle's ray count.
    pub fn select(&self, selector: &[bool]) -> RayBundle {
        assert_eq!(
            selector.len(),
            self.num_rays(),
            "selector length disagrees with bundle ray count"
        );
        let mut out = RayBundle::new(
            filtered(&self.vertices, selector),
            filtered(&self.directions, selector),
        );
        out.energy = filtered(&self.energy, selector);
        out.parents = filtered(&self.parents, selector);
        out
    }
}

fn filtered<T: Copy>(values: &[T], selector: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(selector)
        .filter(|(_, &on)| on)
        .map(|(v, _)| *v)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_creation() {
        let bundle = RayBundle::new(
            vec![DVec3::ZERO, DVec3::X],
            vec![DVec3::Z, DVec3::NEG_Z],
        );

        assert_eq!(bundle.num_rays(), 2);
        assert_eq!(bundle.vertices()[1], DVec3::X);
        assert_eq!(bundle.directions()[0], DVec3::Z);
        assert_eq!(bundle.energy(), &[1.0, 1.0]);
        assert_eq!(bundle.parents(), &[0, 1]);
    }

    #[test]
    #[should_panic(expected = "bundle arrays disagree on ray count")]
    fn test_bundle_mismatched_lengths() {
        RayBundle::new(vec![DVec3::ZERO], vec![DVec3::Z, DVec3::X]);
    }

    #[test]
    #[should_panic(expected = "bundle arrays disagree on ray count")]
    fn test_set_energy_mismatched_length() {
        let mut bundle = RayBundle::single(DVec3::ZERO, DVec3::Z);
        bundle.set_energy(vec![1.0, 2.0]);
    }

    #[test]
    fn test_setters_replace_columns() {
        let mut bundle = RayBundle::new(vec![DVec3::ZERO; 2], vec![DVec3::Z; 2]);
        bundle.set_vertices(vec![DVec3::X, DVec3::Y]);
        bundle.set_energy(vec![0.5, 0.25]);
        bundle.set_parents(vec![7, 3]);

        assert_eq!(bundle.vertices(), &[DVec3::X, DVec3::Y]);
        assert_eq!(bundle.energy(), &[0.5, 0.25]);
        assert_eq!(bundle.parents(), &[7, 3]);
    }

    #[test]
    fn test_select_subset() {
        let mut bundle = RayBundle::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![DVec3::Z, DVec3::NEG_Z, DVec3::X],
        );
        bundle.set_energy(vec![1.0, 2.0, 3.0]);

        let picked = bundle.select(&[true, false, true]);
        assert_eq!(picked.num_rays(), 2);
        assert_eq!(picked.vertices(), &[DVec3::ZERO, DVec3::Y]);
        assert_eq!(picked.energy(), &[1.0, 3.0]);
        assert_eq!(picked.parents(), &[0, 2]);
    }

    #[test]
    #[should_panic(expected = "selector length disagrees")]
    fn test_select_mismatched_selector() {
        let bundle = RayBundle::single(DVec3::ZERO, DVec3::Z);
        bundle.select(&[true, false]);
    }
}
