//! Reflection and energy primitives consumed by the surface wrappers.

use helio_math::DVec3;

/// Mirror-reflect each direction about its (unit) normal:
/// `d' = d − 2(d·n̂)n̂`.
///
/// # Panics
/// Panics if the two arrays disagree on length.
pub fn reflections(directions: &[DVec3], normals: &[DVec3]) -> Vec<DVec3> {
    assert_eq!(
        directions.len(),
        normals.len(),
        "directions and normals disagree on ray count"
    );
    directions
        .iter()
        .zip(normals)
        .map(|(d, n)| *d - 2.0 * d.dot(*n) * *n)
        .collect()
}

/// Scale each ray's energy by the fraction a surface of the given
/// absorptivity lets through.
pub fn attenuate(energy: &[f64], absorptivity: f64) -> Vec<f64> {
    energy.iter().map(|e| e * (1.0 - absorptivity)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_law() {
        let d = DVec3::new(1.0, -1.0, 0.0).normalize();
        let n = DVec3::new(0.0, 1.0, 0.0);

        let r = reflections(&[d], &[n]);
        // The normal component flips, the tangential one is kept.
        assert!((r[0].dot(n) - -d.dot(n)).abs() < 1e-12);
        assert!((r[0].x - d.x).abs() < 1e-12);
        assert!((r[0].length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_incidence_reverses() {
        let d = DVec3::new(0.0, 0.0, -1.0);
        let n = DVec3::new(0.0, 0.0, 1.0);

        let r = reflections(&[d], &[n]);
        assert!((r[0] - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_reflection_ignores_normal_sign() {
        let d = DVec3::new(0.3, -0.8, 0.1);
        let n = DVec3::new(0.0, 1.0, 0.0);

        let flipped = reflections(&[d], &[-n]);
        let kept = reflections(&[d], &[n]);
        assert!((flipped[0] - kept[0]).length() < 1e-12);
    }

    #[test]
    fn test_attenuate() {
        assert_eq!(attenuate(&[2.0, 1.0], 0.25), vec![1.5, 0.75]);
        assert_eq!(attenuate(&[2.0], 0.0), vec![2.0]);
        assert_eq!(attenuate(&[2.0], 1.0), vec![0.0]);
    }
}
